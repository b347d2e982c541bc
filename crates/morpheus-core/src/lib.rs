//! # morpheus-core
//!
//! Core types and request execution for Morpheus API bindings.
//!
//! This crate provides the shared error type, client configuration, typed
//! ids, common value types and the HTTP [`Executor`](executor::Executor) that
//! every resource binding delegates to.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Client configuration
//! - [`client`] - HTTP client settings
//! - [`executor`] - Request/response description and the HTTP executor
//! - [`id`] - Strongly-typed integer ids
//! - [`query`] - Query parameter builder
//! - [`types`] - Value types shared across resources

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod id;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use config::MorpheusConfig;
pub use error::{Error, Result};
pub use executor::{Executor, ExecutorBuilder, FilePayload, Method, Request, RequestExecutor, Response};
