//! Blueprints client and data models for the Morpheus API.
//!
//! Provides typed structures and an asynchronous client for the
//! `/api/blueprints` resource: list, get, create, update, logo upload,
//! delete, and lookup by name.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{BlueprintsClient, BlueprintsClientBuilder, BLUEPRINTS_PATH};
pub use models::{
    Blueprint, BlueprintListParams, BlueprintPayload, BlueprintSpec, CreateBlueprintResult,
    DeleteBlueprintResult, GetBlueprintResult, ListBlueprintsResult, UpdateBlueprintResult,
};
pub use morpheus_core::executor::FilePayload;
pub use morpheus_core::id::BlueprintId;

/// Convenient result alias that reuses the shared Morpheus error type.
pub type Result<T> = morpheus_core::Result<T>;
