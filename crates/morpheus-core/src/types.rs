//! Value types shared by every Morpheus resource binding.
//!
//! Ownership references, the resource permission descriptor, list metadata
//! and the standard success/message/errors envelope appear on many resources;
//! they live here so bindings reuse one definition each.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::id::{TenantId, UserId};

/// Deserialize a JSON `null` as the type's default value.
///
/// The API sends `null` for unset strings, lists and maps; records keep
/// plain (non-`Option`) fields for those.
///
/// # Errors
///
/// Returns the underlying deserializer error for values of the wrong type.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reference to the user that owns a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    /// User id
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: UserId,
    /// Username
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
}

/// Reference to the tenant (account) a record belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRef {
    /// Tenant id
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: TenantId,
    /// Tenant name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Which sites (groups) may use a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePermission {
    /// Visible to every site
    #[serde(default, deserialize_with = "null_as_default")]
    pub all: bool,
    /// Explicit site references, kept opaque
    #[serde(default, deserialize_with = "null_as_default")]
    pub sites: Vec<Value>,
}

impl ResourcePermission {
    /// Permission granting access to all sites.
    #[must_use]
    pub const fn all_sites() -> Self {
        Self {
            all: true,
            sites: Vec::new(),
        }
    }
}

/// Paging metadata returned alongside list results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaResult {
    /// Total number of matching records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    /// Number of records in this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Page size requested; the API sends a number or a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Offset of this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

/// The success/message/errors envelope returned by mutating calls.
///
/// Field validation failures arrive here as data rather than as an HTTP
/// error; callers check [`success`](Self::success) and [`errors`](Self::errors).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardResult {
    /// Whether the server accepted the operation
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    /// Human-readable message
    #[serde(rename = "msg", default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Field name to validation message
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: HashMap<String, String>,
}

impl StandardResult {
    /// Returns true if the server reported field errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of a delete call.
pub type DeleteResult = StandardResult;
