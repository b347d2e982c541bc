//! Blueprint records, request payloads and result envelopes.

use chrono::{DateTime, Utc};
use morpheus_core::id::BlueprintId;
use morpheus_core::query::QueryParams;
use morpheus_core::types::{
    null_as_default, DeleteResult, MetaResult, OwnerRef, ResourcePermission, TenantRef,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Representation of a blueprint as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Blueprint id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: BlueprintId,
    /// Unique name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Blueprint type (`morpheus`, `terraform`, `arm`, ...).
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub blueprint_type: String,
    /// Description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    /// Category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Visibility (`private` or `public`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub visibility: String,
    /// Type-specific blueprint definition, kept opaque.
    #[serde(default)]
    pub config: Value,
    /// Site permissions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_permission: ResourcePermission,
    /// Owning user.
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: OwnerRef,
    /// Owning tenant.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tenant: TenantRef,
    /// Creation timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_created: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

/// RFC 3339 timestamp, or `None` when absent, null or not parseable.
fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        _ => None,
    })
}

/// Blueprint fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintSpec {
    /// Unique name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Blueprint type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub blueprint_type: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Type-specific definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    /// Site permissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_permission: Option<ResourcePermission>,
}

impl BlueprintSpec {
    /// Fields for a new blueprint of the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, blueprint_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            blueprint_type: Some(blueprint_type.into()),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the visibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    /// Set the type-specific definition.
    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the site permissions.
    #[must_use]
    pub fn with_resource_permission(mut self, permission: ResourcePermission) -> Self {
        self.resource_permission = Some(permission);
        self
    }
}

/// Request body for create and update: `{"blueprint": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintPayload {
    /// Blueprint fields.
    pub blueprint: BlueprintSpec,
}

impl From<BlueprintSpec> for BlueprintPayload {
    fn from(blueprint: BlueprintSpec) -> Self {
        Self { blueprint }
    }
}

/// Response of the list call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlueprintsResult {
    /// Matching blueprints.
    #[serde(default, deserialize_with = "null_as_default")]
    pub blueprints: Vec<Blueprint>,
    /// Paging metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaResult>,
}

/// Response of the get call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetBlueprintResult {
    /// The blueprint, when present.
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
}

/// Response of create, update and logo upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBlueprintResult {
    /// Whether the server accepted the change.
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    /// Server message.
    #[serde(rename = "msg", default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Field name to validation message.
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: HashMap<String, String>,
    /// The saved blueprint on success.
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
}

impl CreateBlueprintResult {
    /// Returns true if the server reported field errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Response of update and logo upload.
pub type UpdateBlueprintResult = CreateBlueprintResult;

/// Response of delete.
pub type DeleteBlueprintResult = DeleteResult;

/// Query filters for listing blueprints.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlueprintListParams {
    /// Exact name match.
    pub name: Option<String>,
    /// Free-text search.
    pub phrase: Option<String>,
    /// Filter by category.
    pub category: Option<String>,
    /// Filter by blueprint type.
    pub blueprint_type: Option<String>,
    /// Page size.
    pub max: Option<u32>,
    /// Page offset.
    pub offset: Option<u32>,
    /// Sort field.
    pub sort: Option<String>,
    /// Sort direction (`asc`/`desc`).
    pub direction: Option<String>,
    /// Additional raw filters.
    pub extra: BTreeMap<String, String>,
}

impl BlueprintListParams {
    /// Empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Search by phrase.
    #[must_use]
    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrase = Some(phrase.into());
        self
    }

    /// Set page size and offset.
    #[must_use]
    pub const fn with_page(mut self, max: u32, offset: u32) -> Self {
        self.max = Some(max);
        self.offset = Some(offset);
        self
    }

    /// Add a raw filter.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Convert to URL query parameters.
    #[must_use]
    pub fn to_query(&self) -> BTreeMap<String, String> {
        let mut params = QueryParams::new();
        params.extend(&self.extra);
        params.push_opt("name", self.name.as_ref());
        params.push_opt("phrase", self.phrase.as_ref());
        params.push_opt("category", self.category.as_ref());
        params.push_opt("type", self.blueprint_type.as_ref());
        params.push_opt("max", self.max);
        params.push_opt("offset", self.offset);
        params.push_opt("sort", self.sort.as_ref());
        params.push_opt("direction", self.direction.as_ref());
        params.into_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blueprint_list_params_to_query() {
        let params = BlueprintListParams::new()
            .with_name("tomcat")
            .with_page(25, 50)
            .with_filter("labels", "prod");

        let query = params.to_query();
        assert_eq!(query.get("name").map(String::as_str), Some("tomcat"));
        assert_eq!(query.get("max").map(String::as_str), Some("25"));
        assert_eq!(query.get("offset").map(String::as_str), Some("50"));
        assert_eq!(query.get("labels").map(String::as_str), Some("prod"));
        assert!(!query.contains_key("phrase"));
    }

    #[test]
    fn typed_filters_override_extra() {
        let params = BlueprintListParams::new()
            .with_filter("name", "raw")
            .with_name("typed");
        assert_eq!(params.to_query().get("name").map(String::as_str), Some("typed"));
    }

    #[test]
    fn blueprint_spec_skips_unset_fields() {
        let payload = BlueprintPayload::from(
            BlueprintSpec::new("tomcat", "morpheus")
                .with_labels(["web", "java"])
                .with_resource_permission(ResourcePermission::all_sites()),
        );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "blueprint": {
                    "name": "tomcat",
                    "type": "morpheus",
                    "labels": ["web", "java"],
                    "resourcePermission": {"all": true, "sites": []}
                }
            })
        );
    }

    #[test]
    fn blueprint_tolerates_nulls_and_missing_fields() {
        let blueprint: Blueprint = serde_json::from_value(json!({
            "id": 3,
            "name": "empty",
            "description": null,
            "labels": null,
            "owner": null
        }))
        .unwrap();

        assert_eq!(blueprint.id, BlueprintId::new(3));
        assert!(blueprint.description.is_empty());
        assert!(blueprint.labels.is_empty());
        assert_eq!(blueprint.owner, OwnerRef::default());
        assert!(blueprint.config.is_null());
        assert!(blueprint.date_created.is_none());
    }

    #[test]
    fn blueprint_null_ids_decode_as_default() {
        let blueprint: Blueprint = serde_json::from_value(json!({
            "id": null,
            "name": "orphan",
            "owner": {"id": null, "username": "svc"},
            "tenant": {"id": null, "name": "main"}
        }))
        .unwrap();

        assert_eq!(blueprint.id, BlueprintId::default());
        assert_eq!(blueprint.owner.username, "svc");
        assert_eq!(blueprint.tenant.name, "main");
    }

    #[test]
    fn malformed_timestamps_do_not_fail_the_list() {
        let result: ListBlueprintsResult = serde_json::from_value(json!({
            "blueprints": [
                {
                    "id": 1,
                    "name": "odd-dates",
                    "dateCreated": "2024-03-01 10:15:30",
                    "lastUpdated": 1_709_288_130
                },
                {
                    "id": 2,
                    "name": "good-dates",
                    "dateCreated": "2024-03-01T10:15:30Z",
                    "lastUpdated": null
                }
            ]
        }))
        .unwrap();

        assert_eq!(result.blueprints.len(), 2);
        assert!(result.blueprints[0].date_created.is_none());
        assert!(result.blueprints[0].last_updated.is_none());
        assert_eq!(
            result.blueprints[1].date_created.map(|d| d.to_rfc3339()),
            Some("2024-03-01T10:15:30+00:00".to_string())
        );
        assert!(result.blueprints[1].last_updated.is_none());
    }

    #[test]
    fn create_result_with_validation_errors() {
        let result: CreateBlueprintResult = serde_json::from_value(json!({
            "success": false,
            "msg": "Validation failed",
            "errors": {"name": "already exists"}
        }))
        .unwrap();

        assert!(!result.success);
        assert!(result.has_errors());
        assert_eq!(result.message, "Validation failed");
        assert!(result.blueprint.is_none());
    }
}
