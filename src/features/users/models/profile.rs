use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::serde_ext::double_option;

/// Table holding one profile row per auth user
pub const PROFILES_TABLE: &str = "profiles";

/// Row of the `profiles` table. `id` is the auth user's ID (foreign key
/// enforced by the backend).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editable display fields, as selected by the account editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileFields {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileFields {
    /// Column list for `select=`
    pub const COLUMNS: &'static str = "username,website,avatar_url";
}

/// Insert payload for a freshly signed-up user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Insert-or-update record written by the account editor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpsert {
    pub id: String,
    pub username: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileUpsert {
    pub fn new(id: impl Into<String>, fields: ProfileFields, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            username: fields.username,
            website: fields.website,
            avatar_url: fields.avatar_url,
            updated_at,
        }
    }
}

/// Partial update limited to the editable columns.
///
/// Absent keys are left untouched, explicit `null` clears the column. Any key
/// outside this set fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProfileChanges {
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub username: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub website: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.website.is_none() && self.avatar_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changes_forward_present_keys_only() {
        let changes: ProfileChanges =
            serde_json::from_value(json!({"website": "https://a.test", "avatar_url": null}))
                .unwrap();
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({"website": "https://a.test", "avatar_url": null})
        );
    }

    #[test]
    fn test_changes_reject_unknown_keys() {
        let result = serde_json::from_value::<ProfileChanges>(json!({"id": "other-user"}));
        assert!(result.is_err());
        let result = serde_json::from_value::<ProfileChanges>(json!({"role": "admin"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            username: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_new_profile_omits_missing_optionals() {
        let profile = NewProfile {
            id: "u1".to_string(),
            username: "a".to_string(),
            website: None,
            avatar_url: Some("u1.png".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"id": "u1", "username": "a", "avatar_url": "u1.png"})
        );
    }

    #[test]
    fn test_profile_tolerates_extra_columns() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "42",
            "username": "x",
            "full_name": "ignored",
            "updated_at": "2024-01-02T03:04:05+00:00"
        }))
        .unwrap();
        assert_eq!(profile.username.as_deref(), Some("x"));
        assert!(profile.website.is_none());
        assert!(profile.updated_at.is_some());
    }

    #[test]
    fn test_upsert_keeps_nulls() {
        let now = Utc::now();
        let upsert = ProfileUpsert::new("u1", ProfileFields::default(), now);
        let value = serde_json::to_value(&upsert).unwrap();
        assert_eq!(value["id"], "u1");
        assert!(value["username"].is_null());
        assert!(value.get("updated_at").is_some());
    }
}
