use serde_json::Value;

use super::de;

/// The signed-in user, read leniently from the stored profile object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    /// Some backends identify users by `_id` instead of (or as well as) `id`
    pub legacy_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            id: value.get("id").and_then(de::id_string),
            legacy_id: value.get("_id").and_then(de::id_string),
            name: text("name"),
            email: text("email"),
        }
    }

    /// Whether `id` identifies this user under either id field.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id) || self.legacy_id.as_deref() == Some(id)
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Signed in")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let user = User::from_value(&json!({"id": 1, "name": "Ann", "email": "ann@example.com"}));
        assert_eq!(user.id.as_deref(), Some("1"));
        assert_eq!(user.display_name(), "Ann");
        assert!(user.has_id("1"));
        assert!(!user.has_id("2"));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let email_only = User::from_value(&json!({"email": "bo@example.com", "name": ""}));
        assert_eq!(email_only.display_name(), "bo@example.com");

        let anonymous = User::from_value(&json!({"id": 9}));
        assert_eq!(anonymous.display_name(), "Signed in");
    }

    #[test]
    fn test_non_object_user_is_empty() {
        assert_eq!(User::from_value(&json!("nope")), User::default());
    }
}
