//! Recipe models.
//!
//! Backends disagree on a few details (`id` vs `_id`, tags as an array or a
//! comma-separated string), so recipes are parsed through `RecipeApi` and
//! converted into the clean `Recipe` domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;
use super::User;

/// Page size used by the listing when the server does not report one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// The author block embedded in a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl Author {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            id: obj.get("id").and_then(de::id_string),
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// A recipe as shown in the listing and detail views.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RecipeApi")]
pub struct Recipe {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub author_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    /// Parse a recipe from an API payload. Returns None for non-objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Id of the owning user: the author block first, then the flat fields.
    pub fn owner_id(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.id.as_deref())
            .or(self.author_id.as_deref())
            .or(self.user_id.as_deref())
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.owner_id().is_some_and(|owner| user.has_id(owner))
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Wire shape of a recipe. Every field is optional and tolerant of type drift.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecipeApi {
    #[serde(deserialize_with = "de::optional_id")]
    id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "de::optional_id")]
    legacy_id: Option<String>,
    #[serde(deserialize_with = "de::lenient_string")]
    title: String,
    #[serde(deserialize_with = "de::lenient_string")]
    description: String,
    #[serde(deserialize_with = "de::string_list")]
    ingredients: Vec<String>,
    #[serde(deserialize_with = "de::string_list")]
    steps: Vec<String>,
    #[serde(deserialize_with = "de::tag_list")]
    tags: Vec<String>,
    author: Option<Value>,
    #[serde(deserialize_with = "de::optional_id")]
    author_id: Option<String>,
    #[serde(deserialize_with = "de::optional_id")]
    user_id: Option<String>,
    #[serde(deserialize_with = "de::optional_datetime")]
    created_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", deserialize_with = "de::optional_datetime")]
    created_at_camel: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de::optional_datetime")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", deserialize_with = "de::optional_datetime")]
    updated_at_camel: Option<DateTime<Utc>>,
}

impl From<RecipeApi> for Recipe {
    fn from(api: RecipeApi) -> Self {
        Self {
            id: api.id.or(api.legacy_id),
            title: api.title,
            description: api.description,
            ingredients: api.ingredients,
            steps: api.steps,
            tags: api.tags,
            author: api.author.as_ref().and_then(Author::from_value),
            author_id: api.author_id,
            user_id: api.user_id,
            created_at: api.created_at.or(api.created_at_camel),
            updated_at: api.updated_at.or(api.updated_at_camel),
        }
    }
}

/// One page of the recipe listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePage {
    pub items: Vec<Recipe>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    /// Whether `total` came from the server rather than the item count
    total_reported: bool,
}

impl RecipePage {
    /// Normalize a listing response.
    ///
    /// Accepts either a bare array of recipes or an object of the form
    /// `{ items, page, limit, total }`; missing fields fall back to the
    /// requested page, the default page size and the item count.
    pub fn from_response(data: &Value, requested_page: u32) -> Self {
        let parse_items = |items: &[Value]| -> Vec<Recipe> {
            items.iter().filter_map(Recipe::from_value).collect()
        };

        match data {
            Value::Array(items) => {
                let items = parse_items(items);
                Self {
                    total: items.len() as u64,
                    items,
                    page: requested_page,
                    limit: DEFAULT_PAGE_SIZE,
                    total_reported: false,
                }
            }
            Value::Object(obj) => {
                let items = obj
                    .get("items")
                    .and_then(Value::as_array)
                    .map(|items| parse_items(items))
                    .unwrap_or_default();
                let reported_total = obj.get("total").and_then(de::positive_u64);
                let to_u32 = |v: u64| u32::try_from(v).ok();
                Self {
                    page: obj
                        .get("page")
                        .and_then(de::positive_u64)
                        .and_then(to_u32)
                        .unwrap_or(requested_page),
                    limit: obj
                        .get("limit")
                        .and_then(de::positive_u64)
                        .and_then(to_u32)
                        .unwrap_or(DEFAULT_PAGE_SIZE),
                    total: reported_total.unwrap_or(items.len() as u64),
                    total_reported: reported_total.is_some(),
                    items,
                }
            }
            _ => Self::empty(requested_page),
        }
    }

    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
            total_reported: false,
        }
    }

    /// Whether a following page is expected to hold more recipes.
    pub fn has_next_page(&self) -> bool {
        if self.total_reported {
            u64::from(self.page) * u64::from(self.limit) < self.total
        } else {
            self.limit > 0 && self.items.len() as u64 >= u64::from(self.limit)
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_full_recipe() {
        let value = json!({
            "id": 7,
            "title": "Creamy Tomato Pasta",
            "description": "Weeknight dinner",
            "ingredients": ["200g pasta", "1 can tomatoes"],
            "steps": ["Boil pasta", "Simmer sauce"],
            "tags": ["quick", "dinner"],
            "author": {"id": 3, "name": "Jane Doe"},
            "created_at": "2024-03-09T12:00:00Z"
        });

        let recipe = Recipe::from_value(&value).unwrap();
        assert_eq!(recipe.id.as_deref(), Some("7"));
        assert_eq!(recipe.title, "Creamy Tomato Pasta");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.tags, vec!["quick", "dinner"]);
        assert_eq!(recipe.author_name(), "Jane Doe");
        assert_eq!(recipe.owner_id(), Some("3"));
        assert_eq!(
            recipe.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_tolerates_shape_drift() {
        let value = json!({
            "_id": "abc123",
            "title": "Toast",
            "ingredients": "bread",
            "steps": null,
            "tags": "breakfast, quick ,",
            "author": "someone",
            "createdAt": "yesterday"
        });

        let recipe = Recipe::from_value(&value).unwrap();
        assert_eq!(recipe.id.as_deref(), Some("abc123"));
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
        assert_eq!(recipe.tags, vec!["breakfast", "quick"]);
        assert!(recipe.author.is_none());
        assert_eq!(recipe.author_name(), "Unknown");
        assert!(recipe.created_at.is_none());
        assert_eq!(recipe.description, "");
    }

    #[test]
    fn test_non_object_is_not_a_recipe() {
        assert!(Recipe::from_value(&json!("text")).is_none());
        assert!(Recipe::from_value(&json!(null)).is_none());
    }

    #[test]
    fn test_owner_id_precedence() {
        let flat = Recipe::from_value(&json!({"author_id": 5, "user_id": 6})).unwrap();
        assert_eq!(flat.owner_id(), Some("5"));

        let user_only = Recipe::from_value(&json!({"user_id": "u-6"})).unwrap();
        assert_eq!(user_only.owner_id(), Some("u-6"));

        let none = Recipe::from_value(&json!({"title": "x"})).unwrap();
        assert_eq!(none.owner_id(), None);
    }

    #[test]
    fn test_is_owned_by() {
        let recipe = Recipe::from_value(&json!({"author": {"id": 1}})).unwrap();
        let owner = User::from_value(&json!({"id": 1, "name": "Ann"}));
        let legacy_owner = User::from_value(&json!({"_id": "1"}));
        let other = User::from_value(&json!({"id": 2}));

        assert!(recipe.is_owned_by(&owner));
        assert!(recipe.is_owned_by(&legacy_owner));
        assert!(!recipe.is_owned_by(&other));

        let unowned = Recipe::from_value(&json!({"title": "x"})).unwrap();
        assert!(!unowned.is_owned_by(&owner));
    }

    #[test]
    fn test_page_from_array() {
        let data = json!([{"id": 1}, {"id": 2}, "junk"]);
        let page = RecipePage::from_response(&data, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 3);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total, 2);
        assert!(!page.has_next_page());
        assert!(page.has_previous_page());
    }

    #[test]
    fn test_page_from_object_with_defaults() {
        let data = json!({"items": [{"id": 1}], "page": 0});
        let page = RecipePage::from_response(&data, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_page_from_unexpected_payload() {
        let page = RecipePage::from_response(&json!("<html>"), 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next_page());
        assert!(!page.has_previous_page());
    }

    #[test]
    fn test_has_next_page_with_reported_total() {
        let items: Vec<Value> = (0..12).map(|i| json!({"id": i})).collect();
        let first = RecipePage::from_response(
            &json!({"items": items, "page": 1, "limit": 12, "total": 30}),
            1,
        );
        assert!(first.has_next_page());

        let last = RecipePage::from_response(
            &json!({"items": [{"id": 25}], "page": 3, "limit": 12, "total": 25}),
            3,
        );
        assert!(!last.has_next_page());

        let exact = RecipePage::from_response(
            &json!({"items": items, "page": 2, "limit": 12, "total": 24}),
            2,
        );
        assert!(!exact.has_next_page());
    }

    #[test]
    fn test_has_next_page_without_total() {
        let full: Vec<Value> = (0..12).map(|i| json!({"id": i})).collect();
        assert!(RecipePage::from_response(&Value::Array(full), 1).has_next_page());

        let short = json!({"items": [{"id": 1}, {"id": 2}], "limit": 12});
        assert!(!RecipePage::from_response(&short, 1).has_next_page());
    }

    #[test]
    fn test_payload_serializes_all_fields() {
        let payload = RecipePayload {
            title: "Soup".to_string(),
            description: "Warm".to_string(),
            ingredients: vec!["water".to_string()],
            steps: vec!["boil".to_string()],
            tags: vec![],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "title": "Soup",
                "description": "Warm",
                "ingredients": ["water"],
                "steps": ["boil"],
                "tags": []
            })
        );
    }
}
