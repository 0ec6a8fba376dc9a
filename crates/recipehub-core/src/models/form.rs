//! Editable text form of a recipe.
//!
//! Ingredients and steps are edited one per line and tags as a
//! comma-separated list; `RecipeDraft::to_payload` turns the text back into
//! the lists the API expects.

use std::collections::BTreeMap;

use super::{Recipe, RecipePayload};
use crate::utils::split_trimmed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Title,
    Description,
    Ingredients,
    Steps,
    Tags,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::Title,
        DraftField::Description,
        DraftField::Ingredients,
        DraftField::Steps,
        DraftField::Tags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Title => "Title",
            DraftField::Description => "Description",
            DraftField::Ingredients => "Ingredients (one per line)",
            DraftField::Steps => "Steps (one per line)",
            DraftField::Tags => "Tags (comma separated)",
        }
    }

    /// Whether Enter inserts a newline rather than moving on
    pub fn is_multiline(&self) -> bool {
        matches!(
            self,
            DraftField::Description | DraftField::Ingredients | DraftField::Steps
        )
    }

    pub fn next(&self) -> Self {
        match self {
            DraftField::Title => DraftField::Description,
            DraftField::Description => DraftField::Ingredients,
            DraftField::Ingredients => DraftField::Steps,
            DraftField::Steps => DraftField::Tags,
            DraftField::Tags => DraftField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            DraftField::Title => DraftField::Tags,
            DraftField::Description => DraftField::Title,
            DraftField::Ingredients => DraftField::Description,
            DraftField::Steps => DraftField::Ingredients,
            DraftField::Tags => DraftField::Steps,
        }
    }
}

/// Validation messages keyed by field. Empty means the draft is valid.
pub type FieldErrors = BTreeMap<DraftField, &'static str>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub steps: String,
    pub tags: String,
}

impl RecipeDraft {
    /// Prefill a draft from an existing recipe for editing.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.join("\n"),
            steps: recipe.steps.join("\n"),
            tags: recipe.tags.join(", "),
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Description => &self.description,
            DraftField::Ingredients => &self.ingredients,
            DraftField::Steps => &self.steps,
            DraftField::Tags => &self.tags,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Title => &mut self.title,
            DraftField::Description => &mut self.description,
            DraftField::Ingredients => &mut self.ingredients,
            DraftField::Steps => &mut self.steps,
            DraftField::Tags => &mut self.tags,
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.insert(DraftField::Title, "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.insert(DraftField::Description, "Description is required");
        }
        if self.ingredients.trim().is_empty() {
            errors.insert(DraftField::Ingredients, "Ingredients are required");
        }
        if self.steps.trim().is_empty() {
            errors.insert(DraftField::Steps, "Steps are required");
        }
        errors
    }

    /// Build the request body, or return the validation errors.
    pub fn to_payload(&self) -> Result<RecipePayload, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RecipePayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            ingredients: split_trimmed(&self.ingredients, '\n'),
            steps: split_trimmed(&self.steps, '\n'),
            tags: split_trimmed(&self.tags, ','),
        })
    }
}
