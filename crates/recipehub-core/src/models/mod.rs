//! Data models for Recipe Hub entities.
//!
//! - `Recipe`, `Author`: a recipe as returned by the backend, parsed leniently
//! - `RecipePage`: one page of the recipe listing
//! - `RecipePayload`: the body sent on create and update
//! - `RecipeDraft`: the editable text form of a recipe, with validation
//! - `User`: the signed-in user profile held by the session

mod de;
pub mod form;
pub mod recipe;
pub mod user;

pub use form::{DraftField, FieldErrors, RecipeDraft};
pub use recipe::{Author, Recipe, RecipePage, RecipePayload, DEFAULT_PAGE_SIZE};
pub use user::User;
