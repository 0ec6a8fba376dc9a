//! Terminal UI module using ratatui.
//!
//! - `render`: Frame layout, title and status bars, overlays
//! - `views`: One renderer per route (list, detail, form, auth)
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
