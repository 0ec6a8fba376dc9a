//! One renderer per route.

mod auth;
mod detail;
mod form;
mod list;

use ratatui::{layout::Rect, Frame};

use crate::app::{App, View};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match &app.view {
        View::List(view) => list::render(frame, app, view, area),
        View::Detail(view) => detail::render(frame, app, view, area),
        View::Form(view) => form::render(frame, view, area),
        View::Auth(view) => auth::render(frame, view, area),
    }
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
