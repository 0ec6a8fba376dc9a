use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use recipehub_core::models::DraftField;

use crate::app::FormView;
use crate::ui::styles;

pub fn render(frame: &mut Frame, view: &FormView, area: Rect) {
    let heading = if view.editing.is_some() {
        " Edit Recipe "
    } else {
        " Create Recipe "
    };
    let outer = Block::default()
        .title(heading)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if view.loading {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading recipe...", styles::muted_style())),
            inner,
        );
        return;
    }

    if view.load_failed {
        let message = view.error.as_deref().unwrap_or("Failed to load recipe");
        let lines = vec![
            Line::from(Span::styled(message.to_string(), styles::error_style())),
            Line::from(""),
            Line::from(Span::styled("[Esc] back", styles::muted_style())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Length(3), // Title
            Constraint::Length(5), // Description
            Constraint::Min(5),    // Ingredients
            Constraint::Min(5),    // Steps
            Constraint::Length(3), // Tags
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(view)), rows[0]);

    for (field, area) in DraftField::ALL.into_iter().zip(rows.iter().skip(1)) {
        render_field(frame, view, field, *area);
    }
}

fn status_line(view: &FormView) -> Line<'static> {
    if view.submitting {
        return Line::from(Span::styled("Saving...", styles::muted_style()));
    }
    if let Some(ref error) = view.error {
        return Line::from(Span::styled(error.clone(), styles::error_style()));
    }
    if !view.errors.is_empty() {
        return Line::from(Span::styled(
            "Please fix the highlighted fields",
            styles::error_style(),
        ));
    }
    let label = if view.editing.is_some() {
        "Update Recipe"
    } else {
        "Create Recipe"
    };
    Line::from(vec![
        Span::styled("[Ctrl+S] ", styles::help_key_style()),
        Span::styled(label, styles::muted_style()),
    ])
}

fn render_field(frame: &mut Frame, view: &FormView, field: DraftField, area: Rect) {
    let focused = view.focus == field && !view.submitting;
    let mut block = Block::default()
        .title(format!(" {} ", field.label()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));
    if let Some(message) = view.errors.get(&field) {
        block = block.title_bottom(Line::from(format!(" {} ", message)).style(styles::error_style()));
    }

    let text = view.draft.field(field);
    let mut lines: Vec<Line> = text.split('\n').map(|l| Line::from(l.to_string())).collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.push_span(Span::styled("▌", styles::highlight_style()));
        }
    }

    // Keep the end of the text, where typing happens, in view
    let visible = area.height.saturating_sub(2) as usize;
    let offset = lines.len().saturating_sub(visible.max(1));

    let paragraph = Paragraph::new(lines)
        .style(styles::field_style(focused))
        .block(block)
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}
