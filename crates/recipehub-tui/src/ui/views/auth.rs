use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{AuthField, AuthMode, AuthView};
use crate::ui::styles;

use super::centered_rect_fixed;

/// Visible width of a text field
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, view: &AuthView, area: Rect) {
    let fields: u16 = match view.mode {
        AuthMode::Login => 2,
        AuthMode::Register => 3,
    };
    let height = 10 + fields + if view.error.is_some() { 2 } else { 0 };
    let area = centered_rect_fixed(50, height, area);

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", view.mode.title()),
            styles::title_style(),
        )),
        Line::from(""),
    ];

    if view.mode == AuthMode::Register {
        lines.push(text_field(view, AuthField::Name, "Name:    ", &view.name));
    }
    lines.push(text_field(view, AuthField::Email, "Email:   ", &view.email));
    let masked = "*".repeat(view.password.chars().count());
    lines.push(text_field(view, AuthField::Password, "Password:", &masked));

    // Submit button
    lines.push(Line::from(""));
    let label = view.mode.submit_label(view.submitting);
    let button_focused = view.focus == AuthField::Submit;
    let button = if button_focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button, styles::field_style(button_focused)),
        Span::raw("]"),
    ]));

    // Link to the other form
    lines.push(Line::from(""));
    let switch_focused = view.focus == AuthField::Switch;
    let switch_style = if switch_focused {
        styles::selected_style()
    } else {
        styles::highlight_style()
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(view.mode.switch_label(), switch_style),
    ]));

    // Error message
    if let Some(ref error) = view.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn text_field(view: &AuthView, field: AuthField, label: &'static str, text: &str) -> Line<'static> {
    let focused = view.focus == field && !view.submitting;
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{} [", label), styles::muted_style()),
        Span::styled(
            format!("{}{}", field_display(text, FIELD_WIDTH), cursor),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Fit text into a fixed width field, showing the tail when it overflows.
fn field_display(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let tail: String = text.chars().skip(len.saturating_sub(width)).collect();
    format!("{:<width$}", tail, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_display_pads_short_text() {
        assert_eq!(field_display("ab", 4), "ab  ");
        assert_eq!(field_display("", 3), "   ");
    }

    #[test]
    fn test_field_display_keeps_tail() {
        assert_eq!(field_display("someone@example.com", 7), "ple.com");
        assert_eq!(field_display("añbñc", 3), "bñc");
    }
}
