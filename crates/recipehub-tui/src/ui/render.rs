use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, View};

use super::styles;
use super::views::{self, centered_rect_fixed};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    views::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::Normal | AppState::Searching | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Recipe Hub";
    let section = format!("  /  {}", app.route.title());

    let mut right = vec![];
    match app.user {
        Some(ref user) => {
            right.push(Span::styled(format!("● {}", user.display_name()), styles::success_style()));
            right.push(Span::styled("  [c] Create  [L] Logout", styles::muted_style()));
        }
        None => {
            right.push(Span::styled("[l] Login  [r] Register", styles::muted_style()));
        }
    }
    right.push(Span::styled("  [?] Help  ", styles::muted_style()));

    let used: usize = title.chars().count()
        + section.chars().count()
        + right.iter().map(|s| s.content.chars().count()).sum::<usize>();
    let padding = (area.width as usize).saturating_sub(used);

    let mut spans = vec![
        Span::styled(title, styles::title_style()),
        Span::styled(section, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
    ];
    spans.extend(right);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match (&app.state, &app.view) {
        (AppState::Searching, _) => "[Enter] search | [Esc] cancel",
        (_, View::List(_)) => "[/] search | [n/p] page | [Enter] open | [u]pdate | [q]uit",
        (_, View::Detail(_)) if app.owns_current_recipe() => {
            "[e]dit | [d]elete | [Esc] back | [q]uit"
        }
        (_, View::Detail(_)) => "[↑/↓] scroll | [Esc] back | [q]uit",
        (_, View::Form(_)) => "[Tab] next field | [Ctrl+S] save | [Esc] cancel",
        (_, View::Auth(_)) => "[Tab] next field | [Enter] submit | [Esc] back",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.route.path()),
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 25, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Recipe Hub", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Recipes", styles::highlight_style())),
        help_line("↑/↓", "Navigate list"),
        help_line("Enter", "Open recipe"),
        help_line("/", "Search"),
        help_line("n / p", "Next / previous page"),
        help_line("u", "Reload from server"),
        Line::from(""),
        Line::from(Span::styled(" Your recipes", styles::highlight_style())),
        help_line("c", "Create recipe"),
        help_line("e / d", "Edit / delete (owner only)"),
        help_line("Ctrl+S", "Save form"),
        Line::from(""),
        Line::from(Span::styled(" Account", styles::highlight_style())),
        help_line("l / r", "Login / register"),
        help_line("L", "Logout"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_confirm_overlay(frame: &mut Frame, question: String, action: &'static str) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", question), styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(format!(" to {}, ", action), styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    render_confirm_overlay(frame, "Are you sure you want to quit?".to_string(), "quit");
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let title = match &app.view {
        View::Detail(detail) => detail.recipe.as_ref().map(|r| r.title.as_str()),
        _ => None,
    };
    let question = match title {
        Some(title) => format!(
            "Delete \"{}\"?",
            recipehub_core::utils::truncate_string(title, 24)
        ),
        None => "Delete this recipe?".to_string(),
    };
    render_confirm_overlay(frame, question, "delete");
}
