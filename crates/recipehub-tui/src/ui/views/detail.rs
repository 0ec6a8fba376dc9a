use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use recipehub_core::models::Recipe;
use recipehub_core::utils::format_date;

use crate::app::{App, DetailView};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, view: &DetailView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if view.loading {
        let loading = Paragraph::new(Span::styled("Loading recipe...", styles::muted_style()));
        frame.render_widget(loading.block(block), area);
        return;
    }

    let Some(ref recipe) = view.recipe else {
        let message = view.error.as_deref().unwrap_or("Recipe not found");
        let lines = vec![
            Line::from(Span::styled(message.to_string(), styles::error_style())),
            Line::from(""),
            Line::from(Span::styled("[Esc] back to recipes", styles::muted_style())),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let mut lines = recipe_lines(recipe);
    if let Some(ref error) = view.error {
        lines.insert(0, Line::from(""));
        lines.insert(0, Line::from(Span::styled(error.clone(), styles::error_style())));
    }
    if app.owns_current_recipe() {
        lines.push(Line::from(""));
        let actions = if view.deleting {
            Span::styled("Deleting...", styles::muted_style())
        } else {
            Span::styled("[e] Edit  [d] Delete", styles::highlight_style())
        };
        lines.push(Line::from(actions));
    }

    let paragraph = Paragraph::new(lines)
        .block(block.title(format!(" {} ", recipe.title)).title_style(styles::title_style()))
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, styles::highlight_style()))
}

fn recipe_lines(recipe: &Recipe) -> Vec<Line<'static>> {
    let mut byline = format!("by {}", recipe.author_name());
    if let Some(ref created) = recipe.created_at {
        byline.push_str(&format!(" · {}", format_date(created)));
    }

    let mut lines = vec![Line::from(Span::styled(byline, styles::muted_style()))];

    if !recipe.tags.is_empty() {
        let mut spans = Vec::new();
        for tag in &recipe.tags {
            spans.push(Span::styled(format!("#{}", tag), styles::tag_style()));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }

    if !recipe.description.is_empty() {
        lines.push(Line::from(""));
        lines.extend(recipe.description.lines().map(|l| Line::from(l.to_string())));
    }

    lines.push(Line::from(""));
    lines.push(section("Ingredients"));
    if recipe.ingredients.is_empty() {
        lines.push(Line::from(Span::styled("  none listed", styles::muted_style())));
    }
    for ingredient in &recipe.ingredients {
        lines.push(Line::from(format!("  • {}", ingredient)));
    }

    lines.push(Line::from(""));
    lines.push(section("Steps"));
    if recipe.steps.is_empty() {
        lines.push(Line::from(Span::styled("  none listed", styles::muted_style())));
    }
    for (i, step) in recipe.steps.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>2}. ", i + 1), styles::help_key_style()),
            Span::raw(step.clone()),
        ]));
    }
    lines
}
