use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use recipehub_core::models::Recipe;
use recipehub_core::utils::{age_display, truncate_string};

use crate::app::{App, AppState, ListView};
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, view: &ListView, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_search_bar(frame, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_recipe_list(frame, view, columns[0]);
    render_preview(frame, view, columns[1]);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let searching = app.state == AppState::Searching;
    let line = if searching {
        Line::from(vec![
            Span::styled(app.search_input.clone(), styles::search_style()),
            Span::styled("▌", styles::search_style()),
        ])
    } else if app.search_input.is_empty() {
        Line::from(Span::styled("Press / to search recipes...", styles::muted_style()))
    } else {
        Line::from(vec![
            Span::styled(app.search_input.clone(), styles::search_style()),
            Span::styled("  [Esc] clear", styles::muted_style()),
        ])
    };

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn pagination_hint(view: &ListView) -> String {
    let has_next = view.recipes.as_ref().is_some_and(|p| p.has_next_page());
    let prev = if view.page > 1 { "[p] prev  " } else { "" };
    let next = if has_next { "  [n] next" } else { "" };
    format!(" {}Page {}{} ", prev, view.page, next)
}

fn render_recipe_list(frame: &mut Frame, view: &ListView, area: Rect) {
    let title = if view.query.is_empty() {
        " Discover Recipes ".to_string()
    } else {
        format!(" Results for \"{}\" ", truncate_string(&view.query, 30))
    };
    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .title_bottom(Line::from(pagination_hint(view)).style(styles::muted_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if view.loading {
        let loading = Paragraph::new(Span::styled("Loading recipes...", styles::muted_style()));
        frame.render_widget(loading.block(block), area);
        return;
    }
    if let Some(ref error) = view.error {
        let error = Paragraph::new(Span::styled(error.clone(), styles::error_style()))
            .wrap(Wrap { trim: true });
        frame.render_widget(error.block(block), area);
        return;
    }
    if view.items().is_empty() {
        let empty = Paragraph::new(Span::styled("No recipes found.", styles::muted_style()));
        frame.render_widget(empty.block(block), area);
        return;
    }

    let title_width = (area.width as usize).saturating_sub(24).max(10);
    let items: Vec<ListItem> = view
        .items()
        .iter()
        .enumerate()
        .map(|(i, recipe)| {
            let style = if i == view.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            let line = Line::from(vec![
                Span::raw(format!(
                    "{:<width$}",
                    truncate_string(&recipe.title, title_width),
                    width = title_width
                )),
                Span::styled(
                    format!(" {}", truncate_string(recipe.author_name(), 18)),
                    styles::muted_style(),
                ),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(view.selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_preview(frame: &mut Frame, view: &ListView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(recipe) = view.selected().filter(|_| !view.loading) else {
        frame.render_widget(block, area);
        return;
    };

    let paragraph = Paragraph::new(preview_lines(recipe))
        .block(block.title(format!(" {} ", recipe.title)).title_style(styles::title_style()))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn preview_lines(recipe: &Recipe) -> Vec<Line<'static>> {
    let mut byline = vec![Span::styled(
        format!("by {}", recipe.author_name()),
        styles::muted_style(),
    )];
    if let Some(ref created) = recipe.created_at {
        byline.push(Span::styled(format!(" · {}", age_display(created)), styles::muted_style()));
    }

    let mut lines = vec![Line::from(byline), Line::from("")];
    if !recipe.description.is_empty() {
        lines.push(Line::from(recipe.description.clone()));
        lines.push(Line::from(""));
    }
    if !recipe.tags.is_empty() {
        let tags = recipe
            .tags
            .iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(Line::from(Span::styled(tags, styles::tag_style())));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "{} ingredients · {} steps",
            recipe.ingredients.len(),
            recipe.steps.len()
        ),
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[Enter] open", styles::muted_style())));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipehub_core::models::RecipePage;
    use serde_json::json;

    fn listing(page: u32, data: serde_json::Value) -> ListView {
        ListView {
            page,
            recipes: Some(RecipePage::from_response(&data, page)),
            ..ListView::default()
        }
    }

    #[test]
    fn test_pagination_hint() {
        let full: Vec<_> = (0..12).map(|i| json!({"id": i, "title": "x"})).collect();
        assert_eq!(pagination_hint(&listing(1, json!(full))), " Page 1  [n] next ");

        let last = json!({"items": [{"id": 1}], "page": 3, "limit": 12, "total": 25});
        assert_eq!(pagination_hint(&listing(3, last)), " [p] prev  Page 3 ");
    }

    #[test]
    fn test_preview_lines_summarize_recipe() {
        let recipe = Recipe::from_value(&json!({
            "id": 1,
            "title": "Soup",
            "description": "Warm",
            "ingredients": ["water", "salt"],
            "steps": ["boil"],
            "tags": "easy, quick",
            "author": {"id": 2, "name": "Bo"}
        }))
        .unwrap();

        let text: Vec<String> = preview_lines(&recipe).iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "by Bo");
        assert!(text.contains(&"#easy #quick".to_string()));
        assert!(text.contains(&"2 ingredients · 1 steps".to_string()));
    }
}
