//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use recipehub_core::models::DraftField;
use recipehub_core::Route;

use crate::app::{can_add_char, App, AppState, AuthField, View, PAGE_SCROLL_SIZE};

/// Longest text accepted in a recipe form field
const MAX_DRAFT_FIELD_LENGTH: usize = 10_000;

const MAX_SEARCH_LENGTH: usize = 100;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Handle delete confirmation
    if matches!(app.state, AppState::ConfirmingDelete) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        handle_search_input(app, key);
        return false;
    }

    // Forms take every printable key, so they get input before the global keys
    match app.view {
        View::Form(_) => {
            handle_form_input(app, key);
            return false;
        }
        View::Auth(_) => {
            handle_auth_input(app, key);
            return false;
        }
        View::List(_) | View::Detail(_) => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return false;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return false;
        }
        KeyCode::Char('c') => {
            app.navigate(Route::CreateRecipe);
            return false;
        }
        KeyCode::Char('l') if !app.is_authenticated() => {
            app.navigate(Route::Login);
            return false;
        }
        KeyCode::Char('r') if !app.is_authenticated() => {
            app.navigate(Route::Register);
            return false;
        }
        KeyCode::Char('L') => {
            app.logout();
            return false;
        }
        KeyCode::Char('u') => {
            app.reload();
            return false;
        }
        _ => {}
    }

    match app.view {
        View::List(_) => handle_list_input(app, key),
        View::Detail(_) => handle_detail_input(app, key),
        View::Form(_) | View::Auth(_) => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            // Restore the query of the listing being shown
            if let View::List(list) = &app.view {
                app.search_input = list.query.clone();
            }
        }
        KeyCode::Enter => app.submit_search(),
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_char(app.search_input.chars().count(), MAX_SEARCH_LENGTH, c) {
                app.search_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_list_input(app: &mut App, key: KeyEvent) {
    let View::List(list) = &mut app.view else {
        return;
    };
    let count = list.items().len();

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            list.selection = list.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if list.selection + 1 < count {
                list.selection += 1;
            }
        }
        KeyCode::Home => list.selection = 0,
        KeyCode::End => list.selection = count.saturating_sub(1),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('n') | KeyCode::Right => app.next_page(),
        KeyCode::Char('p') | KeyCode::Left => app.prev_page(),
        KeyCode::Esc if !list.query.is_empty() => {
            // Clear an active search
            app.search_input.clear();
            app.navigate(Route::home());
        }
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    let View::Detail(detail) = &mut app.view else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),
        KeyCode::Up | KeyCode::Char('k') => {
            detail.scroll = detail.scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            detail.scroll = detail.scroll.saturating_add(1);
        }
        KeyCode::PageUp => {
            detail.scroll = detail.scroll.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            detail.scroll = detail.scroll.saturating_add(PAGE_SCROLL_SIZE);
        }
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('d') => app.request_delete(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('s') {
            app.submit_form();
        }
        return;
    }

    let View::Form(form) = &mut app.view else {
        return;
    };
    if form.submitting || form.load_failed {
        if key.code == KeyCode::Esc {
            app.go_back();
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_back(),
        KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::BackTab => form.focus = form.focus.prev(),
        // Arrows move between fields only where they are not editing lines
        KeyCode::Down if !form.focus.is_multiline() => form.focus = form.focus.next(),
        KeyCode::Up if !form.focus.is_multiline() => form.focus = form.focus.prev(),
        KeyCode::Enter => {
            if form.focus.is_multiline() {
                form.draft.field_mut(form.focus).push('\n');
            } else if form.focus == DraftField::Tags {
                // Enter on the last field submits
                app.submit_form();
            } else {
                form.focus = form.focus.next();
            }
        }
        KeyCode::Backspace => {
            form.draft.field_mut(form.focus).pop();
            form.errors.remove(&form.focus);
        }
        KeyCode::Char(c) => {
            let field = form.draft.field_mut(form.focus);
            if can_add_char(field.chars().count(), MAX_DRAFT_FIELD_LENGTH, c) {
                field.push(c);
                form.errors.remove(&form.focus);
            }
        }
        _ => {}
    }
}

fn handle_auth_input(app: &mut App, key: KeyEvent) {
    let View::Auth(auth) = &mut app.view else {
        return;
    };
    if auth.submitting {
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_back(),
        KeyCode::Down | KeyCode::Tab => {
            // Move to next field
            auth.focus = auth.focus.next(auth.mode);
        }
        KeyCode::Up | KeyCode::BackTab => {
            // Move to previous field
            auth.focus = auth.focus.prev(auth.mode);
        }
        KeyCode::Enter => match auth.focus {
            AuthField::Name | AuthField::Email => auth.focus = auth.focus.next(auth.mode),
            AuthField::Password | AuthField::Submit => app.submit_auth(),
            AuthField::Switch => {
                let target = auth.mode.switch_route();
                app.navigate(target);
            }
        },
        KeyCode::Backspace => {
            if let Some((input, _)) = auth.focused_input() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some((input, max_len)) = auth.focused_input() {
                if can_add_char(input.chars().count(), max_len, c) {
                    input.push(c);
                }
            }
        }
        _ => {}
    }
}
