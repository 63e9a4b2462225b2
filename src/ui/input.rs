//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Screen};
use crate::models::Presence;

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('r') => {
            app.refresh_current_screen();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::PageUp => {
            app.page_up();
        }
        KeyCode::PageDown => {
            app.page_down();
        }
        _ => return handle_screen_input(app, key),
    }

    Ok(false)
}

/// Screen-specific keys
fn handle_screen_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.screen {
        Screen::Roster => match key.code {
            KeyCode::Enter => {
                app.open_selected_student();
            }
            KeyCode::Char('d') => {
                app.drop_selected_student();
            }
            _ => {}
        },
        Screen::Student => match key.code {
            KeyCode::Esc => {
                app.back_to_roster();
            }
            KeyCode::Char('p') => {
                app.set_selected_presence(Presence::Present);
            }
            KeyCode::Char('e') => {
                app.set_selected_presence(Presence::Excused);
            }
            KeyCode::Char('u') => {
                app.set_selected_presence(Presence::Unexcused);
            }
            _ => {}
        },
    }

    Ok(false)
}
