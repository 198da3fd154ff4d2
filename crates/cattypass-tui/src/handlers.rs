//! Keyboard event handling.

use crate::app::{App, AppState, InputMode, Overlay, Tab};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle a key event. Returns true if the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.state = AppState::Quit;
        return true;
    }

    if !matches!(app.overlay, Overlay::None) {
        handle_overlay_key(app, key);
        return false;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Editing => handle_editing_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::ImportPath => handle_import_key(app, key),
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) {
    match app.overlay {
        Overlay::None => {}
        Overlay::Message(_) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.close_overlay();
            }
        }
        Overlay::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_overlay(),
            _ => {}
        },
        Overlay::Edit(_) => handle_edit_modal_key(app, key),
    }
}

fn handle_edit_modal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => app.save_edit(),
        code => {
            let Overlay::Edit(form) = &mut app.overlay else {
                return;
            };
            match code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
                KeyCode::Backspace => {
                    form.field_mut(form.focus).pop();
                }
                KeyCode::Char(c) => form.field_mut(form.focus).push(c),
                _ => {}
            }
        }
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+F to search
    if key.code == KeyCode::Char('f') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.tab == Tab::Manage {
            app.start_search();
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quit;
            return true;
        }
        KeyCode::Tab | KeyCode::Right => {
            app.set_active_tab(app.tab.next());
            return false;
        }
        KeyCode::BackTab | KeyCode::Left => {
            app.set_active_tab(app.tab.previous());
            return false;
        }
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.set_active_tab(Tab::ALL[index]);
            return false;
        }
        _ => {}
    }

    match app.tab {
        Tab::Generate => handle_generate_key(app, key),
        Tab::Manage => handle_manage_key(app, key),
        Tab::Settings => handle_settings_key(app, key),
        Tab::Credits => {}
    }
    false
}

fn handle_generate_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('g') => app.generate(),
        KeyCode::Char('s') => app.save_generated(),
        KeyCode::Char('j') | KeyCode::Down => app.form.focus_next(),
        KeyCode::Char('k') | KeyCode::Up => app.form.focus_previous(),
        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
        _ => {}
    }
}

fn handle_manage_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('r') => app.load_passwords(),
        KeyCode::Char('p') => app.show_passwords = !app.show_passwords,
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('x') => app.export(),
        KeyCode::Char('i') => app.start_import(),
        _ => {}
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Tab => app.form.focus_next(),
        KeyCode::BackTab => app.form.focus_previous(),
        KeyCode::Backspace => {
            app.form.field_mut(app.form.focus).pop();
        }
        KeyCode::Char(c) => app.form.field_mut(app.form.focus).push(c),
        _ => {}
    }
    false
}

fn handle_import_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.import_path.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.import(),
        KeyCode::Backspace => {
            app.import_path.pop();
        }
        KeyCode::Char(c) => app.import_path.push(c),
        _ => {}
    }
    false
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.exit_search();
            false
        }
        KeyCode::Enter => {
            app.select_search_result();
            false
        }
        KeyCode::Up => {
            if app.search_selected_index > 0 {
                app.search_selected_index -= 1;
            }
            false
        }
        KeyCode::Down => {
            if app.search_selected_index + 1 < app.search_results.len() {
                app.search_selected_index += 1;
            }
            false
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.perform_search();
            false
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.perform_search();
            false
        }
        _ => false,
    }
}
