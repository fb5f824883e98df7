use crate::app::{App, Mode};
use crossterm::event::{KeyCode, KeyEvent};

/// Dispatch a key event to the handler for the current mode.
/// Returns false when the application should exit.
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert | Mode::Edit => handle_input_mode(app, key),
        Mode::Search => handle_search_mode(app, key),
        Mode::Confirm => handle_confirm_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('a') => app.begin_insert(),
        KeyCode::Char('e') => app.begin_edit(),
        KeyCode::Char('t') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') => app.request_delete_selected(),
        KeyCode::Char('x') => app.toggle_mark(),
        KeyCode::Char('D') => app.request_delete_marked(),
        KeyCode::Char('C') => app.complete_marked(),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('/') => app.begin_search(),
        KeyCode::Char('?') => app.mode = Mode::Help,
        KeyCode::Esc => {
            // Esc drops marks first, then an active search.
            if !app.marked.is_empty() {
                app.marked.clear();
            } else if !app.view.search.is_empty() {
                app.clear_search();
            }
        }
        _ => {}
    }
    true
}

/// Add/edit dialog: Enter submits, Esc cancels, everything else goes to the
/// text area.
fn handle_input_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_input(),
        _ => {
            app.input.input(key);
        }
    }
    true
}

/// Search is incremental: every keystroke recomputes the view.
fn handle_search_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.mode = Mode::Normal,
        KeyCode::Backspace => app.pop_search(),
        KeyCode::Char(c) => app.push_search(c),
        _ => {}
    }
    true
}

fn handle_confirm_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.execute_confirmed(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Left | KeyCode::Right
        | KeyCode::Tab => {
            app.confirm_yes = !app.confirm_yes;
        }
        KeyCode::Enter => {
            if app.confirm_yes {
                app.execute_confirmed();
            } else {
                app.cancel_confirm();
            }
        }
        _ => {}
    }
    true
}

fn handle_help_mode(app: &mut App, _key: KeyEvent) -> bool {
    app.mode = Mode::Normal;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;

    fn test_app() -> App {
        let store = TaskStore::load(Box::new(MemoryStorage::new())).unwrap();
        App::with_store(store, Config::default())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_input(app, KeyEvent::from(code))
    }

    #[test]
    fn test_quit_key_stops_the_loop() {
        let mut app = test_app();
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_navigation_keys_move_selection() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.store.add("b", None).unwrap();
        app.store.add("c", None).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 2);

        // Clamped at the end.
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 2);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_add_flow_through_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Insert);

        for c in "Buy milk".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn test_toggle_and_filter_keys() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Enter);
        assert!(app.store.tasks()[0].completed);

        // all -> pending: the completed task disappears from view.
        press(&mut app, KeyCode::Char('f'));
        assert!(app.visible.is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = test_app();
        app.store.add("a", None).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.mode, Mode::Confirm);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.store.len(), 0);
    }

    #[test]
    fn test_search_keys_filter_view() {
        let mut app = test_app();
        app.store.add("Buy milk", None).unwrap();
        app.store.add("Call dentist", None).unwrap();
        app.refresh_view();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.visible.len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.view.search, "den");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view.search, "");
        assert_eq!(app.visible.len(), 2);
    }

    #[test]
    fn test_help_opens_and_any_key_closes() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.mode, Mode::Normal);
    }
}
