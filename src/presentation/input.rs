use crate::application::{App, Field, FieldKind, REPORT_FILENAME, Screen};
use crate::infrastructure::{ReportRepository, copy_to_clipboard};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if app.alert.is_some() {
            Self::handle_alert(app, key);
            return;
        }
        if app.show_help {
            Self::handle_help_mode(app, key);
            return;
        }
        if modifiers.contains(KeyModifiers::CONTROL) {
            Self::handle_shortcut(app, key);
            return;
        }

        match key {
            KeyCode::F(1) => {
                app.show_help = true;
                app.help_scroll = 0;
            }
            KeyCode::Esc => app.escape(),
            KeyCode::PageUp => app.scroll_results(-5),
            KeyCode::PageDown => app.scroll_results(5),
            _ => match app.screen {
                Screen::Dashboard => Self::handle_dashboard(app, key),
                Screen::Wizard | Screen::Agent => Self::handle_form(app, key),
            },
        }
    }

    fn handle_alert(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
    }

    fn handle_shortcut(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('c') | KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('a') => app.open_dashboard(),
            KeyCode::Char('n') => app.add_question(),
            KeyCode::Char('d') => app.remove_focused_question(),
            KeyCode::Char('y') => {
                let result = match app.current_report() {
                    Some(report) => copy_to_clipboard(&report.plain_text()),
                    None => Err("Nothing to copy yet".to_string()),
                };
                app.set_copy_result(result);
            }
            KeyCode::Char('s') => {
                let result = match app.current_result() {
                    Some(value) => ReportRepository::save_report(value, REPORT_FILENAME),
                    None => Err("Nothing to save yet".to_string()),
                };
                app.set_save_result(result);
            }
            _ => {}
        }
    }

    fn handle_dashboard(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.dashboard_previous(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.dashboard_next(),
            KeyCode::Enter => app.open_selected_agent(),
            _ => {}
        }
    }

    fn handle_form(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Tab | KeyCode::Down => {
                app.focus_next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                app.focus_previous();
                return;
            }
            _ => {}
        }

        let Some(field) = app.focused_field() else {
            return;
        };
        match field.kind() {
            FieldKind::Button => {
                if matches!(key, KeyCode::Enter | KeyCode::Char(' ')) {
                    app.activate();
                }
            }
            FieldKind::Choice => match key {
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => app.cycle_choice(true),
                KeyCode::Left => app.cycle_choice(false),
                _ => {}
            },
            FieldKind::Path if key == KeyCode::Enter => Self::load_path(app, field),
            FieldKind::Text if key == KeyCode::Enter => app.focus_next(),
            FieldKind::Path | FieldKind::Text => Self::handle_editing(app, key),
        }
    }

    fn load_path(app: &mut App, field: Field) {
        let path = app.path_input(field);
        let result = if path.is_empty() {
            None
        } else {
            Some(ReportRepository::load_file(&path))
        };
        app.set_file_result(field, result);
    }

    fn handle_editing(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => app.delete_backward(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.show_help = false;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}
