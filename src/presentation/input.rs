use crate::application::{App, AppMode};
use crate::infrastructure::FileRepository;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveAs => Self::handle_filename_input_mode(app, key, true),
            AppMode::LoadFile => Self::handle_filename_input_mode(app, key, false),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => app.start_save_as(),
                KeyCode::Char('o') => app.start_load_file(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.selected_row > 0 {
                    app.selected_row -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.selected_row < app.grid.rows() - 1 {
                    app.selected_row += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if app.selected_col > 0 {
                    app.selected_col -= 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if app.selected_col < app.grid.cols() - 1 {
                    app.selected_col += 1;
                }
            }
            KeyCode::Enter | KeyCode::F(2) => {
                app.start_editing();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.delete_input_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Char(ch) => app.insert_input_char(ch),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, saving: bool) {
        match key {
            KeyCode::Enter => {
                if saving {
                    let result = FileRepository::save_grid(&app.grid, &app.save_filename());
                    app.set_save_result(result);
                } else {
                    let result = FileRepository::load_grid(&app.load_filename());
                    app.set_load_result(result);
                }
            }
            KeyCode::Esc => app.cancel_filename_input(),
            KeyCode::Backspace => {
                app.filename_input.pop();
            }
            KeyCode::Char(ch) => app.filename_input.push(ch),
            _ => {}
        }
    }
}
