//! Application state for the terminal grid widget.
//!
//! The application owns the grid and the per-cell edit lifecycle: a cell is
//! a literal until an edit committing `=`-prefixed text turns it into a
//! formula cell, and any later commit replaces that state wholesale. The
//! evaluator itself is pure; this layer takes the evaluation result and
//! performs the single write-back into the target cell.

use crate::domain::{Cell, Formula, FormulaEvaluator, Grid};

/// Represents the current mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move the selection
    Normal,
    /// Cell editing mode - user is typing into the selected cell
    Editing,
    /// Help screen is displayed
    Help,
    /// Save dialog is open
    SaveAs,
    /// Load dialog is open
    LoadFile,
}

/// Main application state containing the grid and UI state.
///
/// # Examples
///
/// ```
/// use gridcalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// ```
#[derive(Debug)]
pub struct App {
    /// The grid being edited
    pub grid: Grid,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Currently selected column (zero-based)
    pub selected_col: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Input buffer for editing mode
    pub input: String,
    /// Byte offset of the cursor within the input buffer
    pub cursor_position: usize,
    /// Current filename, once saved or loaded
    pub filename: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Scroll position in the help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

impl App {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            selected_row: 0,
            selected_col: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            filename: None,
            filename_input: String::new(),
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Switches to editing mode for the currently selected cell.
    ///
    /// A formula cell exposes its raw formula text for editing, not its
    /// computed value; a literal cell exposes its value.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        let cell = self
            .grid
            .get_cell(self.selected_row, self.selected_col)
            .cloned()
            .unwrap_or_default();
        self.input = match cell.formula {
            Some(formula) => formula.raw,
            None => cell.value,
        };
        self.cursor_position = self.input.len();
    }

    /// Commits the edit buffer into the selected cell.
    ///
    /// Input starting with `=` is evaluated as a formula: on success the
    /// cell shows the rounded number and caches it alongside the raw text;
    /// on failure the cell shows `#REF!` and caches zero. Any other input
    /// becomes a plain literal and clears a previous formula. The committed
    /// display value is never stale relative to this evaluation.
    pub fn finish_editing(&mut self) {
        let cell = if self.input.starts_with('=') {
            let evaluator = FormulaEvaluator::new(&self.grid);
            match evaluator.evaluate(&self.input) {
                Ok(value) => Cell {
                    value: value.to_string(),
                    formula: Some(Formula {
                        raw: self.input.clone(),
                        value,
                    }),
                },
                Err(err) => Cell {
                    value: err.code().to_string(),
                    formula: Some(Formula {
                        raw: self.input.clone(),
                        value: 0.0,
                    }),
                },
            }
        } else {
            Cell::literal(self.input.clone())
        };

        self.grid.set_cell(self.selected_row, self.selected_col, cell);

        // Move down one cell after editing
        if self.selected_row < self.grid.rows() - 1 {
            self.selected_row += 1;
        }

        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn insert_input_char(&mut self, ch: char) {
        self.input.insert(self.cursor_position, ch);
        self.cursor_position += ch.len_utf8();
    }

    /// Deletes the character before the cursor.
    pub fn delete_input_char(&mut self) {
        if let Some((offset, ch)) = self.input[..self.cursor_position].char_indices().next_back() {
            self.input.remove(offset);
            self.cursor_position -= ch.len_utf8();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some((offset, _)) = self.input[..self.cursor_position].char_indices().next_back() {
            self.cursor_position = offset;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(ch) = self.input[self.cursor_position..].chars().next() {
            self.cursor_position += ch.len_utf8();
        }
    }

    /// Switches to save-as mode to prompt for a filename.
    pub fn start_save_as(&mut self) {
        self.mode = AppMode::SaveAs;
        self.filename_input = self
            .filename
            .clone()
            .unwrap_or_else(|| "grid.json".to_string());
        self.status_message = None;
    }

    /// Switches to load-file mode to prompt for a filename.
    pub fn start_load_file(&mut self) {
        self.mode = AppMode::LoadFile;
        self.filename_input = self
            .filename
            .clone()
            .unwrap_or_else(|| "grid.json".to_string());
        self.status_message = None;
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Records the outcome of a save operation and returns to normal mode.
    pub fn set_save_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Saved to {}", filename));
                self.filename = Some(filename);
            }
            Err(error) => {
                self.status_message = Some(format!("Save failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    /// Records the outcome of a load operation, replacing the grid and
    /// resetting the selection on success. Returns to normal mode.
    pub fn set_load_result(&mut self, result: Result<(Grid, String), String>) {
        match result {
            Ok((grid, filename)) => {
                self.grid = grid;
                self.selected_row = 0;
                self.selected_col = 0;
                self.status_message = Some(format!("Loaded from {}", filename));
                self.filename = Some(filename);
            }
            Err(error) => {
                self.status_message = Some(format!("Load failed: {}", error));
            }
        }

        self.mode = AppMode::Normal;
        self.filename_input.clear();
    }

    pub fn save_filename(&self) -> String {
        if self.filename_input.is_empty() {
            "grid.json".to_string()
        } else {
            self.filename_input.clone()
        }
    }

    pub fn load_filename(&self) -> String {
        self.save_filename()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::REF_ERROR;

    fn app_with_values() -> App {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("2"));
        grid.set_cell(0, 1, Cell::literal("3"));
        App::new(grid)
    }

    fn commit(app: &mut App, row: usize, col: usize, text: &str) {
        app.selected_row = row;
        app.selected_col = col;
        app.start_editing();
        app.input = text.to_string();
        app.cursor_position = app.input.len();
        app.finish_editing();
    }

    #[test]
    fn committing_a_literal_stores_it_verbatim() {
        let mut app = app_with_values();
        commit(&mut app, 2, 2, "hello");

        let cell = app.grid.get_cell(2, 2).unwrap();
        assert_eq!(cell.value, "hello");
        assert!(cell.formula.is_none());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn committing_a_formula_stores_value_and_raw_text() {
        let mut app = app_with_values();
        commit(&mut app, 1, 0, "=A1+B1");

        let cell = app.grid.get_cell(1, 0).unwrap();
        assert_eq!(cell.value, "5");
        let formula = cell.formula.clone().unwrap();
        assert_eq!(formula.raw, "=A1+B1");
        assert_eq!(formula.value, 5.0);
    }

    #[test]
    fn committing_a_failing_formula_shows_the_error_code() {
        let mut app = app_with_values();
        commit(&mut app, 1, 0, "=D1+A1");

        let cell = app.grid.get_cell(1, 0).unwrap();
        assert_eq!(cell.value, REF_ERROR);
        let formula = cell.formula.clone().unwrap();
        assert_eq!(formula.raw, "=D1+A1");
        assert_eq!(formula.value, 0.0);
    }

    #[test]
    fn recommitting_a_literal_clears_the_formula() {
        let mut app = app_with_values();
        commit(&mut app, 1, 0, "=A1+B1");
        commit(&mut app, 1, 0, "7");

        let cell = app.grid.get_cell(1, 0).unwrap();
        assert_eq!(cell.value, "7");
        assert!(cell.formula.is_none());
    }

    #[test]
    fn editing_a_formula_cell_exposes_the_raw_text() {
        let mut app = app_with_values();
        commit(&mut app, 1, 0, "=A1+B1");

        app.selected_row = 1;
        app.selected_col = 0;
        app.start_editing();
        assert_eq!(app.input, "=A1+B1");
        assert_eq!(app.mode, AppMode::Editing);
    }

    #[test]
    fn cancel_editing_leaves_the_cell_untouched() {
        let mut app = app_with_values();
        app.start_editing();
        app.input = "=1+1".to_string();
        app.cancel_editing();

        assert_eq!(app.grid.get_cell(0, 0).unwrap().value, "2");
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn commit_moves_the_selection_down_within_bounds() {
        let mut app = app_with_values();
        commit(&mut app, 0, 0, "1");
        assert_eq!(app.selected_row, 1);

        commit(&mut app, 2, 0, "1");
        assert_eq!(app.selected_row, 2);
    }

    #[test]
    fn referencing_a_committed_formula_uses_its_cached_value() {
        let mut app = app_with_values();
        commit(&mut app, 1, 0, "=A1+B1");
        commit(&mut app, 2, 0, "=A2*2");

        assert_eq!(app.grid.get_cell(2, 0).unwrap().value, "10");
    }

    #[test]
    fn input_buffer_editing_is_cursor_aware() {
        let mut app = app_with_values();
        app.selected_row = 2;
        app.selected_col = 2;
        app.start_editing();
        for ch in "=A+B1".chars() {
            app.insert_input_char(ch);
        }
        // Fix the missing digit: =A1+B1
        app.move_cursor_left();
        app.move_cursor_left();
        app.move_cursor_left();
        app.insert_input_char('1');
        assert_eq!(app.input, "=A1+B1");

        app.delete_input_char();
        assert_eq!(app.input, "=A+B1");
    }
}
