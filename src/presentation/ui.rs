use crate::application::{App, AppMode};
use crate::domain::Grid;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

const CELL_WIDTH: u16 = 10;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_grid(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "gridcalc - Grid Calculator | Cell: {}{}",
        Grid::column_label(app.selected_col),
        app.selected_row + 1
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Text shown inside a cell: the live edit buffer while this cell is being
/// edited, the committed display value otherwise. The "which cell is being
/// edited" state lives in the application and is passed in explicitly.
fn cell_display_text(app: &App, row: usize, col: usize) -> String {
    if matches!(app.mode, AppMode::Editing) && row == app.selected_row && col == app.selected_col {
        return app.input.clone();
    }
    app.grid
        .get_cell(row, col)
        .map(|cell| cell.value.clone())
        .unwrap_or_default()
}

fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    let mut headers = vec![Cell::from("")];
    for col in 0..app.grid.cols() {
        let header_style = if col == app.selected_col {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(Grid::column_label(col).to_string()).style(header_style));
    }

    let mut rows = vec![Row::new(headers).height(1)];

    for row in 0..app.grid.rows() {
        let row_number_style = if row == app.selected_row {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(row_number_style)];

        for col in 0..app.grid.cols() {
            let text = cell_display_text(app, row, col);
            let text = if text.is_empty() { " ".to_string() } else { text };

            let style = if row == app.selected_row && col == app.selected_col {
                if matches!(app.mode, AppMode::Editing) {
                    Style::default().bg(Color::Green).fg(Color::Black)
                } else {
                    Style::default().bg(Color::Blue).fg(Color::White)
                }
            } else {
                Style::default()
            };

            cells.push(Cell::from(text).style(style));
        }

        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(4)];
    for _ in 0..app.grid.cols() {
        widths.push(Constraint::Length(CELL_WIDTH));
    }
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("Grid"))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                let filename = app.filename.as_deref().unwrap_or("unsaved");
                format!(
                    "File: {} | Enter: edit | Ctrl+S: save | Ctrl+O: load | F1/?: help | q: quit",
                    filename
                )
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to commit, Esc to cancel)", app.input),
        AppMode::Help => "Up/Down/jk: scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SaveAs => format!("Save as: {} (Enter to save, Esc to cancel)", app.filename_input),
        AppMode::LoadFile => format!(
            "Load file: {} (Enter to load, Esc to cancel)",
            app.filename_input
        ),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveAs | AppMode::LoadFile => Style::default().fg(Color::Yellow),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("gridcalc Formula Help")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"GRIDCALC FORMULA REFERENCE

=== BASIC CONCEPTS ===
- Formulas start with = (equals sign)
- Cell references are one column letter plus a row number (A1, B2, C3)
- The reference range follows the grid size: a 3x3 grid accepts A-C and 1-3
- Numbers can be integers or decimals (42, 3.14)
- Results are rounded to 2 decimal places

=== OPERATORS ===
+   Addition          =5+3, =A1+B1
-   Subtraction       =10-3, =A1-5
*   Multiplication    =4*3, =B2*C2
/   Division          =15/3, =A1/B1
( ) Parentheses       =(2+3)*4

* and / bind tighter than + and -.

=== ERRORS ===
A formula that cannot be evaluated shows #REF!
- reference outside the grid (=D1 on a 3-column grid)
- referenced cell is empty or not a number
- division by zero
- malformed expression (=2+ or =(2+3)

=== EXAMPLE FORMULAS ===
=A1+B1
=B2*C2
=A1+B2+C3
=(A1+B1)/2

=== FILE OPERATIONS ===
Ctrl+S      Save grid to a JSON file
Ctrl+O      Load grid from a JSON file

=== NAVIGATION ===
Enter/F2    Edit the selected cell
Arrow keys  Move between cells (hjkl also work)
F1 or ?     Show this help
q           Quit

=== HELP NAVIGATION ===
Up/Down or j/k  Scroll one line
Home            Jump to top
Esc/F1/?/q      Close this help window"#
        .to_string()
}
