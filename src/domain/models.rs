use serde::{Deserialize, Serialize};

/// Largest column count the single-letter reference alphabet can address.
pub const MAX_COLS: usize = 26;

/// A committed formula: the raw text the user typed and the value it
/// computed to last time it was evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub raw: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Display value: raw user text, a formatted number, or an error code.
    pub value: String,
    pub formula: Option<Formula>,
}

impl Cell {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            formula: None,
        }
    }
}

/// A rectangular grid of cells with dimensions fixed at construction.
///
/// Every row holds exactly `cols` cells. The column count is capped at
/// [`MAX_COLS`] because cell references address columns with a single letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl Grid {
    /// Creates an empty `rows` x `cols` grid.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is zero or `cols` is outside `1..=MAX_COLS`.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1, "grid needs at least one row");
        assert!(
            (1..=MAX_COLS).contains(&cols),
            "grid columns must be within the single-letter alphabet"
        );
        Self {
            cells: vec![vec![Cell::default(); cols]; rows],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    /// Replaces the cell at the given coordinate.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Single-letter label for a column index (`0` -> `A`).
    pub fn column_label(col: usize) -> char {
        char::from(b'A' + col as u8)
    }

    /// Checks the rectangular invariant, which deserialized data may violate.
    pub fn is_well_formed(&self) -> bool {
        self.rows >= 1
            && (1..=MAX_COLS).contains(&self.cols)
            && self.cells.len() == self.rows
            && self.cells.iter().all(|row| row.len() == self.cols)
    }
}
