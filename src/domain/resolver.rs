//! Cell reference resolution.
//!
//! Turns reference text like `B2` into a numeric value by parsing it against
//! the grammar derived from the grid dimensions and looking the cell up in a
//! read-only grid snapshot. Resolution is a pure lookup: it never mutates the
//! grid and never re-evaluates a referenced formula.

use super::errors::ResolutionError;
use super::models::Grid;

/// A zero-based grid coordinate parsed from reference text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    /// Parses reference text against the grammar for a `rows` x `cols` grid.
    ///
    /// The grammar is one column letter (case-insensitive, `A` up to the
    /// grid's last column) followed by a 1-based row number no larger than
    /// `rows`. Anything else is rejected, never clamped: out-of-alphabet
    /// letters and out-of-range row numbers fail exactly like structurally
    /// malformed text.
    pub fn parse(text: &str, rows: usize, cols: usize) -> Result<Self, ResolutionError> {
        let invalid = || ResolutionError::InvalidReferenceSyntax(text.to_string());

        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        if !letter.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let col = letter.to_ascii_uppercase() as usize - 'A' as usize;
        if col >= cols {
            return Err(invalid());
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let row_number: usize = digits.parse().map_err(|_| invalid())?;
        if row_number == 0 || row_number > rows {
            return Err(invalid());
        }

        Ok(Self {
            row: row_number - 1,
            col,
        })
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", Grid::column_label(self.col), self.row + 1)
    }
}

/// Resolves reference text to the numeric value of the addressed cell.
pub fn resolve(reference: &str, grid: &Grid) -> Result<f64, ResolutionError> {
    let cell_ref = CellRef::parse(reference, grid.rows(), grid.cols())?;
    resolve_ref(cell_ref, grid)
}

/// Resolves an already-parsed coordinate against a grid snapshot.
///
/// The coordinate is bounds-checked against the snapshot it is given, so a
/// `CellRef` validated for one set of dimensions fails with `OutOfRange`
/// when resolved on a smaller grid. A formula cell contributes its cached
/// computed value; a literal cell is coerced to a number. A cell holding
/// zero resolves to `Ok(0.0)` -- success is carried by the `Result`, never
/// inferred from the value.
pub fn resolve_ref(cell_ref: CellRef, grid: &Grid) -> Result<f64, ResolutionError> {
    let cell = grid
        .get_cell(cell_ref.row, cell_ref.col)
        .ok_or_else(|| ResolutionError::OutOfRange {
            reference: cell_ref.to_string(),
            rows: grid.rows(),
            cols: grid.cols(),
        })?;

    if let Some(formula) = &cell.formula {
        return Ok(formula.value);
    }

    cell.value
        .trim()
        .parse::<f64>()
        .map_err(|_| ResolutionError::NonNumericCell(cell_ref.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Cell, Formula};

    fn grid_with_values() -> Grid {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("2"));
        grid.set_cell(0, 1, Cell::literal("3"));
        grid.set_cell(1, 1, Cell::literal("0"));
        grid.set_cell(2, 2, Cell::literal("-1.5"));
        grid
    }

    #[test]
    fn parses_references_case_insensitively() {
        assert_eq!(CellRef::parse("A1", 3, 3).unwrap(), CellRef { row: 0, col: 0 });
        assert_eq!(CellRef::parse("b2", 3, 3).unwrap(), CellRef { row: 1, col: 1 });
        assert_eq!(CellRef::parse("C3", 3, 3).unwrap(), CellRef { row: 2, col: 2 });
    }

    #[test]
    fn grammar_scales_with_dimensions() {
        assert!(CellRef::parse("D1", 3, 3).is_err());
        assert_eq!(CellRef::parse("D1", 10, 10).unwrap(), CellRef { row: 0, col: 3 });
        assert!(CellRef::parse("A12", 3, 3).is_err());
        assert_eq!(CellRef::parse("A12", 20, 3).unwrap(), CellRef { row: 11, col: 0 });
    }

    #[test]
    fn rejects_malformed_references() {
        for text in ["", "1A", "A", "9", "A0", "A9", "D1", "AB1", "A1.5", " A1"] {
            match CellRef::parse(text, 3, 3) {
                Err(ResolutionError::InvalidReferenceSyntax(bad)) => assert_eq!(bad, text),
                other => panic!("expected syntax error for {:?}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn resolves_literal_values() {
        let grid = grid_with_values();
        assert_eq!(resolve("A1", &grid).unwrap(), 2.0);
        assert_eq!(resolve("B1", &grid).unwrap(), 3.0);
        assert_eq!(resolve("c3", &grid).unwrap(), -1.5);
    }

    #[test]
    fn zero_is_a_value_not_a_failure() {
        let grid = grid_with_values();
        assert_eq!(resolve("B2", &grid), Ok(0.0));
    }

    #[test]
    fn formula_cells_use_the_cached_value() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(
            0,
            0,
            Cell {
                value: "5".to_string(),
                formula: Some(Formula {
                    raw: "=2+3".to_string(),
                    value: 5.0,
                }),
            },
        );
        assert_eq!(resolve("A1", &grid).unwrap(), 5.0);
    }

    #[test]
    fn failed_formula_cells_resolve_to_their_cached_zero() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(
            0,
            0,
            Cell {
                value: "#REF!".to_string(),
                formula: Some(Formula {
                    raw: "=1/0".to_string(),
                    value: 0.0,
                }),
            },
        );
        assert_eq!(resolve("A1", &grid).unwrap(), 0.0);
    }

    #[test]
    fn empty_and_textual_cells_are_non_numeric() {
        let grid = grid_with_values();
        assert_eq!(
            resolve("C1", &grid),
            Err(ResolutionError::NonNumericCell("C1".to_string()))
        );

        let mut grid = grid_with_values();
        grid.set_cell(0, 2, Cell::literal("hello"));
        assert_eq!(
            resolve("C1", &grid),
            Err(ResolutionError::NonNumericCell("C1".to_string()))
        );
    }

    #[test]
    fn stale_reference_is_out_of_range_on_a_smaller_grid() {
        let cell_ref = CellRef::parse("E5", 5, 5).unwrap();
        let grid = Grid::new(3, 3);
        assert_eq!(
            resolve_ref(cell_ref, &grid),
            Err(ResolutionError::OutOfRange {
                reference: "E5".to_string(),
                rows: 3,
                cols: 3,
            })
        );
    }

    #[test]
    fn resolution_does_not_mutate_the_grid() {
        let grid = grid_with_values();
        let before = serde_json::to_string(&grid).unwrap();
        let _ = resolve("A1", &grid);
        let _ = resolve("C1", &grid);
        assert_eq!(serde_json::to_string(&grid).unwrap(), before);
    }
}
