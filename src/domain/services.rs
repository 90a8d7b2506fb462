//! Formula evaluation boundary for the grid widget.
//!
//! This is the surface the application layer calls when the user commits a
//! cell edit that starts with `=`. It owns the glue between the lexer, the
//! recursive descent parser, and the cell resolver, and it enforces the two
//! public-contract details the inner layers do not care about: results are
//! rounded to a fixed precision, and every internal failure collapses to the
//! single user-visible `#REF!` code.

use super::errors::{DomainResult, EvalError};
use super::models::Grid;
use super::parser::{ExpressionEvaluator, Parser};

/// Scale factor rounding successful evaluations to two decimal places.
const ROUND_SCALE: f64 = 100.0;

/// Evaluates cell formulas against a read-only grid snapshot.
///
/// Evaluation is a pure function of the formula text and the snapshot: it
/// performs no I/O, mutates nothing, and completes synchronously. The
/// caller writes the returned value (or error code) back into the cell.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::{FormulaEvaluator, Grid};
///
/// let grid = Grid::default();
/// let evaluator = FormulaEvaluator::new(&grid);
///
/// assert_eq!(evaluator.evaluate("=2+3*4").unwrap(), 14.0);
/// assert_eq!(evaluator.evaluate("=1/3").unwrap(), 0.33);
/// assert_eq!(evaluator.evaluate_display("=(2+3)*4"), "20");
/// assert_eq!(evaluator.evaluate_display("=1/0"), "#REF!");
/// ```
pub struct FormulaEvaluator<'a> {
    grid: &'a Grid,
}

impl<'a> FormulaEvaluator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Evaluates a `=`-prefixed formula to a rounded numeric result.
    ///
    /// Strips surrounding whitespace and the single leading `=`, tokenizes
    /// the rest over the `{+, -, *, /, (, )}` operator set, resolves every
    /// cell reference against the grid snapshot, and evaluates the
    /// expression with standard precedence. The error carries the internal
    /// failure kind; callers showing it to the user should display
    /// [`EvalError::code`] instead.
    pub fn evaluate(&self, formula: &str) -> DomainResult<f64> {
        let trimmed = formula.trim();
        let expression = trimmed
            .strip_prefix('=')
            .ok_or_else(|| EvalError::Parse("formula must start with '='".to_string()))?;

        let mut parser = Parser::new(expression.trim())?;
        let ast = parser.parse()?;

        let value = ExpressionEvaluator::new(self.grid).evaluate(&ast)?;
        Ok((value * ROUND_SCALE).round() / ROUND_SCALE)
    }

    /// Evaluates a formula to its display text: the formatted number on
    /// success, the `#REF!` code on any failure.
    pub fn evaluate_display(&self, formula: &str) -> String {
        match self.evaluate(formula) {
            Ok(value) => value.to_string(),
            Err(err) => err.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{REF_ERROR, ResolutionError};
    use crate::domain::models::Cell;

    fn create_test_grid() -> Grid {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("2"));
        grid.set_cell(0, 1, Cell::literal("3"));
        grid.set_cell(1, 1, Cell::literal("4"));
        grid
    }

    #[test]
    fn evaluates_literal_arithmetic_with_precedence() {
        let grid = Grid::default();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate("=2+3*4").unwrap(), 14.0);
        assert_eq!(evaluator.evaluate("=(2+3)*4").unwrap(), 20.0);
        assert_eq!(evaluator.evaluate("=10-3-2").unwrap(), 5.0);
        assert_eq!(evaluator.evaluate("=-5+10").unwrap(), 5.0);
    }

    #[test]
    fn substitutes_cell_references() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate("=A1+B1").unwrap(), 5.0);
        assert_eq!(evaluator.evaluate("=B2*A1").unwrap(), 8.0);
    }

    #[test]
    fn chains_references_across_the_grid() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("1"));
        grid.set_cell(1, 1, Cell::literal("2"));
        grid.set_cell(2, 2, Cell::literal("3"));

        let evaluator = FormulaEvaluator::new(&grid);
        assert_eq!(evaluator.evaluate("=A1+B2+C3").unwrap(), 6.0);
    }

    #[test]
    fn rounds_to_two_decimal_places() {
        let grid = Grid::default();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate("=1/3").unwrap(), 0.33);
        assert_eq!(evaluator.evaluate("=2/3").unwrap(), 0.67);
        assert_eq!(evaluator.evaluate("=0-1/3").unwrap(), -0.33);
        assert_eq!(evaluator.evaluate_display("=1/3"), "0.33");
    }

    #[test]
    fn division_by_zero_is_collapsed_to_ref_error() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("5"));

        let evaluator = FormulaEvaluator::new(&grid);
        assert_eq!(evaluator.evaluate("=A1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluator.evaluate_display("=A1/0"), REF_ERROR);
    }

    #[test]
    fn one_bad_reference_invalidates_the_formula() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_display("=D1+A1"), REF_ERROR);
        assert_eq!(
            evaluator.evaluate("=D1+A1"),
            Err(EvalError::Resolution(ResolutionError::InvalidReferenceSyntax(
                "D1".to_string()
            )))
        );
    }

    #[test]
    fn non_numeric_referenced_cell_fails() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        // C1 was never written and holds empty text.
        assert_eq!(evaluator.evaluate_display("=C1+1"), REF_ERROR);
        assert!(matches!(
            evaluator.evaluate("=C1+1"),
            Err(EvalError::Resolution(ResolutionError::NonNumericCell(_)))
        ));
    }

    #[test]
    fn zero_valued_cells_evaluate_normally() {
        let mut grid = Grid::new(3, 3);
        grid.set_cell(0, 0, Cell::literal("0"));

        let evaluator = FormulaEvaluator::new(&grid);
        assert_eq!(evaluator.evaluate("=A1+1").unwrap(), 1.0);
        assert_eq!(evaluator.evaluate("=A1").unwrap(), 0.0);
    }

    #[test]
    fn handles_surrounding_whitespace() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate("= 2 + 3 ").unwrap(), 5.0);
        assert_eq!(evaluator.evaluate("  =A1 * 2").unwrap(), 4.0);
    }

    #[test]
    fn lexical_and_structural_errors_collapse_to_ref_error() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert_eq!(evaluator.evaluate_display("=2%3"), REF_ERROR);
        assert_eq!(evaluator.evaluate_display("=2^3"), REF_ERROR);
        assert_eq!(evaluator.evaluate_display("=(2+3"), REF_ERROR);
        assert_eq!(evaluator.evaluate_display("=2+"), REF_ERROR);
        assert_eq!(evaluator.evaluate_display("=SUM(A1)"), REF_ERROR);
        assert_eq!(evaluator.evaluate_display("="), REF_ERROR);
    }

    #[test]
    fn rejects_text_without_the_formula_marker() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        assert!(matches!(evaluator.evaluate("2+3"), Err(EvalError::Parse(_))));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let grid = create_test_grid();
        let evaluator = FormulaEvaluator::new(&grid);

        let first = evaluator.evaluate("=A1+B1*B2");
        let second = evaluator.evaluate("=A1+B1*B2");
        assert_eq!(first, second);
        assert_eq!(first.unwrap(), 14.0);
    }
}
