/// Error code shown to the user for any failed formula.
///
/// Every internal failure collapses to this single code at the display
/// boundary; the richer variants below exist for tests and diagnostics.
pub const REF_ERROR: &str = "#REF!";

/// Failure to turn a cell reference into a numeric value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// Reference text does not match the grammar derived from the grid
    /// dimensions (wrong shape, unknown column letter, row number out of
    /// the configured range).
    InvalidReferenceSyntax(String),
    /// Reference parsed but addresses a coordinate outside the grid it is
    /// being resolved against.
    OutOfRange {
        reference: String,
        rows: usize,
        cols: usize,
    },
    /// Referenced cell holds no coercible numeric value.
    NonNumericCell(String),
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::InvalidReferenceSyntax(ref_str) => {
                write!(f, "Invalid cell reference: {}", ref_str)
            }
            ResolutionError::OutOfRange { reference, rows, cols } => {
                write!(f, "Reference {} is outside the {}x{} grid", reference, rows, cols)
            }
            ResolutionError::NonNumericCell(ref_str) => {
                write!(f, "Cell {} has no numeric value", ref_str)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Failure to evaluate a formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Resolution(ResolutionError),
    /// An expression token is neither a number, a cell reference, an
    /// operator, nor a parenthesis.
    Lexical(String),
    /// Malformed expression structure: unbalanced parentheses, missing
    /// operand, trailing tokens.
    Parse(String),
    DivisionByZero,
}

impl EvalError {
    /// The user-visible error code for this failure.
    pub fn code(&self) -> &'static str {
        REF_ERROR
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Resolution(err) => write!(f, "{}", err),
            EvalError::Lexical(token) => write!(f, "Unexpected token: '{}'", token),
            EvalError::Parse(msg) => write!(f, "Malformed expression: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Resolution(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolutionError> for EvalError {
    fn from(err: ResolutionError) -> Self {
        EvalError::Resolution(err)
    }
}

pub type DomainResult<T> = Result<T, EvalError>;
