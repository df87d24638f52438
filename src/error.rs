use std::fmt;
use std::io;

/// Cause of a syntax diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxCause {
    #[error("invalid pitch")]
    InvalidPitch,

    #[error("invalid mode")]
    InvalidMode,

    #[error("empty key signature")]
    EmptyKeySignature,

    #[error("not a pitch")]
    NotAPitch,

    #[error("invalid octave combination")]
    InvalidOctaveCombination,

    #[error("tied pitch mismatch")]
    TiedPitchMismatch,

    #[error("unhandled duration multiplier")]
    UnhandledDurationMultiplier,

    #[error("invalid duration divisor")]
    InvalidDurationDivisor,

    #[error("unterminated chord annotation")]
    UnterminatedChordAnnotation,
}

/// Position-tracked syntax diagnostic
///
/// Renders as a three-line report: location and cause, the offending source
/// line, and a caret pointing at the offending column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub filename: String,
    /// 1-based line number
    pub line: usize,
    /// 0-based column of the offending token
    pub column: usize,
    /// Raw source line text
    pub source_line: String,
    pub cause: SyntaxCause,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}:{}:{}: {}",
            self.filename, self.line, self.column, self.cause
        )?;
        writeln!(f, "{}", self.source_line)?;
        write!(f, "{}^", " ".repeat(self.column))
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// The syntax cause, if this is a syntax diagnostic
    pub fn syntax_cause(&self) -> Option<SyntaxCause> {
        match self {
            Error::Syntax(e) => Some(e.cause),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
