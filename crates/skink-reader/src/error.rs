use skink_core::Value;

/// Everything that can go wrong between source text and a value. The
/// display text carries no position; `line` is kept separately so hosts
/// can report it without it leaking into in-language error values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("expected '{close}'")]
    Unterminated { close: char, line: usize },

    #[error("mismatched '{close}'")]
    Mismatched { close: char, line: usize },

    #[error("misplaced '.'")]
    MisplacedDot { line: usize },

    #[error("unterminated string constant")]
    UnterminatedString { line: usize },

    #[error("token too long")]
    TokenTooLong { line: usize },

    #[error("bad character in input stream ({code})")]
    BadChar { code: u32, line: usize },
}

impl ReadError {
    pub fn line(&self) -> usize {
        match self {
            ReadError::Unterminated { line, .. }
            | ReadError::Mismatched { line, .. }
            | ReadError::MisplacedDot { line }
            | ReadError::UnterminatedString { line }
            | ReadError::TokenTooLong { line }
            | ReadError::BadChar { line, .. } => *line,
        }
    }
}

impl From<ReadError> for Value {
    fn from(err: ReadError) -> Value {
        Value::error(err.to_string())
    }
}
