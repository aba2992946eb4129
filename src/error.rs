use thiserror::Error;

/// A formula string that could not be decomposed into elements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty formula")]
    Empty,
    #[error("unknown element symbol '{symbol}' in '{formula}'")]
    UnknownElement { formula: String, symbol: String },
    #[error("unexpected character '{ch}' at position {pos} in '{formula}'")]
    UnexpectedChar {
        formula: String,
        ch: char,
        pos: usize,
    },
    #[error("unbalanced bracket in '{0}'")]
    Unbalanced(String),
    #[error("invalid amount '{amount}' in '{formula}'")]
    InvalidAmount { formula: String, amount: String },
    #[error("'{0}' contains no element with a positive amount")]
    NoElements(String),
}

/// Failures surfaced by the filter pipeline. Any of these aborts the call.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: ParseError,
    },
    #[error("row {row}: missing or empty '{field}' value")]
    MissingField { row: usize, field: &'static str },
    #[error("invalid filter configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
