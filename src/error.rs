use thiserror::Error;

#[derive(Error, Debug)]
pub enum WmmError {
    /// A malformed record in a coefficient table file
    #[error("coefficient table line {line}: {reason}")]
    Table { line: usize, reason: String },

    /// A coefficient table that does not cover every (n, m)
    #[error("coefficient table has no entry for degree {n} order {m}")]
    MissingCoefficient { n: usize, m: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Date outside the range the calendar conversion supports
    #[error("{0}")]
    Time(#[from] time::error::ComponentRange),
}

pub type Result<T> = std::result::Result<T, WmmError>;
