use thiserror::Error;

/// Errors from parsing or evaluating a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("expected a source after FROM")]
    MissingSource,

    #[error("invalid tag source '{0}'")]
    InvalidTag(String),

    #[error("ORDER must be followed by BY and a field")]
    IncompleteOrder,

    #[error("LIMIT expects a non-negative integer, got '{0}'")]
    InvalidLimit(String),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("note '{0}' is no longer available")]
    NoteUnavailable(String),
}
