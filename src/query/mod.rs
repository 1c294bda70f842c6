//! The note query language.
//!
//! Queries select notes from the [`MetadataIndex`](crate::index::MetadataIndex)
//! by tag or folder, filter them on properties, sort, limit and project them:
//!
//! ```text
//! TABLE title, priority FROM #project OR "work/" WHERE status = "Active"
//!     ORDER BY priority DESC LIMIT 5
//! ```

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod results;

pub use ast::{Condition, Operator, OrderBy, Query, QueryType, SortDirection, Source};
pub use error::QueryError;
pub use eval::{QueryEngine, resolve_property};
pub use parser::{parse, parse_value};
pub use results::{
    CountResult, ListRow, QueryOutcome, QueryResults, TableRow, TaskItem, TaskRow,
};
