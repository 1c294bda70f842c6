//! Parsed form of a query.

use crate::domain::{Tag, Value};
use std::fmt;

/// The shape of a query's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryType {
    /// `{id, title, path}` per note.
    #[default]
    List,
    /// `{id, ...fields}` per note.
    Table,
    /// Notes with open tasks, listing all their tasks.
    Task,
    /// The number of matching notes.
    Count,
}

impl QueryType {
    /// Recognizes a query type keyword, case-insensitively.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_uppercase().as_str() {
            "LIST" => Some(QueryType::List),
            "TABLE" => Some(QueryType::Table),
            "TASK" => Some(QueryType::Task),
            "COUNT" => Some(QueryType::Count),
            _ => None,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::List => write!(f, "LIST"),
            QueryType::Table => write!(f, "TABLE"),
            QueryType::Task => write!(f, "TASK"),
            QueryType::Count => write!(f, "COUNT"),
        }
    }
}

/// A `FROM` term selecting candidate notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Notes carrying the tag.
    Tag(Tag),
    /// Notes whose folder path starts with the prefix (case-sensitive).
    Path(String),
}

/// A comparison in a `WHERE` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Bare field: the property is defined and not null.
    Exists,
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    In,
}

impl Operator {
    /// Recognizes an operator symbol or word.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_lowercase().as_str() {
            "=" | "==" => Some(Operator::Eq),
            "!=" => Some(Operator::NotEq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            "contains" => Some(Operator::Contains),
            "in" => Some(Operator::In),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Exists => "exists",
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Contains => "contains",
            Operator::In => "in",
        };
        write!(f, "{}", s)
    }
}

/// One `WHERE` test against a note property.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    /// The literal compared against; `Null` for existence checks.
    pub value: Value,
    pub negated: bool,
}

impl Condition {
    /// Creates a comparison condition.
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            negated: false,
        }
    }

    /// Creates an existence check.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::new(field, Operator::Exists, Value::Null)
    }

    /// Inverts the condition.
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// An `ORDER BY` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub query_type: QueryType,
    /// Projected fields, only used by `TABLE`.
    pub fields: Vec<String>,
    /// Candidate sources; empty means every note.
    pub sources: Vec<Source>,
    /// Conditions that must all hold.
    pub conditions: Vec<Condition>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}
