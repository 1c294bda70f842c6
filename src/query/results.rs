//! Result rows produced by query evaluation.

use crate::domain::{Block, Value};
use crate::query::QueryError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Results of a query, shaped by its type.
///
/// Serializes as the bare rows (or the bare `{count}` object for `COUNT`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResults {
    List(Vec<ListRow>),
    Table(Vec<TableRow>),
    Task(Vec<TaskRow>),
    Count(CountResult),
}

impl QueryResults {
    /// Returns the number of rows, or the count for `COUNT` results.
    pub fn len(&self) -> usize {
        match self {
            QueryResults::List(rows) => rows.len(),
            QueryResults::Table(rows) => rows.len(),
            QueryResults::Task(rows) => rows.len(),
            QueryResults::Count(c) => c.count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryResults {
    fn default() -> Self {
        QueryResults::List(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub path: String,
}

/// A `TABLE` row: `id` followed by each projected field in order.
///
/// Fields that resolve to nothing are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableRow(IndexMap<String, Value>);

impl TableRow {
    pub(crate) fn new(id: &str) -> Self {
        let mut cells = IndexMap::new();
        cells.insert("id".to_string(), Value::string(id));
        Self(cells)
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterates over the cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub tasks: Vec<TaskItem>,
}

/// One task block of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: String,
    pub content: String,
    pub checked: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Block> for TaskItem {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id().to_string(),
            content: block.content().to_string(),
            checked: block.is_checked(),
            created_at: block.created_at(),
            completed_at: block.completed_at(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResult {
    pub count: usize,
}

/// What [`QueryEngine::execute`](crate::query::QueryEngine::execute) returns:
/// the results, or empty results and the error message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub results: QueryResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn ok(results: QueryResults) -> Self {
        Self {
            results,
            error: None,
        }
    }

    pub fn failed(err: &QueryError) -> Self {
        Self {
            results: QueryResults::default(),
            error: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn count_serializes_as_object() {
        let results = QueryResults::Count(CountResult { count: 2 });
        assert_eq!(serde_json::to_value(&results).unwrap(), json!({"count": 2}));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn table_row_keeps_id_first() {
        let mut row = TableRow::new("n1");
        row.set("status", Value::string("Active"));
        row.set("priority", Value::Null);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"id":"n1","status":"Active","priority":null}"#
        );
        assert_eq!(row.id(), Some("n1"));
    }

    #[test]
    fn task_items_use_camel_case() {
        let item = TaskItem::from(&Block::task("b1", "write", false));
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "id": "b1",
                "content": "write",
                "checked": false,
                "createdAt": null,
                "completedAt": null
            })
        );
    }

    #[test]
    fn failed_outcome_has_empty_results() {
        let outcome = QueryOutcome::failed(&QueryError::Empty);
        assert!(!outcome.is_ok());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"results": [], "error": "query is empty"})
        );
    }

    #[test]
    fn ok_outcome_omits_error() {
        let outcome = QueryOutcome::ok(QueryResults::List(vec![]));
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"results": []}));
    }
}
