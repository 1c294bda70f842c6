//! Evaluates queries against the metadata index.

use crate::domain::{DocumentSource, Value};
use crate::index::{MetadataIndex, MetadataRecord, timestamp_value};
use crate::query::{
    Condition, CountResult, ListRow, Operator, OrderBy, Query, QueryError, QueryOutcome,
    QueryResults, QueryType, SortDirection, Source, TableRow, TaskItem, TaskRow, parse,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Runs queries against an index and the source it was built from.
///
/// The source supplies task blocks for `TASK` queries and initializes the
/// index on first use.
pub struct QueryEngine<'a, S: DocumentSource + ?Sized> {
    index: &'a mut MetadataIndex,
    source: &'a S,
}

impl<'a, S: DocumentSource + ?Sized> QueryEngine<'a, S> {
    pub fn new(index: &'a mut MetadataIndex, source: &'a S) -> Self {
        Self { index, source }
    }

    /// Parses and runs query text, folding any error into the outcome.
    pub fn execute(&mut self, text: &str) -> QueryOutcome {
        match parse(text).and_then(|query| self.run(&query)) {
            Ok(results) => QueryOutcome::ok(results),
            Err(e) => {
                debug!(query = text, error = %e, "query failed");
                QueryOutcome::failed(&e)
            }
        }
    }

    /// Runs a parsed query.
    pub fn run(&mut self, query: &Query) -> Result<QueryResults, QueryError> {
        self.index.init(self.source);
        let index: &MetadataIndex = self.index;

        let mut matched: Vec<&MetadataRecord> = candidates(index, &query.sources)
            .into_iter()
            .filter(|record| query.conditions.iter().all(|c| c.matches(record)))
            .collect();

        if let Some(order) = &query.order_by {
            matched = sort_records(matched, order);
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        self.project(query, matched)
    }

    fn project(
        &self,
        query: &Query,
        records: Vec<&MetadataRecord>,
    ) -> Result<QueryResults, QueryError> {
        let results = match query.query_type {
            QueryType::List => QueryResults::List(
                records
                    .into_iter()
                    .map(|r| ListRow {
                        id: r.id().to_string(),
                        title: r.title().to_string(),
                        path: r.path().to_string(),
                    })
                    .collect(),
            ),
            QueryType::Table => QueryResults::Table(
                records
                    .into_iter()
                    .map(|r| {
                        let mut row = TableRow::new(r.id());
                        for field in &query.fields {
                            row.set(field, resolve_property(r, field).unwrap_or(Value::Null));
                        }
                        row
                    })
                    .collect(),
            ),
            QueryType::Task => {
                let mut rows = Vec::new();
                for record in records {
                    let note = self
                        .source
                        .get_note(record.id())
                        .ok_or_else(|| QueryError::NoteUnavailable(record.id().to_string()))?;
                    if note.has_open_tasks() {
                        rows.push(TaskRow {
                            id: record.id().to_string(),
                            title: record.title().to_string(),
                            tasks: note.tasks().map(TaskItem::from).collect(),
                        });
                    }
                }
                QueryResults::Task(rows)
            }
            QueryType::Count => QueryResults::Count(CountResult {
                count: records.len(),
            }),
        };
        Ok(results)
    }
}

/// Records selected by the sources, in index order.
fn candidates<'i>(index: &'i MetadataIndex, sources: &[Source]) -> Vec<&'i MetadataRecord> {
    if sources.is_empty() {
        return index.records().collect();
    }

    let mut selected: HashSet<&str> = HashSet::new();
    for source in sources {
        match source {
            Source::Tag(tag) => {
                selected.extend(index.get_by_tag(tag.as_str()).into_iter().map(MetadataRecord::id));
            }
            Source::Path(prefix) => selected.extend(
                index
                    .records()
                    .filter(|r| r.path().starts_with(prefix.as_str()))
                    .map(MetadataRecord::id),
            ),
        }
    }
    index
        .records()
        .filter(|r| selected.contains(r.id()))
        .collect()
}

/// Stable sort with undefined values last in either direction.
fn sort_records<'i>(records: Vec<&'i MetadataRecord>, order: &OrderBy) -> Vec<&'i MetadataRecord> {
    let mut keyed: Vec<(Option<Value>, &MetadataRecord)> = records
        .into_iter()
        .map(|r| (resolve_property(r, &order.field), r))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order.direction {
            SortDirection::Asc => a.natural_cmp(b),
            SortDirection::Desc => b.natural_cmp(a),
        },
    });
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Resolves a property name against a record.
///
/// Well-known names come first, then an exact frontmatter key, then a dot
/// path into the record. `None` means undefined.
pub fn resolve_property(record: &MetadataRecord, name: &str) -> Option<Value> {
    match name {
        "file.name" | "title" => return Some(Value::string(record.title())),
        "file.path" | "path" => return Some(Value::string(record.path())),
        "file.tags" | "tags" => return Some(record.tags_value()),
        "file.created" | "created" => return Some(timestamp_value(record.created())),
        "file.modified" | "modified" => return Some(timestamp_value(record.modified())),
        "wordCount" => return Some(Value::from(record.word_count())),
        "blockCount" => return Some(Value::from(record.block_count())),
        _ => {}
    }
    if let Some(value) = record.frontmatter().get(name) {
        return Some(value.clone());
    }

    let root = record.to_value();
    let mut current = &root;
    for segment in name.split('.') {
        current = current.get(segment)?;
    }
    Some(current.clone())
}

impl Condition {
    /// Tests the condition against a record.
    pub fn matches(&self, record: &MetadataRecord) -> bool {
        let resolved = resolve_property(record, &self.field);
        let outcome = match (&self.operator, resolved) {
            (Operator::Exists, resolved) => resolved.is_some_and(|v| v.is_present()),
            (Operator::NotEq, resolved) => !resolved.is_some_and(|v| v.loose_eq(&self.value)),
            (_, None) => false,
            (Operator::Eq, Some(v)) => v.loose_eq(&self.value),
            (Operator::Gt, Some(v)) => v.natural_cmp(&self.value) == Ordering::Greater,
            (Operator::Lt, Some(v)) => v.natural_cmp(&self.value) == Ordering::Less,
            (Operator::Gte, Some(v)) => v.natural_cmp(&self.value) != Ordering::Less,
            (Operator::Lte, Some(v)) => v.natural_cmp(&self.value) != Ordering::Greater,
            (Operator::Contains, Some(v)) => contains(&v, &self.value),
            (Operator::In, Some(v)) => self
                .value
                .as_list()
                .is_some_and(|items| items.contains(&v)),
        };
        outcome != self.negated
    }
}

/// Case-insensitive substring test on a string or on any list element.
fn contains(haystack: &Value, needle: &Value) -> bool {
    let needle = needle.to_string().to_lowercase();
    match haystack {
        Value::String(s) => s.to_lowercase().contains(&needle),
        Value::List(items) => items
            .iter()
            .any(|item| item.to_string().to_lowercase().contains(&needle)),
        _ => false,
    }
}
