//! The in-memory metadata index: one record per live note plus the tag, link
//! and backlink inverted indices.

use crate::domain::{DocumentSource, Tag, Value};
use crate::index::progress::{BuildResult, NoopReporter, ProgressReporter};
use crate::index::record::MetadataRecord;
use crate::index::snapshot::{IndexSnapshot, SnapshotStore};
use crate::index::validation::{IndexKind, ValidationIssue, ValidationSummary};
use crate::infra::ContentHash;
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, info, warn};

type IdSet = BTreeSet<String>;

// ===========================================
// MetadataIndex
// ===========================================

/// Metadata records for every live note and the inverted indices over them.
///
/// The index is rebuilt from a [`DocumentSource`] with [`init`](Self::init)
/// and kept current with [`update_note`](Self::update_note) and
/// [`remove_note`](Self::remove_note). Every mutation removes a note's old
/// contributions before inserting its new ones, and a key whose set becomes
/// empty is dropped.
///
/// Backlinks are resolved by title: a link `[[Beta]]` in note A adds A to the
/// backlink slot of every note titled "beta" (case-insensitive).
///
/// The index has no interior locking. Hosts sharing it across threads must
/// put it behind a single writer, e.g. a `Mutex`.
pub struct MetadataIndex {
    records: IndexMap<String, MetadataRecord>,
    tag_index: BTreeMap<Tag, IdSet>,
    link_index: BTreeMap<String, IdSet>,
    backlink_index: BTreeMap<String, IdSet>,
    /// Source id → ids its links currently resolve to.
    outbound: HashMap<String, IdSet>,
    /// Lowercase title → ids of notes with that title.
    titles: HashMap<String, IdSet>,
    fingerprints: BTreeMap<String, String>,
    initialized: bool,
    store: Option<Box<dyn SnapshotStore>>,
}

impl Default for MetadataIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MetadataIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataIndex")
            .field("records", &self.records.len())
            .field("tags", &self.tag_index.len())
            .field("links", &self.link_index.len())
            .field("backlinks", &self.backlink_index.len())
            .field("initialized", &self.initialized)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl MetadataIndex {
    /// Creates an empty, uninitialized index without a snapshot store.
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
            tag_index: BTreeMap::new(),
            link_index: BTreeMap::new(),
            backlink_index: BTreeMap::new(),
            outbound: HashMap::new(),
            titles: HashMap::new(),
            fingerprints: BTreeMap::new(),
            initialized: false,
            store: None,
        }
    }

    /// Creates an empty index that seeds from and saves to a snapshot store.
    pub fn with_store(store: impl SnapshotStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
            ..Self::new()
        }
    }

    /// Returns true once [`init`](Self::init) or [`rebuild`](Self::rebuild) has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ===========================================
    // Lifecycle
    // ===========================================

    /// Builds the index from every note in the source.
    ///
    /// Returns `None` without doing anything if the index is already
    /// initialized.
    pub fn init<S: DocumentSource + ?Sized>(&mut self, source: &S) -> Option<BuildResult> {
        self.init_with_progress(source, &mut NoopReporter)
    }

    /// Builds the index with progress reporting.
    ///
    /// When a snapshot store is attached and its snapshot was taken from
    /// exactly the current notes, the inverted indices are seeded from it.
    /// Records are always derived from the live notes.
    pub fn init_with_progress<S, P>(&mut self, source: &S, progress: &mut P) -> Option<BuildResult>
    where
        S: DocumentSource + ?Sized,
        P: ProgressReporter,
    {
        if self.initialized {
            return None;
        }
        let cached = self.load_snapshot();
        Some(self.build(source, progress, cached))
    }

    /// Clears all state and builds the index again, ignoring any snapshot.
    pub fn rebuild<S: DocumentSource + ?Sized>(&mut self, source: &S) -> BuildResult {
        self.rebuild_with_progress(source, &mut NoopReporter)
    }

    /// Rebuilds with progress reporting.
    pub fn rebuild_with_progress<S, P>(&mut self, source: &S, progress: &mut P) -> BuildResult
    where
        S: DocumentSource + ?Sized,
        P: ProgressReporter,
    {
        self.initialized = false;
        self.build(source, progress, None)
    }

    fn build<S, P>(
        &mut self,
        source: &S,
        progress: &mut P,
        cached: Option<IndexSnapshot>,
    ) -> BuildResult
    where
        S: DocumentSource + ?Sized,
        P: ProgressReporter,
    {
        self.clear();

        let derived: Vec<(MetadataRecord, ContentHash)> = source
            .list_notes()
            .into_iter()
            .map(|note| {
                progress.on_note(note.id());
                (MetadataRecord::from_note(note), ContentHash::of_note(note))
            })
            .collect();

        let mut from_snapshot = false;
        if let Some(snapshot) = cached {
            from_snapshot = self.seed(&derived, snapshot);
            if !from_snapshot {
                debug!("index snapshot is stale, rebuilding");
                self.clear();
            }
        }
        if !from_snapshot {
            for (record, fingerprint) in derived {
                self.apply(record, fingerprint);
            }
        }

        self.initialized = true;
        self.check_consistency();
        self.persist();

        let result = BuildResult {
            indexed: self.records.len(),
            from_snapshot,
        };
        info!(
            notes = result.indexed,
            tags = self.tag_index.len(),
            from_snapshot,
            "metadata index built"
        );
        progress.on_complete(&result);
        result
    }

    /// Installs derived records and takes the inverted indices from a snapshot.
    ///
    /// Returns false, leaving partial state for the caller to clear, when the
    /// snapshot does not describe exactly these records.
    fn seed(&mut self, derived: &[(MetadataRecord, ContentHash)], snapshot: IndexSnapshot) -> bool {
        let live: BTreeMap<String, String> = derived
            .iter()
            .map(|(record, hash)| (record.id().to_string(), hash.to_string()))
            .collect();
        if live != snapshot.fingerprints {
            return false;
        }

        let mut tag_index = BTreeMap::new();
        for (key, ids) in snapshot.tags {
            match Tag::new(&key) {
                Ok(tag) if tag.as_str() == key => {
                    tag_index.insert(tag, ids);
                }
                _ => return false,
            }
        }

        for (record, _) in derived {
            insert_id(&mut self.titles, record.title_key(), record.id());
            self.records.insert(record.id().to_string(), record.clone());
        }
        for (target, sources) in &snapshot.backlinks {
            for source in sources {
                insert_id(&mut self.outbound, source.clone(), target);
            }
        }
        self.fingerprints = live;
        self.tag_index = tag_index;
        self.link_index = snapshot.links;
        self.backlink_index = snapshot.backlinks;

        !self.validate().has_errors()
    }

    fn clear(&mut self) {
        self.records.clear();
        self.tag_index.clear();
        self.link_index.clear();
        self.backlink_index.clear();
        self.outbound.clear();
        self.titles.clear();
        self.fingerprints.clear();
    }

    // ===========================================
    // Mutation
    // ===========================================

    /// Re-derives one note's record and replaces its index contributions.
    ///
    /// A note the source no longer has is treated as deleted, and `None` is
    /// returned.
    pub fn update_note<S: DocumentSource + ?Sized>(
        &mut self,
        source: &S,
        id: &str,
    ) -> Option<&MetadataRecord> {
        let Some(note) = source.get_note(id) else {
            self.remove_note(id);
            return None;
        };

        let record = MetadataRecord::from_note(note);
        debug!(
            id,
            tags = record.tags().len(),
            links = record.links().len(),
            "updating note"
        );
        self.apply(record, ContentHash::of_note(note));
        self.check_consistency();
        self.persist();
        self.records.get(id)
    }

    /// Removes a note's record and every index entry that involves it.
    ///
    /// Does nothing if the note is not indexed.
    pub fn remove_note(&mut self, id: &str) {
        let Some(record) = self.records.get(id) else {
            return;
        };
        let tags: Vec<Tag> = record.tags().iter().cloned().collect();
        let link_keys = record.link_keys();
        let title_key = record.title_key();

        debug!(id, "removing note");
        for tag in &tags {
            remove_id(&mut self.tag_index, tag, id);
        }
        for key in &link_keys {
            remove_id(&mut self.link_index, key, id);
        }
        self.detach_outbound(id);
        self.detach_incoming(id);
        remove_id(&mut self.titles, &title_key, id);
        self.fingerprints.remove(id);
        self.records.shift_remove(id);

        self.check_consistency();
        self.persist();
    }

    /// Replaces a note's contributions and installs its record.
    fn apply(&mut self, record: MetadataRecord, fingerprint: ContentHash) {
        let id = record.id().to_string();
        let new_title = record.title_key();
        let old_title = self.records.get(&id).map(MetadataRecord::title_key);

        if let Some(old) = self.records.get(&id) {
            for tag in old.tags() {
                remove_id(&mut self.tag_index, tag, &id);
            }
            for key in old.link_keys() {
                remove_id(&mut self.link_index, &key, &id);
            }
        }
        for tag in record.tags() {
            insert_id(&mut self.tag_index, tag.clone(), &id);
        }
        let link_keys = record.link_keys();
        for key in &link_keys {
            insert_id(&mut self.link_index, key.clone(), &id);
        }

        // Backlinks: this note's outgoing edges always, its incoming slot only
        // when the title it is reached by changes.
        self.detach_outbound(&id);
        let title_changed = old_title.as_deref() != Some(new_title.as_str());
        if title_changed {
            self.detach_incoming(&id);
            if let Some(old) = &old_title {
                remove_id(&mut self.titles, old, &id);
            }
            insert_id(&mut self.titles, new_title.clone(), &id);
        }

        for key in &link_keys {
            let targets: Vec<String> = self
                .titles
                .get(key)
                .map(|ids| ids.iter().cloned().collect())
                .unwrap_or_default();
            for target in targets {
                insert_id(&mut self.backlink_index, target.clone(), &id);
                insert_id(&mut self.outbound, id.clone(), &target);
            }
        }

        if title_changed {
            let sources: Vec<String> = self
                .link_index
                .get(&new_title)
                .map(|ids| ids.iter().cloned().collect())
                .unwrap_or_default();
            for source in sources {
                insert_id(&mut self.backlink_index, id.clone(), &source);
                insert_id(&mut self.outbound, source, &id);
            }
        }

        self.fingerprints.insert(id.clone(), fingerprint.to_string());
        self.records.insert(id, record);
    }

    /// Drops the backlink entries this note contributes to other notes.
    fn detach_outbound(&mut self, id: &str) {
        if let Some(targets) = self.outbound.remove(id) {
            for target in targets {
                remove_id(&mut self.backlink_index, &target, id);
            }
        }
    }

    /// Drops this note's backlink slot and the edges that point into it.
    fn detach_incoming(&mut self, id: &str) {
        if let Some(sources) = self.backlink_index.remove(id) {
            for source in sources {
                remove_id(&mut self.outbound, &source, id);
            }
        }
    }

    // ===========================================
    // Reads
    // ===========================================

    /// Returns the record for a note id.
    pub fn get(&self, id: &str) -> Option<&MetadataRecord> {
        self.records.get(id)
    }

    /// Returns all records in index order.
    pub fn records(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.records.values()
    }

    /// Returns the number of indexed notes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no notes are indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the notes carrying a tag, compared case-insensitively.
    pub fn get_by_tag(&self, tag: &str) -> Vec<&MetadataRecord> {
        let Ok(tag) = Tag::new(tag) else {
            return Vec::new();
        };
        self.lookup(self.tag_index.get(&tag))
    }

    /// Returns the notes whose links resolve to the given note.
    pub fn get_backlinks(&self, id: &str) -> Vec<&MetadataRecord> {
        self.lookup(self.backlink_index.get(id))
    }

    /// Returns the notes linking to a target title, whether or not a note
    /// with that title exists.
    pub fn get_linking_notes(&self, target: &str) -> Vec<&MetadataRecord> {
        self.lookup(self.link_index.get(&target.trim().to_lowercase()))
    }

    /// Returns every tag with the number of notes carrying it.
    pub fn get_all_tags(&self) -> BTreeMap<String, usize> {
        self.tag_index
            .iter()
            .map(|(tag, ids)| (tag.as_str().to_string(), ids.len()))
            .collect()
    }

    /// Scores notes against a case-insensitive substring.
    ///
    /// A title match scores 100, a match in any tag 50, and each matching
    /// frontmatter value 25. Notes scoring zero are left out; ties keep index
    /// order.
    pub fn search(&self, query: &str) -> Vec<&MetadataRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(u32, &MetadataRecord)> = self
            .records
            .values()
            .filter_map(|record| {
                let mut score = 0;
                if record.title().to_lowercase().contains(&needle) {
                    score += 100;
                }
                if record.tags().iter().any(|t| t.as_str().contains(&needle)) {
                    score += 50;
                }
                score += 25
                    * record
                        .frontmatter()
                        .values()
                        .filter(|v| v.to_string().to_lowercase().contains(&needle))
                        .count() as u32;
                (score > 0).then_some((score, record))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, record)| record).collect()
    }

    /// Returns the notes whose frontmatter `key` equals `value` exactly.
    pub fn query(&self, key: &str, value: &Value) -> Vec<&MetadataRecord> {
        self.records
            .values()
            .filter(|record| record.frontmatter().get(key) == Some(value))
            .collect()
    }

    fn lookup(&self, ids: Option<&IdSet>) -> Vec<&MetadataRecord> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    // ===========================================
    // Snapshots
    // ===========================================

    /// Captures the inverted indices and note fingerprints.
    pub fn snapshot(&self) -> IndexSnapshot {
        IndexSnapshot {
            tags: self
                .tag_index
                .iter()
                .map(|(tag, ids)| (tag.as_str().to_string(), ids.clone()))
                .collect(),
            links: self.link_index.clone(),
            backlinks: self.backlink_index.clone(),
            fingerprints: self.fingerprints.clone(),
        }
    }

    fn load_snapshot(&self) -> Option<IndexSnapshot> {
        let store = self.store.as_ref()?;
        match store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "failed to load index snapshot");
                None
            }
        }
    }

    fn persist(&mut self) {
        if !self.initialized || self.store.is_none() {
            return;
        }
        let snapshot = self.snapshot();
        if let Some(store) = self.store.as_mut()
            && let Err(e) = store.save(&snapshot)
        {
            warn!(error = %e, "failed to save index snapshot");
        }
    }

    // ===========================================
    // Validation
    // ===========================================

    /// Compares the inverted indices with what the live records imply.
    pub fn validate(&self) -> ValidationSummary {
        let mut summary = ValidationSummary::new();

        let mut titles: HashMap<String, Vec<&str>> = HashMap::new();
        for record in self.records.values() {
            titles.entry(record.title_key()).or_default().push(record.id());
        }

        let mut tags: BTreeMap<String, IdSet> = BTreeMap::new();
        let mut links: BTreeMap<String, IdSet> = BTreeMap::new();
        let mut backlinks: BTreeMap<String, IdSet> = BTreeMap::new();
        for record in self.records.values() {
            let id = record.id();
            for tag in record.tags() {
                insert_id(&mut tags, tag.as_str().to_string(), id);
            }
            let mut seen = HashSet::new();
            for link in record.links() {
                let key = link.target_key();
                if !seen.insert(key.clone()) {
                    continue;
                }
                match titles.get(&key) {
                    Some(targets) => {
                        for target in targets {
                            insert_id(&mut backlinks, target.to_string(), id);
                        }
                    }
                    None => summary.add(ValidationIssue::UnresolvedLink {
                        id: id.to_string(),
                        target: link.target().to_string(),
                    }),
                }
                insert_id(&mut links, key, id);
            }
        }

        let actual_tags = self.snapshot().tags;
        self.compare(IndexKind::Tag, &actual_tags, &tags, &mut summary);
        self.compare(IndexKind::Link, &self.link_index, &links, &mut summary);
        self.compare(
            IndexKind::Backlink,
            &self.backlink_index,
            &backlinks,
            &mut summary,
        );
        summary
    }

    fn compare(
        &self,
        index: IndexKind,
        actual: &BTreeMap<String, IdSet>,
        expected: &BTreeMap<String, IdSet>,
        summary: &mut ValidationSummary,
    ) {
        for (key, ids) in actual {
            if ids.is_empty() {
                summary.add(ValidationIssue::EmptyBucket {
                    index,
                    key: key.clone(),
                });
            }
            if index == IndexKind::Backlink && !self.records.contains_key(key) {
                summary.add(ValidationIssue::StaleKey {
                    index,
                    key: key.clone(),
                });
            }
            for id in ids {
                if !self.records.contains_key(id) {
                    summary.add(ValidationIssue::OrphanId {
                        index,
                        key: key.clone(),
                        id: id.clone(),
                    });
                } else if !expected.get(key).is_some_and(|want| want.contains(id)) {
                    summary.add(ValidationIssue::UnexpectedEntry {
                        index,
                        key: key.clone(),
                        id: id.clone(),
                    });
                }
            }
        }
        for (key, ids) in expected {
            for id in ids {
                if !actual.get(key).is_some_and(|have| have.contains(id)) {
                    summary.add(ValidationIssue::MissingEntry {
                        index,
                        key: key.clone(),
                        id: id.clone(),
                    });
                }
            }
        }
    }

    fn check_consistency(&self) {
        #[cfg(debug_assertions)]
        {
            let summary = self.validate();
            debug_assert!(
                !summary.has_errors(),
                "metadata index is inconsistent: {:?}",
                summary.issues_by_severity()
            );
        }
    }
}

// ===========================================
// Id Buckets
// ===========================================

fn insert_id<K, M: IdMap<K>>(map: &mut M, key: K, id: &str) {
    map.bucket(key).insert(id.to_string());
}

/// Removes an id from a bucket, dropping the bucket once it is empty.
fn remove_id<K, Q, M>(map: &mut M, key: &Q, id: &str)
where
    K: Borrow<Q>,
    Q: Ord + Hash + ?Sized,
    M: IdMap<K>,
{
    map.remove_from(key, id);
}

trait IdMap<K> {
    fn bucket(&mut self, key: K) -> &mut IdSet;
    fn remove_from<Q>(&mut self, key: &Q, id: &str)
    where
        K: Borrow<Q>,
        Q: Ord + Hash + ?Sized;
}

impl<K: Ord> IdMap<K> for BTreeMap<K, IdSet> {
    fn bucket(&mut self, key: K) -> &mut IdSet {
        self.entry(key).or_default()
    }

    fn remove_from<Q>(&mut self, key: &Q, id: &str)
    where
        K: Borrow<Q>,
        Q: Ord + Hash + ?Sized,
    {
        if let Some(ids) = self.get_mut(key) {
            ids.remove(id);
            if ids.is_empty() {
                self.remove(key);
            }
        }
    }
}

impl<K: Eq + Hash> IdMap<K> for HashMap<K, IdSet> {
    fn bucket(&mut self, key: K) -> &mut IdSet {
        self.entry(key).or_default()
    }

    fn remove_from<Q>(&mut self, key: &Q, id: &str)
    where
        K: Borrow<Q>,
        Q: Ord + Hash + ?Sized,
    {
        if let Some(ids) = self.get_mut(key) {
            ids.remove(id);
            if ids.is_empty() {
                self.remove(key);
            }
        }
    }
}
