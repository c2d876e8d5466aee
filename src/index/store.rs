use crate::error::{Result, SearchError};
use crate::index::reader::{parse_entries, read_index_file};
use crate::index::types::{DocId, IndexEntry};
use crate::utils::token_set;
use ahash::AHashSet;
use rayon::prelude::*;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::time::Instant;

/// Normalized tokens of one entry, split by field
#[derive(Debug, Clone, Default)]
pub struct EntryTokens {
    pub title: AHashSet<String>,
    pub text: AHashSet<String>,
}

impl EntryTokens {
    fn from_entry(entry: &IndexEntry) -> Self {
        Self {
            title: token_set(&entry.title),
            text: token_set(&entry.text),
        }
    }
}

/// Immutable, in-memory collection of index entries.
///
/// Built once from a raw artifact; tokens and postings are computed at load
/// time so queries never touch the original text except for snippets.
/// The store is `Send + Sync` and can be shared freely between searchers.
#[derive(Debug)]
pub struct DocumentStore {
    entries: Vec<IndexEntry>,
    tokens: Vec<EntryTokens>,
    title_postings: FxHashMap<String, RoaringBitmap>,
    text_postings: FxHashMap<String, RoaringBitmap>,
}

impl DocumentStore {
    /// Parse a raw index (JSON array, `{"docs": [...]}`, or the JS wrapper)
    pub fn load(raw: &str) -> Result<Self> {
        let start = Instant::now();
        let entries = parse_entries(raw)?;
        let store = Self::from_entries(entries)?;
        tracing::debug!(
            entries = store.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded search index"
        );
        Ok(store)
    }

    /// Load an index file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let start = Instant::now();
        let entries = read_index_file(path)?;
        let store = Self::from_entries(entries)?;
        tracing::debug!(
            path = %path.display(),
            entries = store.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "opened search index"
        );
        Ok(store)
    }

    /// Build a store from already-parsed entries
    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self> {
        if entries.len() > DocId::MAX as usize {
            return Err(SearchError::format(format!(
                "too many entries ({})",
                entries.len()
            )));
        }

        let tokens: Vec<EntryTokens> = entries.par_iter().map(EntryTokens::from_entry).collect();

        let mut title_postings: FxHashMap<String, RoaringBitmap> = FxHashMap::default();
        let mut text_postings: FxHashMap<String, RoaringBitmap> = FxHashMap::default();

        for (doc_id, entry_tokens) in tokens.iter().enumerate() {
            let doc_id = doc_id as DocId;
            for token in &entry_tokens.title {
                title_postings.entry(token.clone()).or_default().insert(doc_id);
            }
            for token in &entry_tokens.text {
                text_postings.entry(token.clone()).or_default().insert(doc_id);
            }
        }

        Ok(Self {
            entries,
            tokens,
            title_postings,
            text_postings,
        })
    }

    /// All entries in insertion order
    pub fn all(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Entry at `index`, or `OutOfRange`
    pub fn get(&self, index: usize) -> Result<&IndexEntry> {
        self.entries.get(index).ok_or(SearchError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries with their ids
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &IndexEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i as DocId, entry))
    }

    /// Token sets of an entry
    pub fn tokens(&self, doc_id: DocId) -> Option<&EntryTokens> {
        self.tokens.get(doc_id as usize)
    }

    /// Entries whose title contains `token`
    pub fn title_postings(&self, token: &str) -> Option<&RoaringBitmap> {
        self.title_postings.get(token)
    }

    /// Entries whose text contains `token`
    pub fn text_postings(&self, token: &str) -> Option<&RoaringBitmap> {
        self.text_postings.get(token)
    }

    /// Number of distinct tokens across titles and texts
    pub fn vocabulary_size(&self) -> usize {
        let mut vocab: AHashSet<&str> = self.title_postings.keys().map(String::as_str).collect();
        vocab.extend(self.text_postings.keys().map(String::as_str));
        vocab.len()
    }
}
