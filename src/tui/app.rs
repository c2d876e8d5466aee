use crate::error::SearchError;
use crate::index::store::DocumentStore;
use crate::index::types::{DocId, IndexEntry};
use crate::output::{DisplayResult, format_with_width};
use crate::query::QueryEngine;
use crate::utils::AppConfig;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    Preview,
    Help,
}

/// Index loading state for background loading
pub enum IndexLoadState {
    /// Index is loading in background
    Loading(Receiver<Result<DocumentStore, String>>),
    /// Index loaded successfully
    Ready,
    /// Index loading failed (error message stored in status_message)
    Failed,
}

/// One row of the results list
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub doc_id: DocId,
    pub display: DisplayResult,
}

/// LRU cache size for search results
const SEARCH_CACHE_SIZE: usize = 64;

/// Rows moved by page up/down
const PAGE_SIZE: usize = 10;

/// Application state
pub struct App {
    pub index_path: PathBuf,
    store: Option<Arc<DocumentStore>>,
    config: AppConfig,
    pub query: String,
    pub results: Vec<ResultRow>,
    pub selected: usize,
    pub mode: Mode,
    /// Previous mode before entering help (to return to)
    pub previous_mode: Mode,
    pub preview_scroll: usize,
    pub status_message: String,
    /// Pending key for vim multi-key commands (e.g., 'g' for 'gg')
    pub pending_key: Option<char>,
    load_state: IndexLoadState,
    /// Query the current results belong to
    searched_query: String,
    /// LRU cache of recent search results for instant recall
    search_cache: LruCache<String, Vec<ResultRow>>,
}

impl App {
    /// Create the app and start loading the index in the background
    pub fn new(index_path: PathBuf, config: AppConfig) -> Self {
        let load_state = spawn_load(index_path.clone());

        Self {
            index_path,
            store: None,
            config,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            mode: Mode::Search,
            previous_mode: Mode::Search,
            preview_scroll: 0,
            status_message: "Loading index...".to_string(),
            pending_key: None,
            load_state,
            searched_query: String::new(),
            search_cache: LruCache::new(
                NonZeroUsize::new(SEARCH_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
        }
    }

    /// Check for background index load completion (call this in event loop)
    pub fn poll_index_load(&mut self) {
        let current_state = std::mem::replace(&mut self.load_state, IndexLoadState::Ready);

        self.load_state = match current_state {
            IndexLoadState::Loading(rx) => match rx.try_recv() {
                Ok(Ok(store)) => {
                    self.status_message = format!("{} entries loaded", store.len());
                    self.store = Some(Arc::new(store));
                    // Results typed during a reload came from the old store
                    self.search_cache.clear();
                    // Force the pending query (if any) to run
                    self.searched_query.clear();
                    self.refresh();
                    IndexLoadState::Ready
                }
                Ok(Err(msg)) => {
                    self.status_message = format!("Failed to load index: {}", msg);
                    IndexLoadState::Failed
                }
                Err(TryRecvError::Empty) => IndexLoadState::Loading(rx),
                Err(TryRecvError::Disconnected) => {
                    self.status_message = "Index loader stopped unexpectedly".to_string();
                    IndexLoadState::Failed
                }
            },
            other => other,
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, IndexLoadState::Loading(_))
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.refresh();
    }

    /// Re-run the search if the query changed since the last run
    pub fn refresh(&mut self) {
        if self.query != self.searched_query {
            self.execute_search();
        }
    }

    /// Run the current query against the loaded store
    pub fn execute_search(&mut self) {
        self.searched_query = self.query.clone();
        self.selected = 0;
        self.preview_scroll = 0;

        if self.query.trim().is_empty() {
            self.results.clear();
            if self.store.is_some() {
                self.status_message = "Type to search".to_string();
            }
            return;
        }

        let Some(store) = self.store.clone() else {
            return;
        };

        if let Some(cached) = self.search_cache.get(&self.query) {
            self.results = cached.clone();
            self.status_message = format!("{} matches (cached)", self.results.len());
            return;
        }

        let start = Instant::now();
        let engine = QueryEngine::with_scoring_weights(&store, self.config.weights);
        let options = self.config.search_options();

        match engine.search(&self.query, &options) {
            Ok(matches) => {
                let displays = format_with_width(&matches, self.config.snippet_width);
                self.results = matches
                    .iter()
                    .zip(displays)
                    .map(|(m, display)| ResultRow {
                        doc_id: m.doc_id,
                        display,
                    })
                    .collect();
                self.status_message = format!(
                    "{} matches in {:.1}ms",
                    self.results.len(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
                self.search_cache.put(self.query.clone(), self.results.clone());
            }
            Err(SearchError::InvalidQuery(msg)) => {
                self.results.clear();
                self.status_message = msg;
            }
            Err(e) => {
                self.results.clear();
                self.status_message = format!("Search failed: {}", e);
            }
        }
    }

    /// Reload the index from disk, dropping cached results
    pub fn reload(&mut self) {
        if self.is_loading() {
            return;
        }
        self.search_cache.clear();
        self.status_message = "Reloading index...".to_string();
        self.load_state = spawn_load(self.index_path.clone());
    }

    pub fn get_selected_result(&self) -> Option<&ResultRow> {
        self.results.get(self.selected)
    }

    /// Entry behind the selected result
    pub fn selected_entry(&self) -> Option<&IndexEntry> {
        let row = self.get_selected_result()?;
        self.store.as_ref()?.get(row.doc_id as usize).ok()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
            self.preview_scroll = 0;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.preview_scroll = 0;
        }
    }

    pub fn select_page_down(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + PAGE_SIZE).min(self.results.len() - 1);
            self.preview_scroll = 0;
        }
    }

    pub fn select_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(PAGE_SIZE);
        self.preview_scroll = 0;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.preview_scroll = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.results.len().saturating_sub(1);
        self.preview_scroll = 0;
    }

    pub fn toggle_preview(&mut self) {
        self.mode = match self.mode {
            Mode::Preview => Mode::Search,
            _ if self.results.is_empty() => Mode::Search,
            _ => Mode::Preview,
        };
    }

    pub fn show_help(&mut self) {
        if self.mode != Mode::Help {
            self.previous_mode = self.mode;
            self.mode = Mode::Help;
        }
    }

    pub fn hide_help(&mut self) {
        self.mode = self.previous_mode;
    }

    pub fn scroll_preview_down(&mut self) {
        self.preview_scroll += 1;
    }

    pub fn scroll_preview_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(1);
    }

    pub fn scroll_preview_page_down(&mut self) {
        self.preview_scroll += PAGE_SIZE * 2;
    }

    pub fn scroll_preview_page_up(&mut self) {
        self.preview_scroll = self.preview_scroll.saturating_sub(PAGE_SIZE * 2);
    }

    pub fn scroll_preview_to_top(&mut self) {
        self.preview_scroll = 0;
    }

    /// Delete the last word of the query (Ctrl+W)
    pub fn delete_word(&mut self) {
        let trimmed = self.query.trim_end().len();
        self.query.truncate(trimmed);
        let cut = self
            .query
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.query.truncate(cut);
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

/// Start loading the index on a worker thread
fn spawn_load(index_path: PathBuf) -> IndexLoadState {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = DocumentStore::open(&index_path).map_err(|e| e.to_string());
        let _ = tx.send(result);
    });
    IndexLoadState::Loading(rx)
}
