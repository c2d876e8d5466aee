//! # docsift - Documentation Search Index Query Engine
//!
//! docsift loads the `search_index.js` artifact a documentation generator
//! emits next to its HTML pages and answers ranked keyword queries against
//! it, from the command line or an interactive terminal UI.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Loading and validating the index into a [`DocumentStore`]
//! - [`query`] - Query parsing, scoring, and execution
//! - [`output`] - Turning matches into display results (snippets, color, JSON)
//! - [`utils`] - Tokenizer, configuration, and index discovery
//! - `tui` - Interactive terminal UI (behind the `interactive` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! use docsift::{DocumentStore, SearchOptions, format, search};
//! use std::path::Path;
//!
//! let store = DocumentStore::open(Path::new("build/search_index.js")).unwrap();
//! let matches = search(&store, "transport plan", &SearchOptions::default()).unwrap();
//!
//! for result in format(&matches) {
//!     println!("{} {}: {}", result.title, result.location, result.snippet);
//! }
//! ```
//!
//! ## Scoring
//!
//! Every distinct query token found among an entry's title tokens counts
//! three points and among its text tokens one point. The sum is divided by
//! the number of query tokens, and results are ordered by score with ties
//! kept in index order.

pub mod error;
pub mod index;
pub mod output;
pub mod query;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;

pub use error::{Result, SearchError};
pub use index::{Category, DocId, DocumentStore, IndexEntry};
pub use output::{DisplayResult, format};
pub use query::{Fields, SearchMatch, SearchOptions, search};
