//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration file handling and index discovery
//! - [`tokenizer`] - Text normalization shared by indexing and querying
//!
//! ## Key Functions
//!
//! ```no_run
//! use docsift::utils::{normalize, normalize_unique};
//!
//! let tokens = normalize("Compute the optimal transport plan");
//! // Returns: ["compute", "the", "optimal", "transport", "plan"]
//!
//! let unique = normalize_unique("plan cost plan");
//! // Returns: ["plan", "cost"]
//! ```

pub mod app_data;
pub mod tokenizer;

pub use app_data::*;
pub use tokenizer::*;
