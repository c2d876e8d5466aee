pub mod reader;
pub mod stats;
pub mod store;
pub mod types;

pub use store::{DocumentStore, EntryTokens};
pub use types::*;
