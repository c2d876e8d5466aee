pub mod executor;
pub mod options;
pub mod parser;
pub mod scorer;

pub use executor::{QueryEngine, SearchMatch, search};
pub use options::{Fields, SearchOptions};
pub use parser::{Query, QueryFilters, parse_query};
pub use scorer::{ScoreContext, Scorer, ScoringWeights};
