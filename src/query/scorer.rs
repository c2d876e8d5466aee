//! Scoring module for search results
//!
//! An entry's score is the weighted count of query terms it contains,
//! normalized by the number of query terms:
//!
//! ```text
//! score = (title_weight * title_hits + text_weight * text_hits) / query_terms
//! ```
//!
//! With the default weights (3, 1) a single-term query that hits both the
//! title and the text scores 4.0; hitting only the text scores 1.0.

use crate::index::store::EntryTokens;
use crate::query::options::Fields;
use serde::{Deserialize, Serialize};

/// Configurable weights for scoring factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of each query term found in the title
    pub title_weight: f32,
    /// Weight of each query term found in the text
    pub text_weight: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title_weight: 3.0,
            text_weight: 1.0,
        }
    }
}

/// Score calculation context for a single entry
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScoreContext {
    /// Number of query terms present in the title
    pub title_hits: usize,
    /// Number of query terms present in the text
    pub text_hits: usize,
    /// Number of (unique) query terms
    pub query_terms: usize,
    /// Query terms present in any searched field, in query order
    pub matched_terms: Vec<String>,
}

/// Scorer calculates relevance scores for index entries
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Create a scorer with default weights
    pub fn with_defaults() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Count which query terms an entry contains, per searched field
    pub fn context(&self, terms: &[String], tokens: &EntryTokens, fields: Fields) -> ScoreContext {
        let mut ctx = ScoreContext {
            query_terms: terms.len(),
            ..Default::default()
        };

        for term in terms {
            let in_title = fields.title && tokens.title.contains(term);
            let in_text = fields.text && tokens.text.contains(term);

            if in_title {
                ctx.title_hits += 1;
            }
            if in_text {
                ctx.text_hits += 1;
            }
            if in_title || in_text {
                ctx.matched_terms.push(term.clone());
            }
        }

        ctx
    }

    /// Calculate the total score for an entry given its context
    pub fn calculate_score(&self, ctx: &ScoreContext) -> f32 {
        if ctx.query_terms == 0 {
            return 0.0;
        }

        let weighted = ctx.title_hits as f32 * self.weights.title_weight
            + ctx.text_hits as f32 * self.weights.text_weight;

        weighted / ctx.query_terms as f32
    }
}
