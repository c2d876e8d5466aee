use crate::error::Result;
use crate::index::store::DocumentStore;
use crate::index::types::{Category, DocId, IndexEntry};
use crate::query::options::{Fields, SearchOptions};
use crate::query::parser::{Query, parse_query};
use crate::query::scorer::{Scorer, ScoringWeights};
use rayon::prelude::*;
use roaring::RoaringBitmap;
use std::cmp::Ordering;
use std::time::Instant;

/// A scored entry returned by the engine
#[derive(Debug, Clone)]
pub struct SearchMatch<'a> {
    pub doc_id: DocId,
    pub entry: &'a IndexEntry,
    pub score: f32,
    /// Query terms found in the searched fields, in query order
    pub matched_terms: Vec<String>,
}

/// Query engine over an immutable [`DocumentStore`].
///
/// The engine holds only a shared borrow of the store, so any number of
/// engines can search the same store from different threads.
pub struct QueryEngine<'a> {
    store: &'a DocumentStore,
    scorer: Scorer,
}

impl<'a> QueryEngine<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self {
            store,
            scorer: Scorer::with_defaults(),
        }
    }

    /// Create engine with custom scoring weights
    pub fn with_scoring_weights(store: &'a DocumentStore, weights: ScoringWeights) -> Self {
        Self {
            store,
            scorer: Scorer::new(weights),
        }
    }

    /// Parse and execute a query string
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchMatch<'a>>> {
        let query = parse_query(query)?;
        Ok(self.execute(&query, options))
    }

    /// Execute a parsed query and return matches, best first.
    ///
    /// Ties keep insertion order, so the output is identical across runs
    /// regardless of how candidate scoring is scheduled.
    pub fn execute(&self, query: &Query, options: &SearchOptions) -> Vec<SearchMatch<'a>> {
        if options.limit <= 0 || options.fields.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let candidates = self.candidates(&query.terms, options.fields);
        let candidate_ids: Vec<DocId> = candidates.iter().collect();

        let store = self.store;
        let mut matches: Vec<SearchMatch<'a>> = candidate_ids
            .par_iter()
            .filter_map(|&doc_id| {
                let entry = store.get(doc_id as usize).ok()?;
                if !passes_filters(entry, query, options) {
                    return None;
                }

                let tokens = store.tokens(doc_id)?;
                let ctx = self.scorer.context(&query.terms, tokens, options.fields);
                let score = self.scorer.calculate_score(&ctx);
                if score <= 0.0 || score < options.min_score {
                    return None;
                }

                Some(SearchMatch {
                    doc_id,
                    entry,
                    score,
                    matched_terms: ctx.matched_terms,
                })
            })
            .collect();

        sort_matches(&mut matches);

        let limit = usize::try_from(options.limit).unwrap_or(usize::MAX);
        let total = matches.len();
        matches.truncate(limit);

        tracing::debug!(
            terms = ?query.terms,
            candidates = candidate_ids.len(),
            matched = total,
            returned = matches.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "executed query"
        );

        matches
    }

    /// Union of the postings of every term in the searched fields
    fn candidates(&self, terms: &[String], fields: Fields) -> RoaringBitmap {
        let mut candidates = RoaringBitmap::new();
        for term in terms {
            if fields.title {
                if let Some(docs) = self.store.title_postings(term) {
                    candidates |= docs;
                }
            }
            if fields.text {
                if let Some(docs) = self.store.text_postings(term) {
                    candidates |= docs;
                }
            }
        }
        candidates
    }
}

/// Search `store` with default scoring weights
pub fn search<'a>(
    store: &'a DocumentStore,
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<SearchMatch<'a>>> {
    QueryEngine::new(store).search(query, options)
}

fn passes_filters(entry: &IndexEntry, query: &Query, options: &SearchOptions) -> bool {
    if let Some(allowed) = &options.categories {
        if !category_allowed(&entry.category, allowed) {
            return false;
        }
    }
    if !query.filters.categories.is_empty()
        && !category_allowed(&entry.category, &query.filters.categories)
    {
        return false;
    }
    if let Some(page) = &query.filters.page {
        if !page.matches(&entry.page) {
            return false;
        }
    }
    true
}

fn category_allowed(category: &Category, allowed: &[Category]) -> bool {
    allowed.iter().any(|c| c == category)
}

/// Descending score, then ascending insertion order
fn sort_matches(matches: &mut [SearchMatch<'_>]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.doc_id.cmp(&b.doc_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn single_entry_store() -> DocumentStore {
        DocumentStore::from_entries(vec![IndexEntry::new(
            "#home",
            "Home",
            "emd",
            "Compute the optimal transport plan",
            Category::default(),
        )])
        .unwrap()
    }

    fn sample_store() -> DocumentStore {
        DocumentStore::from_entries(vec![
            IndexEntry::new("", "Home", "Home", "emd\nemd2", Category::Page),
            IndexEntry::new(
                "#ExactOptimalTransport.emd",
                "Home",
                "ExactOptimalTransport.emd",
                "emd(μ, ν, C, optimizer)\n\nCompute the optimal transport plan",
                Category::Function,
            ),
            IndexEntry::new(
                "#ExactOptimalTransport.emd2",
                "Home",
                "ExactOptimalTransport.emd2",
                "emd2(μ, ν, C, optimizer)\n\nCompute the optimal transport cost",
                Category::Function,
            ),
            IndexEntry::new(
                "#ExactOptimalTransport.wasserstein",
                "Home",
                "ExactOptimalTransport.wasserstein",
                "Compute the p-Wasserstein distance. See also: ot_cost",
                Category::Function,
            ),
            IndexEntry::new(
                "#ExactOptimalTransport.ot_cost-Tuple",
                "API",
                "ExactOptimalTransport.ot_cost",
                "Compute the optimal transport cost between normal distributions",
                Category::Method,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_entry_match() {
        let store = single_entry_store();
        let results = search(&store, "transport", &SearchOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.location, "#home");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_no_match_is_empty() {
        let store = single_entry_store();
        let results = search(&store, "zzz_no_match", &SearchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_query_is_invalid() {
        let store = single_entry_store();
        assert!(matches!(
            search(&store, "", &SearchOptions::default()),
            Err(SearchError::InvalidQuery(_))
        ));

        let empty = DocumentStore::from_entries(Vec::new()).unwrap();
        assert!(matches!(
            search(&empty, "", &SearchOptions::default()),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_limit_zero_or_negative() {
        let store = sample_store();
        for limit in [0, -1, -100] {
            let opts = SearchOptions::default().with_limit(limit);
            assert!(search(&store, "transport", &opts).unwrap().is_empty());
        }
    }

    #[test]
    fn test_limit_truncates() {
        let store = sample_store();
        let opts = SearchOptions::default().with_limit(2);
        assert_eq!(search(&store, "compute", &opts).unwrap().len(), 2);
    }

    #[test]
    fn test_sorted_by_non_increasing_score() {
        let store = sample_store();
        for q in ["emd", "optimal transport cost", "wasserstein ot_cost", "compute"] {
            let results = search(&store, q, &SearchOptions::default()).unwrap();
            assert!(
                results.windows(2).all(|w| w[0].score >= w[1].score),
                "results for '{}' not sorted",
                q
            );
        }
    }

    #[test]
    fn test_title_hits_rank_first() {
        let store = sample_store();
        let results = search(&store, "emd2", &SearchOptions::default()).unwrap();
        // title + text beats text only
        assert_eq!(results[0].doc_id, 2);
        assert_eq!(results[0].score, 4.0);
        assert_eq!(results[1].doc_id, 0);
        assert_eq!(results[1].score, 1.0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let store = sample_store();
        let results = search(&store, "compute", &SearchOptions::default()).unwrap();
        let ids: Vec<_> = results.iter().map(|m| m.doc_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_min_score() {
        let store = sample_store();
        let opts = SearchOptions::default().with_min_score(2.0);
        let results = search(&store, "emd2", &opts).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, 2);
    }

    #[test]
    fn test_fields_title_only() {
        let store = sample_store();
        let opts = SearchOptions::default().with_fields(Fields::TITLE);
        let results = search(&store, "transport", &opts).unwrap();
        assert!(results.is_empty());

        let results = search(&store, "wasserstein", &opts).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].doc_id, 3);
    }

    #[test]
    fn test_category_option() {
        let store = sample_store();
        let opts = SearchOptions::default().with_categories(vec![Category::Method]);
        let results = search(&store, "cost", &opts).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.category, Category::Method);
    }

    #[test]
    fn test_query_filters() {
        let store = sample_store();
        let results = search(&store, "cat:function cost", &SearchOptions::default()).unwrap();
        let ids: Vec<_> = results.iter().map(|m| m.doc_id).collect();
        assert_eq!(ids, vec![2, 3]);

        let results = search(&store, "page:api compute", &SearchOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.page, "API");
    }

    #[test]
    fn test_matched_terms_reported() {
        let store = sample_store();
        let results = search(&store, "wasserstein zebra", &SearchOptions::default()).unwrap();
        assert_eq!(results[0].matched_terms, vec!["wasserstein"]);
        assert_eq!(results[0].score, 2.0);
    }

    #[test]
    fn test_custom_weights_change_ranking() {
        let store = sample_store();
        let engine = QueryEngine::with_scoring_weights(
            &store,
            ScoringWeights {
                title_weight: 0.0,
                text_weight: 1.0,
            },
        );
        let results = engine.search("emd2", &SearchOptions::default()).unwrap();
        assert_eq!(results[0].doc_id, 0);
        assert_eq!(results[1].doc_id, 2);
    }

    #[test]
    fn test_repeated_search_is_identical() {
        let store = sample_store();
        let a = search(&store, "optimal cost", &SearchOptions::default()).unwrap();
        let b = search(&store, "optimal cost", &SearchOptions::default()).unwrap();
        let ids_a: Vec<_> = a.iter().map(|m| (m.doc_id, m.score)).collect();
        let ids_b: Vec<_> = b.iter().map(|m| (m.doc_id, m.score)).collect();
        assert_eq!(ids_a, ids_b);
    }
}
