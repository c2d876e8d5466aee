use crate::error::{Result, SearchError};
use crate::index::types::Category;
use crate::utils::normalize_unique;
use globset::{GlobBuilder, GlobMatcher};

/// Parsed query representation
#[derive(Debug, Clone)]
pub struct Query {
    /// Unique normalized search terms, in the order they were typed
    pub terms: Vec<String>,
    pub filters: QueryFilters,
}

/// Query filters
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    /// Category filter (category:function, cat:method)
    pub categories: Vec<Category>,
    /// Page name glob (page:Home, page:"API*")
    pub page: Option<PageFilter>,
}

/// Compiled page-name glob, matched case-insensitively
#[derive(Debug, Clone)]
pub struct PageFilter {
    pub pattern: String,
    matcher: GlobMatcher,
}

impl PageFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(false)
            .build()
            .map_err(|e| SearchError::invalid_query(format!("bad page pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn matches(&self, page: &str) -> bool {
        self.matcher.is_match(page)
    }
}

/// Parse a query string.
///
/// Words of the form `category:<tag>` (or `cat:<tag>`) and `page:<glob>`
/// become filters; everything else is normalized into search terms. A
/// query with no searchable terms is rejected.
pub fn parse_query(input: &str) -> Result<Query> {
    if input.trim().is_empty() {
        return Err(SearchError::invalid_query("query is empty"));
    }

    let mut filters = QueryFilters::default();
    let mut text_parts: Vec<&str> = Vec::new();

    for word in split_words(input) {
        match split_filter(word) {
            Some((key, "")) => {
                return Err(SearchError::invalid_query(format!(
                    "missing value for {}:",
                    key.name()
                )));
            }
            Some((FilterKey::Category, value)) => {
                let before = filters.categories.len();
                for tag in value.split(',').filter(|t| !t.is_empty()) {
                    filters.categories.push(Category::from_tag(tag));
                }
                if filters.categories.len() == before {
                    return Err(SearchError::invalid_query("missing value for category:"));
                }
            }
            Some((FilterKey::Page, value)) => {
                if filters.page.is_some() {
                    return Err(SearchError::invalid_query("only one page: filter is allowed"));
                }
                filters.page = Some(PageFilter::new(value)?);
            }
            None => text_parts.push(word),
        }
    }

    let terms = normalize_unique(&text_parts.join(" "));
    if terms.is_empty() {
        return Err(SearchError::invalid_query(format!(
            "'{}' contains no searchable terms",
            input.trim()
        )));
    }

    Ok(Query { terms, filters })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterKey {
    Category,
    Page,
}

impl FilterKey {
    fn name(self) -> &'static str {
        match self {
            FilterKey::Category => "category",
            FilterKey::Page => "page",
        }
    }
}

/// Split `key:value` words; unknown keys are ordinary text
fn split_filter(word: &str) -> Option<(FilterKey, &str)> {
    let (key, value) = word.split_once(':')?;
    let key = match key.to_ascii_lowercase().as_str() {
        "category" | "cat" => FilterKey::Category,
        "page" => FilterKey::Page,
        _ => return None,
    };
    Some((key, value.trim_matches('"')))
}

/// Whitespace split that keeps `"quoted words"` together
fn split_words(input: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (i, ch) in input.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        }
        if ch.is_whitespace() && !in_quotes {
            if let Some(s) = start.take() {
                words.push(&input[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(&input[s..]);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_terms() {
        let q = parse_query("optimal Transport").unwrap();
        assert_eq!(q.terms, vec!["optimal", "transport"]);
        assert!(q.filters.categories.is_empty());
        assert!(q.filters.page.is_none());
    }

    #[test]
    fn test_terms_are_unique() {
        let q = parse_query("plan plan PLAN cost").unwrap();
        assert_eq!(q.terms, vec!["plan", "cost"]);
    }

    #[test]
    fn test_empty_query() {
        assert!(matches!(parse_query(""), Err(SearchError::InvalidQuery(_))));
        assert!(matches!(parse_query("   \t"), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_query_without_terms() {
        assert!(matches!(parse_query("a ? !"), Err(SearchError::InvalidQuery(_))));
        assert!(matches!(
            parse_query("category:function"),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_category_filter() {
        let q = parse_query("cat:function,method wasserstein").unwrap();
        assert_eq!(q.terms, vec!["wasserstein"]);
        assert_eq!(q.filters.categories, vec![Category::Function, Category::Method]);
    }

    #[test]
    fn test_page_filter() {
        let q = parse_query("page:\"ho*\" emd").unwrap();
        let page = q.filters.page.unwrap();
        assert_eq!(page.pattern, "ho*");
        assert!(page.matches("Home"));
        assert!(!page.matches("API"));
    }

    #[test]
    fn test_empty_filter_value_is_invalid() {
        assert!(matches!(parse_query("page: emd"), Err(SearchError::InvalidQuery(_))));
        assert!(matches!(parse_query("cat:\"\" emd"), Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_duplicate_page_filter() {
        assert!(matches!(
            parse_query("page:a page:b emd"),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_unknown_key_is_text() {
        let q = parse_query("ExactOptimalTransport:ot_cost").unwrap();
        assert_eq!(q.terms, vec!["exactoptimaltransport", "ot", "cost"]);
    }

    #[test]
    fn test_split_words_quotes() {
        assert_eq!(
            split_words(r#"page:"Getting Started" plan"#),
            vec![r#"page:"Getting Started""#, "plan"]
        );
    }
}
