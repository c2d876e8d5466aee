use ahash::AHashSet;
use std::ops::Range;

/// Minimum token length (in characters) kept by the normalizer.
/// Single letters are mostly math variables and list markers in docstrings.
pub const MIN_TOKEN_CHARS: usize = 2;

/// A normalized token together with its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub token: String,
    pub range: Range<usize>,
}

/// Normalize text into an ordered sequence of tokens.
///
/// Text is split on every character that is not alphanumeric, each piece
/// is lower-cased, and pieces shorter than [`MIN_TOKEN_CHARS`] are dropped.
/// Splitting happens before case folding so that a lower-cased character
/// can never introduce a new boundary.
pub fn normalize(text: &str) -> Vec<String> {
    pieces(text).map(|(_, token)| token).collect()
}

/// Normalize and deduplicate, keeping first-occurrence order
pub fn normalize_unique(text: &str) -> Vec<String> {
    let mut seen = AHashSet::new();
    normalize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Normalize into a set, for membership tests during scoring
pub fn token_set(text: &str) -> AHashSet<String> {
    pieces(text).map(|(_, token)| token).collect()
}

/// Normalize text and keep the byte range each token came from.
///
/// Ranges index into `text` itself, so they can be used to slice or
/// highlight the original (un-folded) string.
pub fn token_spans(text: &str) -> Vec<TokenSpan> {
    pieces(text)
        .map(|(range, token)| TokenSpan { token, range })
        .collect()
}

/// Walk the alphanumeric runs of `text`, yielding kept tokens
fn pieces(text: &str) -> impl Iterator<Item = (Range<usize>, String)> + '_ {
    let mut start: Option<usize> = None;
    let mut iter = text.char_indices().chain(std::iter::once((text.len(), ' ')));

    std::iter::from_fn(move || {
        for (i, ch) in iter.by_ref() {
            if ch.is_alphanumeric() && i < text.len() {
                if start.is_none() {
                    start = Some(i);
                }
                continue;
            }

            if let Some(s) = start.take() {
                let piece = &text[s..i];
                let token = piece.to_lowercase();
                if token.chars().count() >= MIN_TOKEN_CHARS {
                    return Some((s..i, token));
                }
            }
        }
        None
    })
}
