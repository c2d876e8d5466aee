//! Result formatting: display records, snippets, and terminal/JSON output

use crate::index::types::{DocId, IndexEntry};
use crate::query::executor::SearchMatch;
use crate::utils::token_spans;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Default character budget for snippets
pub const DEFAULT_SNIPPET_WIDTH: usize = 160;

const ELLIPSIS: char = '…';

/// A match mapped to the fields a front end displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayResult {
    pub title: String,
    pub location: String,
    pub snippet: String,
    pub page: String,
    pub category: String,
    pub score: f32,
    /// Query terms the entry matched, used for highlighting
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,
}

/// Format matches with the default snippet width
pub fn format(matches: &[SearchMatch<'_>]) -> Vec<DisplayResult> {
    format_with_width(matches, DEFAULT_SNIPPET_WIDTH)
}

/// Format matches, keeping their order
pub fn format_with_width(matches: &[SearchMatch<'_>], width: usize) -> Vec<DisplayResult> {
    matches
        .iter()
        .map(|m| DisplayResult {
            title: m.entry.title.clone(),
            location: m.entry.location.clone(),
            snippet: build_snippet(&m.entry.text, &m.matched_terms, width),
            page: m.entry.page.clone(),
            category: m.entry.category.to_string(),
            score: m.score,
            matched_terms: m.matched_terms.clone(),
        })
        .collect()
}

/// Build a bounded excerpt of `text` around the first matching term.
///
/// Whitespace runs are collapsed first. If the text fits in `width`
/// characters it is returned whole; otherwise a window centered on the
/// first token equal to one of `terms` is cut out and `…` marks each
/// truncated side. The result never exceeds `width` characters.
pub fn build_snippet(text: &str, terms: &[String], width: usize) -> String {
    let collapsed = collapse_whitespace(text);
    let total = collapsed.chars().count();
    if total <= width {
        return collapsed;
    }
    if width <= 2 {
        return collapsed.chars().take(width).collect();
    }

    let anchor = token_spans(&collapsed)
        .into_iter()
        .find(|span| terms.iter().any(|t| *t == span.token))
        .map(|span| {
            let pos = collapsed[..span.range.start].chars().count();
            let len = collapsed[span.range].chars().count();
            (pos, len)
        });

    // Reserve room for both markers
    let body = width - 2;
    let start = match anchor {
        Some((pos, len)) => (pos + len / 2).saturating_sub(body / 2).min(total - body),
        None => 0,
    };
    let end = start + body;

    let excerpt: String = collapsed.chars().skip(start).take(body).collect();
    let mut snippet = String::with_capacity(excerpt.len() + 2 * ELLIPSIS.len_utf8());
    if start > 0 {
        snippet.push(ELLIPSIS);
    }
    snippet.push_str(excerpt.trim());
    if end < total {
        snippet.push(ELLIPSIS);
    }
    snippet
}

/// Replace every whitespace run with a single space
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Print search results to stdout
pub fn print_results(results: &[DisplayResult], color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    write_results(&mut stdout, results)
}

/// Write results as a numbered list: heading, location, snippet
pub fn write_results<W: WriteColor>(out: &mut W, results: &[DisplayResult]) -> io::Result<()> {
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }

        write!(out, "{:>2}. ", i + 1)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(out, "{}", display_title(&result.title, &result.page))?;
        out.reset()?;

        if !result.category.is_empty() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "  [{}]", result.category)?;
            out.reset()?;
        }
        writeln!(out, "  ({:.2})", result.score)?;

        write!(out, "    ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{}", display_location(&result.page, &result.location))?;
        out.reset()?;

        if !result.snippet.is_empty() {
            write!(out, "    ")?;
            write_highlighted(out, &result.snippet, &result.matched_terms)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Write `text`, highlighting every token equal to one of `terms`
pub fn write_highlighted<W: WriteColor>(out: &mut W, text: &str, terms: &[String]) -> io::Result<()> {
    let mut pos = 0;
    for span in token_spans(text) {
        if !terms.iter().any(|t| *t == span.token) {
            continue;
        }
        write!(out, "{}", &text[pos..span.range.start])?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(out, "{}", &text[span.range.clone()])?;
        out.reset()?;
        pos = span.range.end;
    }
    write!(out, "{}", &text[pos..])
}

/// Print a single entry in full
pub fn print_entry(doc_id: DocId, entry: &IndexEntry, color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    write_entry(&mut stdout, doc_id, entry)
}

pub fn write_entry<W: WriteColor>(out: &mut W, doc_id: DocId, entry: &IndexEntry) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(out, "{}", display_title(&entry.title, &entry.page))?;
    out.reset()?;

    writeln!(out, "  id:       {}", doc_id)?;
    writeln!(out, "  page:     {}", entry.page)?;
    writeln!(out, "  location: {}", display_location(&entry.page, &entry.location))?;
    writeln!(out, "  category: {}", entry.category)?;

    if !entry.text.trim().is_empty() {
        writeln!(out)?;
        for line in entry.text.trim_end().lines() {
            writeln!(out, "  {}", line)?;
        }
    }

    Ok(())
}

/// Print one line per entry (for the list command)
pub fn print_entry_list<'a>(
    entries: impl IntoIterator<Item = (DocId, &'a IndexEntry)>,
    color: ColorChoice,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    write_entry_list(&mut stdout, entries)
}

pub fn write_entry_list<'a, W: WriteColor>(
    out: &mut W,
    entries: impl IntoIterator<Item = (DocId, &'a IndexEntry)>,
) -> io::Result<()> {
    for (doc_id, entry) in entries {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:>5}", doc_id)?;
        out.reset()?;
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<9}", entry.category)?;
        out.reset()?;
        writeln!(out, " {}", display_title(&entry.title, &entry.page))?;
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, value)?;
    writeln!(lock)
}

fn display_title<'a>(title: &'a str, page: &'a str) -> &'a str {
    if title.is_empty() { page } else { title }
}

fn display_location(page: &str, location: &str) -> String {
    if location.is_empty() {
        format!("{} (top)", page)
    } else {
        format!("{} {}", page, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::store::DocumentStore;
    use crate::index::types::Category;
    use crate::query::{SearchOptions, search};
    use termcolor::Buffer;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_short_text_returned_whole() {
        let snippet = build_snippet("Compute the\n\noptimal plan", &terms(&["plan"]), 160);
        assert_eq!(snippet, "Compute the optimal plan");
    }

    #[test]
    fn test_snippet_centered_on_match() {
        let prefix = "lorem ipsum ".repeat(30);
        let suffix = " dolor sit amet".repeat(30);
        let text = format!("{}wasserstein{}", prefix, suffix);

        let snippet = build_snippet(&text, &terms(&["wasserstein"]), 160);
        assert!(snippet.contains("wasserstein"));
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with(ELLIPSIS));
        assert!(snippet.chars().count() <= 160);
    }

    #[test]
    fn test_snippet_without_match_starts_at_beginning() {
        let text = "optimal transport ".repeat(20);
        let snippet = build_snippet(&text, &terms(&["zebra"]), 40);
        assert!(snippet.starts_with("optimal"));
        assert!(snippet.ends_with(ELLIPSIS));
        assert!(snippet.chars().count() <= 40);
    }

    #[test]
    fn test_snippet_match_near_end() {
        let text = format!("{} cost", "transport ".repeat(40));
        let snippet = build_snippet(&text, &terms(&["cost"]), 50);
        assert!(snippet.starts_with(ELLIPSIS));
        assert!(snippet.ends_with("cost"));
    }

    #[test]
    fn test_snippet_multibyte_text() {
        let text = "μν γ ".repeat(100) + "kantorovich";
        let snippet = build_snippet(&text, &terms(&["kantorovich"]), 30);
        assert!(snippet.contains("kantorovich"));
        assert!(snippet.chars().count() <= 30);
    }

    #[test]
    fn test_snippet_tiny_width() {
        assert_eq!(build_snippet("abcdef", &[], 2), "ab");
        assert_eq!(build_snippet("abcdef", &[], 0), "");
        assert_eq!(build_snippet("", &[], 10), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\n\nb\tc  "), "a b c");
    }

    #[test]
    fn test_format_preserves_location_and_order() {
        let store = DocumentStore::load(
            r##"[
                {"location": "#home", "page": "Home", "title": "emd", "text": "Compute the optimal transport plan"},
                {"location": "", "page": "Home", "title": "", "text": "optimal transport overview", "category": "page"}
            ]"##,
        )
        .unwrap();

        let matches = search(&store, "transport", &SearchOptions::default()).unwrap();
        let results = format(&matches);

        assert_eq!(results.len(), matches.len());
        for (result, m) in results.iter().zip(&matches) {
            assert_eq!(result.location, m.entry.location);
            assert_eq!(result.score, m.score);
        }
        assert_eq!(results[1].category, "page");
    }

    #[test]
    fn test_write_results_plain() {
        let results = vec![DisplayResult {
            title: "ExactOptimalTransport.emd".to_string(),
            location: "#ExactOptimalTransport.emd".to_string(),
            snippet: "Compute the optimal transport plan".to_string(),
            page: "Home".to_string(),
            category: "function".to_string(),
            score: 4.0,
            matched_terms: terms(&["transport"]),
        }];

        let mut buffer = Buffer::no_color();
        write_results(&mut buffer, &results).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains(" 1. ExactOptimalTransport.emd  [function]  (4.00)"));
        assert!(text.contains("Home #ExactOptimalTransport.emd"));
        assert!(text.contains("Compute the optimal transport plan"));
    }

    #[test]
    fn test_write_entry_list() {
        let entry = IndexEntry::new("", "Home", "", "emd", Category::Page);
        let mut buffer = Buffer::no_color();
        write_entry_list(&mut buffer, [(0, &entry)]).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("page"));
        assert!(text.contains("Home"));
    }

    #[test]
    fn test_display_result_json() {
        let result = DisplayResult {
            title: "emd".to_string(),
            location: "#home".to_string(),
            snippet: String::new(),
            page: "Home".to_string(),
            category: String::new(),
            score: 1.0,
            matched_terms: Vec::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["location"], "#home");
        assert!(json.get("matched_terms").is_none());
    }
}
