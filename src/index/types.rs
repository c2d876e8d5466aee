use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an entry in the store (insertion order, zero-based)
pub type DocId = u32;

/// Kind of documented item an entry describes.
///
/// Known tags match case-insensitively and are written back in lowercase.
/// Any other tag is kept verbatim in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Section,
    Page,
    Function,
    Method,
    Type,
    Macro,
    Module,
    Constant,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Section => "section",
            Category::Page => "page",
            Category::Function => "function",
            Category::Method => "method",
            Category::Type => "type",
            Category::Macro => "macro",
            Category::Module => "module",
            Category::Constant => "constant",
            Category::Other(tag) => tag.as_str(),
        }
    }

    /// Parse a tag, case-insensitively for the known kinds
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "section" => Category::Section,
            "page" => Category::Page,
            "function" => Category::Function,
            "method" => Category::Method,
            "type" => Category::Type,
            "macro" => Category::Macro,
            "module" => Category::Module,
            "constant" => Category::Constant,
            _ => Category::Other(tag.to_string()),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other(String::new())
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match Category::from_tag(&tag) {
            Category::Other(_) => Category::Other(tag),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One documented symbol, page, or section from the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    /// URL fragment for the page or anchor (empty means top of page)
    pub location: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub category: Category,
}

impl IndexEntry {
    pub fn new(
        location: impl Into<String>,
        page: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            location: location.into(),
            page: page.into(),
            title: title.into(),
            text: text.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_known_tags() {
        for tag in ["section", "page", "function", "method", "type", "macro", "module", "constant"] {
            let category = Category::from(tag.to_string());
            assert!(!matches!(category, Category::Other(_)), "{} should be known", tag);
            assert_eq!(String::from(category), tag);
        }
    }

    #[test]
    fn test_category_keeps_unknown_tag() {
        let category = Category::from("abstract type".to_string());
        assert_eq!(category, Category::Other("abstract type".to_string()));
        assert_eq!(category.as_str(), "abstract type");
    }

    #[test]
    fn test_known_tag_is_written_lowercase() {
        let category = Category::from("Function".to_string());
        assert_eq!(category, Category::Function);
        assert_eq!(String::from(category), "function");
    }

    #[test]
    fn test_category_default_is_empty() {
        assert_eq!(Category::default().as_str(), "");
    }

    #[test]
    fn test_entry_defaults_optional_fields() {
        let entry: IndexEntry =
            serde_json::from_str(r##"{"location": "#emd", "text": "solve"}"##).unwrap();
        assert_eq!(entry.page, "");
        assert_eq!(entry.title, "");
        assert_eq!(entry.category, Category::default());
    }

    #[test]
    fn test_entry_serializes_category_as_string() {
        let entry = IndexEntry::new("#emd", "Home", "emd", "solve", Category::Function);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["category"], "function");
    }
}
