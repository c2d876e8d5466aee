use crate::index::types::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which entry fields a query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    pub title: bool,
    pub text: bool,
}

impl Fields {
    pub const BOTH: Fields = Fields { title: true, text: true };
    pub const TITLE: Fields = Fields { title: true, text: false };
    pub const TEXT: Fields = Fields { title: false, text: true };

    pub fn is_empty(&self) -> bool {
        !self.title && !self.text
    }
}

impl Default for Fields {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Parses `title`, `text`, `title,text` or `all`
impl FromStr for Fields {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = Fields { title: false, text: false };
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "title" => fields.title = true,
                "text" => fields.text = true,
                "all" | "both" => fields = Fields::BOTH,
                other => return Err(format!("unknown field '{}' (expected title or text)", other)),
            }
        }
        if fields.is_empty() {
            return Err("no fields given".to_string());
        }
        Ok(fields)
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.title, self.text) {
            (true, true) => f.write_str("title,text"),
            (true, false) => f.write_str("title"),
            (false, true) => f.write_str("text"),
            (false, false) => f.write_str("none"),
        }
    }
}

/// Per-call search options
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum results returned; zero or negative yields no results
    pub limit: i64,
    /// Fields the query is matched against
    pub fields: Fields,
    /// Matches scoring below this threshold are discarded
    pub min_score: f32,
    /// Only return entries of these categories
    pub categories: Option<Vec<Category>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            fields: Fields::BOTH,
            min_score: 0.0,
            categories: None,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }
}
