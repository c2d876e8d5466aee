use crate::index::store::DocumentStore;
use ahash::AHashMap;
use serde::Serialize;
use std::path::Path;

/// Summary of a loaded index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub pages: usize,
    /// Entry count per category, most common first
    pub categories: Vec<(String, usize)>,
    pub vocabulary: usize,
    pub text_bytes: usize,
    pub empty_texts: usize,
    pub page_anchors: usize,
}

impl IndexStats {
    pub fn collect(store: &DocumentStore) -> Self {
        let mut pages: AHashMap<&str, usize> = AHashMap::new();
        let mut categories: AHashMap<&str, usize> = AHashMap::new();
        let mut text_bytes = 0;
        let mut empty_texts = 0;
        let mut page_anchors = 0;

        for entry in store.all() {
            *pages.entry(entry.page.as_str()).or_insert(0) += 1;
            *categories.entry(entry.category.as_str()).or_insert(0) += 1;
            text_bytes += entry.text.len();
            if entry.text.trim().is_empty() {
                empty_texts += 1;
            }
            if entry.location.is_empty() {
                page_anchors += 1;
            }
        }

        let mut categories: Vec<(String, usize)> = categories
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            entries: store.len(),
            pages: pages.len(),
            categories,
            vocabulary: store.vocabulary_size(),
            text_bytes,
            empty_texts,
            page_anchors,
        }
    }
}

/// Display index statistics
pub fn show_stats(path: &Path, stats: &IndexStats) {
    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index file:       {}", path.display());
    println!("Entries:          {}", stats.entries);
    println!("Pages:            {}", stats.pages);
    println!("Distinct tokens:  {}", stats.vocabulary);
    println!("Text size:        {}", format_size(stats.text_bytes as u64));
    println!("Empty texts:      {}", stats.empty_texts);
    println!("Page-level links: {}", stats.page_anchors);

    println!();
    println!("Entries by category:");
    for (category, count) in stats.categories.iter().take(15) {
        let name = if category.is_empty() { "(none)" } else { category };
        println!("  {:15} {}", name, count);
    }

    if stats.categories.len() > 15 {
        println!("  ... and {} more", stats.categories.len() - 15);
    }
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
