//! Label distribution over the shared library, for the graph view.

use std::collections::HashMap;
use std::fmt;

use crate::domain::{CatalogEntry, ClassificationField};

/// Label used for games without any tags
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Which classification the graph is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphSource {
    Tags,
    Genres,
    Categories,
}

impl GraphSource {
    fn field(&self) -> ClassificationField {
        match self {
            GraphSource::Tags => ClassificationField::Tags,
            GraphSource::Genres => ClassificationField::Genres,
            GraphSource::Categories => ClassificationField::Categories,
        }
    }

    /// Minimum share of the library a label must reach to be shown
    pub fn threshold_ratio(&self) -> f64 {
        match self {
            GraphSource::Tags => 0.15,
            GraphSource::Genres | GraphSource::Categories => 0.05,
        }
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::Tags => write!(f, "Tags"),
            GraphSource::Genres => write!(f, "Genres"),
            GraphSource::Categories => write!(f, "Categories"),
        }
    }
}

/// How the distribution is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphMode {
    #[default]
    Bar,
    Pie,
    Radar,
}

/// One label and the number of games carrying it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    pub value: usize,
}

/// Count labels across the library and keep the common ones.
///
/// Buckets below `len * threshold_ratio` are dropped. The result is sorted
/// by count, descending; equal counts keep the order labels were first seen.
pub fn distribution(library: &[CatalogEntry], source: GraphSource) -> Vec<Bucket> {
    if library.is_empty() {
        return Vec::new();
    }

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in library {
        let mut labels = entry.game.labels(source.field());
        if labels.is_empty() && source == GraphSource::Tags {
            labels.push(UNCATEGORIZED.to_string());
        }

        for label in labels {
            match index.get(&label) {
                Some(&pos) => buckets[pos].value += 1,
                None => {
                    index.insert(label.clone(), buckets.len());
                    buckets.push(Bucket {
                        name: label,
                        value: 1,
                    });
                }
            }
        }
    }

    let threshold = library.len() as f64 * source.threshold_ratio();
    buckets.retain(|b| b.value as f64 >= threshold);
    // stable: ties stay in first-seen order
    buckets.sort_by(|a, b| b.value.cmp(&a.value));
    buckets
}

/// Caption shown under the graph
pub fn footer(source: GraphSource, library_len: usize) -> String {
    format!("Top {} based on {} games.", source, library_len)
}

/// Render buckets as text lines.
///
/// Bar and radar modes draw a horizontal histogram scaled to `width`
/// characters; pie mode lists each bucket's share of the shown total.
pub fn render(buckets: &[Bucket], mode: GraphMode, width: usize) -> Vec<String> {
    let label_width = buckets.iter().map(|b| b.name.chars().count()).max().unwrap_or(0);

    match mode {
        GraphMode::Pie => {
            let total: usize = buckets.iter().map(|b| b.value).sum();
            buckets
                .iter()
                .map(|b| {
                    let share = if total == 0 {
                        0.0
                    } else {
                        b.value as f64 * 100.0 / total as f64
                    };
                    format!("{:<label_width$}  {:>5.1}%  ({})", b.name, share, b.value)
                })
                .collect()
        }
        GraphMode::Bar | GraphMode::Radar => {
            let max = buckets.iter().map(|b| b.value).max().unwrap_or(0);
            buckets
                .iter()
                .map(|b| {
                    let len = if max == 0 { 0 } else { b.value * width / max };
                    format!("{:<label_width$}  {} {}", b.name, "#".repeat(len.max(1)), b.value)
                })
                .collect()
        }
    }
}
