//! Folding per-account catalogs into the shared library.
//!
//! Entries are keyed by `appid`. Owners accumulate per entry, and optional
//! metadata is backfilled from whichever owner supplies it first: a
//! populated field is never overwritten by a later merge.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{is_truthy, CatalogEntry, Classification, Price, RawEntry};

/// Merge `incoming` into `current`, attributing new entries to `owner`.
///
/// `current` is left untouched; the result is a fresh library in
/// first-insertion order. Callers sort with [`sort_by_name`] for display.
pub fn merge_library(current: &[CatalogEntry], incoming: &[RawEntry], owner: &str) -> Vec<CatalogEntry> {
    let mut merged: Vec<CatalogEntry> = current.to_vec();
    let mut index: HashMap<u64, usize> = HashMap::with_capacity(merged.len() + incoming.len());
    for (pos, entry) in merged.iter().enumerate() {
        index.entry(entry.appid()).or_insert(pos);
    }

    for game in incoming {
        match index.get(&game.appid) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                if !existing.is_owned_by(owner) {
                    existing.owners.push(owner.to_string());
                }
                backfill_metadata(&mut existing.game, game);
            }
            None => {
                index.insert(game.appid, merged.len());
                merged.push(CatalogEntry::from_raw(game.clone(), owner));
            }
        }
    }

    merged
}

/// Merge a raw API payload. Anything other than a JSON array is a no-op.
pub fn merge_value(current: &[CatalogEntry], incoming: &Value, owner: &str) -> Vec<CatalogEntry> {
    merge_library(current, &RawEntry::parse_list(incoming), owner)
}

/// Sort by name for display: case-insensitive first, then exact
pub fn sort_by_name(library: &mut [CatalogEntry]) {
    library.sort_by(|a, b| compare_names(a.name(), b.name()));
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn backfill_metadata(existing: &mut RawEntry, incoming: &RawEntry) {
    backfill(&mut existing.tags, &incoming.tags);
    backfill(&mut existing.genres, &incoming.genres);
    backfill(&mut existing.categories, &incoming.categories);
    backfill(&mut existing.description, &incoming.description);
    backfill(&mut existing.price, &incoming.price);
    backfill(&mut existing.release_date, &incoming.release_date);
    backfill(&mut existing.user_score, &incoming.user_score);
}

/// Fill `slot` from `incoming` only while `slot` holds nothing meaningful
fn backfill<T: Populated + Clone>(slot: &mut Option<T>, incoming: &Option<T>) {
    if slot.as_ref().is_some_and(|v| v.is_populated()) {
        return;
    }
    if let Some(value) = incoming.as_ref().filter(|v| v.is_populated()) {
        *slot = Some(value.clone());
    }
}

/// Whether a metadata value counts as set: JavaScript truthiness of the
/// value as received, so `""` and `0` are placeholders but `"0.00"` is not
trait Populated {
    fn is_populated(&self) -> bool;
}

impl Populated for Value {
    fn is_populated(&self) -> bool {
        is_truthy(self)
    }
}

impl Populated for Price {
    fn is_populated(&self) -> bool {
        self.is_set()
    }
}

impl Populated for Classification {
    fn is_populated(&self) -> bool {
        self.is_set()
    }
}
