//! # Verse Highlights
//!
//! Maps `"{book}-{chapter}"` to the verses the reader has marked.
//!
//! Invariants:
//! - every set is strictly ascending with unique, positive verse numbers
//! - a key never maps to an empty set
//!
//! Mutations return a new map rather than editing in place, so the caller
//! can compare old and new values to decide whether to persist.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::storage::{KEY_HIGHLIGHTS, KeyValueStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightMap {
    chapters: BTreeMap<String, BTreeSet<u32>>,
}

/// Storage key for a chapter, e.g. `"Gênesis-1"`.
pub fn chapter_key(book: &str, chapter: u32) -> String {
    format!("{book}-{chapter}")
}

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `verse` for the chapter. Verse 0 is not a verse; the map comes
    /// back unchanged.
    pub fn toggle(&self, book: &str, chapter: u32, verse: u32) -> HighlightMap {
        let mut next = self.clone();
        if verse == 0 {
            return next;
        }
        let key = chapter_key(book, chapter);
        let verses = next.chapters.entry(key.clone()).or_default();
        if !verses.remove(&verse) {
            verses.insert(verse);
        }
        if verses.is_empty() {
            next.chapters.remove(&key);
        }
        next
    }

    /// Drops every highlight in the chapter.
    pub fn clear(&self, book: &str, chapter: u32) -> HighlightMap {
        let mut next = self.clone();
        next.chapters.remove(&chapter_key(book, chapter));
        next
    }

    /// Highlighted verses for the chapter, ascending. Empty if none.
    pub fn get(&self, book: &str, chapter: u32) -> Vec<u32> {
        self.chapters
            .get(&chapter_key(book, chapter))
            .map(|verses| verses.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, book: &str, chapter: u32, verse: u32) -> bool {
        self.chapters
            .get(&chapter_key(book, chapter))
            .is_some_and(|verses| verses.contains(&verse))
    }

    pub fn has_any(&self, book: &str, chapter: u32) -> bool {
        self.chapters.contains_key(&chapter_key(book, chapter))
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Number of chapters with at least one highlight.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses the persisted form. Unsorted or duplicate entries collapse into
    /// a proper set; zeros and empty arrays are dropped.
    pub fn from_json(json: &str) -> Result<HighlightMap, serde_json::Error> {
        let mut map: HighlightMap = serde_json::from_str(json)?;
        map.chapters.retain(|_, verses| {
            verses.remove(&0);
            !verses.is_empty()
        });
        Ok(map)
    }

    /// Reads highlights from the store. Missing or corrupt data yields an
    /// empty map; corruption is logged, never returned.
    pub fn load(store: &dyn KeyValueStore) -> HighlightMap {
        let Some(json) = store.get(KEY_HIGHLIGHTS) else {
            return HighlightMap::new();
        };
        match HighlightMap::from_json(&json) {
            Ok(map) => map,
            Err(e) => {
                warn!("Failed to parse stored highlights, starting empty: {}", e);
                HighlightMap::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    fn assert_invariants(map: &HighlightMap) {
        for (key, verses) in &map.chapters {
            assert!(!verses.is_empty(), "empty set stored under {key}");
            let v: Vec<_> = verses.iter().copied().collect();
            assert!(v.windows(2).all(|w| w[0] < w[1]), "not ascending under {key}");
            assert!(!verses.contains(&0));
        }
    }

    #[test]
    fn test_toggle_inserts_sorted() {
        let map = HighlightMap::new()
            .toggle("Gênesis", 1, 5)
            .toggle("Gênesis", 1, 2)
            .toggle("Gênesis", 1, 9);
        assert_eq!(map.get("Gênesis", 1), vec![2, 5, 9]);
        assert_invariants(&map);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let base = HighlightMap::new()
            .toggle("Salmos", 23, 1)
            .toggle("Salmos", 23, 4)
            .toggle("João", 3, 16);

        for (book, chapter, verse) in [("Salmos", 23, 4), ("Salmos", 23, 6), ("Rute", 1, 16)] {
            let twice = base.toggle(book, chapter, verse).toggle(book, chapter, verse);
            assert_eq!(twice, base);
        }
    }

    #[test]
    fn test_toggle_does_not_mutate_previous_value() {
        let before = HighlightMap::new().toggle("Atos", 2, 1);
        let after = before.toggle("Atos", 2, 2);
        assert_eq!(before.get("Atos", 2), vec![1]);
        assert_eq!(after.get("Atos", 2), vec![1, 2]);
        assert_ne!(before, after);
    }

    #[test]
    fn test_last_untoggle_removes_key() {
        let map = HighlightMap::new().toggle("Judas", 1, 3).toggle("Judas", 1, 3);
        assert!(!map.has_any("Judas", 1));
        assert!(map.is_empty());
        assert_eq!(map.to_json().unwrap(), "{}");
    }

    #[test]
    fn test_toggle_verse_zero_is_ignored() {
        let map = HighlightMap::new().toggle("Rute", 1, 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_clear_only_touches_one_chapter() {
        let map = HighlightMap::new()
            .toggle("Marcos", 1, 1)
            .toggle("Marcos", 2, 1)
            .clear("Marcos", 1);
        assert!(!map.has_any("Marcos", 1));
        assert_eq!(map.get("Marcos", 2), vec![1]);
        // Clearing an absent key is a no-op
        assert_eq!(map.clear("Lucas", 9), map);
    }

    #[test]
    fn test_get_absent_is_empty() {
        assert!(HighlightMap::new().get("Tito", 2).is_empty());
    }

    #[test]
    fn test_contains() {
        let map = HighlightMap::new().toggle("Tiago", 1, 5);
        assert!(map.contains("Tiago", 1, 5));
        assert!(!map.contains("Tiago", 1, 6));
        assert!(!map.contains("Tiago", 2, 5));
    }

    #[test]
    fn test_json_layout() {
        let map = HighlightMap::new()
            .toggle("Gênesis", 1, 3)
            .toggle("Gênesis", 1, 1);
        assert_eq!(map.to_json().unwrap(), r#"{"Gênesis-1":[1,3]}"#);
    }

    #[test]
    fn test_from_json_normalizes() {
        let map = HighlightMap::from_json(r#"{"Rute-1":[4,2,2,0],"Rute-2":[],"Rute-3":[0]}"#)
            .unwrap();
        assert_eq!(map.get("Rute", 1), vec![2, 4]);
        assert_eq!(map.chapter_count(), 1);
        assert_invariants(&map);
    }

    #[test]
    fn test_load_corrupt_falls_back_to_empty() {
        let store = MemoryStore::with_entries([(KEY_HIGHLIGHTS, "{\"Rute-1\": [1,")]);
        assert!(HighlightMap::load(&store).is_empty());

        let store = MemoryStore::with_entries([(KEY_HIGHLIGHTS, r#"{"Rute-1":[-1]}"#)]);
        assert!(HighlightMap::load(&store).is_empty());
    }

    #[test]
    fn test_load_round_trips_through_store() {
        let map = HighlightMap::new().toggle("Efésios", 2, 8).toggle("Efésios", 2, 9);
        let store = MemoryStore::with_entries([(KEY_HIGHLIGHTS, map.to_json().unwrap())]);
        assert_eq!(HighlightMap::load(&store), map);
    }
}
