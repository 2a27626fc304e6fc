// Run-wide interaction accumulator.
//
// One entry per ordered (source, target) handle pair, holding every
// qualifying reply text from source to target across all seed queries and
// expansion users. Insertion order is preserved both for the texts within
// an entry and for the entries themselves, so iteration and expansion
// candidate selection are deterministic run-to-run.

use std::collections::HashMap;

/// Ordered (source, target) handle pair. Direction matters: the source
/// replied to the target. No reverse edge is implied.
pub type EdgeKey = (String, String);

/// Mapping from interaction key to the list of reply texts, covering the
/// entire run. Grows monotonically; never rekeyed.
#[derive(Debug, Default)]
pub struct InteractionMap {
    edges: HashMap<EdgeKey, Vec<String>>,
    /// Keys in first-seen order, for deterministic iteration.
    order: Vec<EdgeKey>,
}

impl InteractionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reply text to the (source, target) entry, creating the
    /// entry on first sight.
    pub fn record(&mut self, source: &str, target: &str, text: &str) {
        let key = (source.to_string(), target.to_string());
        let entry = self.edges.entry(key.clone()).or_insert_with(|| {
            self.order.push(key);
            Vec::new()
        });
        entry.push(text.to_string());
    }

    /// Number of distinct (source, target) pairs.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Texts recorded from `source` to `target`, if any.
    pub fn get(&self, source: &str, target: &str) -> Option<&[String]> {
        self.edges
            .get(&(source.to_string(), target.to_string()))
            .map(|v| v.as_slice())
    }

    /// Iterate entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &[String])> {
        self.order
            .iter()
            .filter_map(|key| self.edges.get(key).map(|texts| (key, texts.as_slice())))
    }

    /// Distinct source handles in the order they were first seen.
    ///
    /// This is the expansion candidate order for Phase 2 — discovery
    /// sequence, not hash order, so truncating to a cap is deterministic.
    pub fn source_handles(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut sources = Vec::new();
        for (source, _) in &self.order {
            if seen.insert(source.as_str()) {
                sources.push(source.clone());
            }
        }
        sources
    }
}
