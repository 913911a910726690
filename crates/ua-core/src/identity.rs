//! Dense indices for identifiers discovered while scanning.
//!
//! Users and objects are referred to by a stable `usize` assigned in
//! first-seen order, so per-user counters can live in plain vectors.

use std::collections::HashMap;

/// Identifier to dense-index table with an occurrence count per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdTable {
    ids: Vec<String>,
    counts: Vec<u64>,
    index: HashMap<String, usize>,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` if absent, then increments its count. Returns its index.
    pub fn record(&mut self, id: &str) -> usize {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                let idx = self.ids.len();
                self.ids.push(id.to_string());
                self.counts.push(0);
                self.index.insert(id.to_string(), idx);
                idx
            }
        };
        self.counts[idx] += 1;
        idx
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the identifier at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not handed out by this table.
    pub fn id(&self, idx: usize) -> &str {
        &self.ids[idx]
    }

    /// Returns the occurrence count at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not handed out by this table.
    pub fn count(&self, idx: usize) -> u64 {
        self.counts[idx]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Identifiers with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}
