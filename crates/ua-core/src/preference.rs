//! Per-user object touch counts.
//!
//! Unlike hourly and type counters, these are kept for every user,
//! inactive ones included.

use std::collections::BTreeMap;

/// Object index to touch count, per user index.
#[derive(Debug, Clone, Default)]
pub struct ObjectPreferenceTracker {
    per_user: Vec<Option<BTreeMap<usize, u64>>>,
}

impl ObjectPreferenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one touch of `object_idx` by `user_idx`.
    pub fn record(&mut self, user_idx: usize, object_idx: usize) {
        if self.per_user.len() <= user_idx {
            self.per_user.resize_with(user_idx + 1, || None);
        }
        *self.per_user[user_idx]
            .get_or_insert_with(BTreeMap::new)
            .entry(object_idx)
            .or_insert(0) += 1;
    }

    /// Objects touched by the user, ordered by object index.
    pub fn touches(&self, user_idx: usize) -> Option<&BTreeMap<usize, u64>> {
        self.per_user.get(user_idx).and_then(Option::as_ref)
    }

    /// Users with at least one touch, by user index.
    pub fn users(&self) -> impl Iterator<Item = (usize, &BTreeMap<usize, u64>)> {
        self.per_user
            .iter()
            .enumerate()
            .filter_map(|(idx, touches)| touches.as_ref().map(|t| (idx, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_touches_per_object() {
        let mut tracker = ObjectPreferenceTracker::new();
        tracker.record(0, 7);
        tracker.record(0, 2);
        tracker.record(0, 7);
        tracker.record(2, 7);

        let touches = tracker.touches(0).unwrap();
        assert_eq!(touches.get(&7), Some(&2));
        assert_eq!(touches.get(&2), Some(&1));
        assert_eq!(touches.keys().copied().collect::<Vec<_>>(), [2, 7]);

        assert!(tracker.touches(1).is_none());
        assert!(tracker.touches(99).is_none());
        assert_eq!(tracker.users().map(|(idx, _)| idx).collect::<Vec<_>>(), [0, 2]);
    }
}
