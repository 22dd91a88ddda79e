use std::collections::HashMap;

use crate::zobrist::Fingerprint;

/// Fingerprints of every position reached in the game, oldest first,
/// with occurrence counts for repetition checks.
#[derive(Clone, Debug)]
pub(crate) struct PositionHistory {
    fingerprints: Vec<Fingerprint>,
    counts: HashMap<Fingerprint, u32>,
}

impl PositionHistory {
    pub(crate) fn starting_at(start: Fingerprint) -> Self {
        let mut history = PositionHistory {
            fingerprints: Vec::with_capacity(128),
            counts: HashMap::new(),
        };
        history.push(start);
        history
    }

    pub(crate) fn push(&mut self, fingerprint: Fingerprint) -> u32 {
        self.fingerprints.push(fingerprint);
        let count = self.counts.entry(fingerprint).or_insert(0);
        *count += 1;
        *count
    }

    pub(crate) fn count(&self, fingerprint: Fingerprint) -> u32 {
        self.counts.get(&fingerprint).copied().unwrap_or(0)
    }

    pub(crate) fn current(&self) -> Fingerprint {
        *self
            .fingerprints
            .last()
            .expect("history always holds the starting position")
    }

    pub(crate) fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub(crate) fn as_slice(&self) -> &[Fingerprint] {
        &self.fingerprints
    }
}
