use std::collections::HashMap;

use crate::models::{Ballot, School};

/// Current-state store of accepted ballots, keyed by the voting school.
/// Each school has a single slot; recording replaces whatever the slot held,
/// so the latest accepted ballot always wins. The slot is kept as a sequence
/// so the aggregator can average over however many ballots it holds.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    ballots: HashMap<School, Vec<Ballot>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ballot: Ballot) {
        self.ballots.insert(ballot.voter.clone(), vec![ballot]);
    }

    /// Empty if the school has not voted.
    pub fn ballots_for(&self, school: &School) -> &[Ballot] {
        self.ballots.get(school).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn latest(&self, school: &School) -> Option<&Ballot> {
        self.ballots.get(school).and_then(|slot| slot.last())
    }

    /// Number of schools with an accepted ballot.
    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    /// Whole-contest reset.
    pub fn clear(&mut self) {
        self.ballots.clear();
    }

    /// Append to a slot without replacing it, to exercise multi-ballot
    /// aggregation paths.
    #[cfg(test)]
    pub(crate) fn append(&mut self, ballot: Ballot) {
        self.ballots
            .entry(ballot.voter.clone())
            .or_default()
            .push(ballot);
    }
}
