use std::collections::BTreeMap;

use crate::domain::MemberId;

/// Songs assigned so far per member, private to one gig run
#[derive(Debug, Clone, Default)]
pub struct FairnessAccumulator {
    counts: BTreeMap<MemberId, u32>,
}

impl FairnessAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, member: MemberId) -> u32 {
        self.counts.get(&member).copied().unwrap_or(0)
    }

    /// Credit each member once for a solved song
    pub fn record(&mut self, members: impl IntoIterator<Item = MemberId>) {
        for member in members {
            *self.counts.entry(member).or_default() += 1;
        }
    }

    pub fn into_counts(self) -> BTreeMap<MemberId, u32> {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_counts() {
        let mut acc = FairnessAccumulator::new();
        assert_eq!(acc.count(MemberId(1)), 0);

        acc.record([MemberId(1), MemberId(2)]);
        acc.record([MemberId(1)]);

        assert_eq!(acc.count(MemberId(1)), 2);
        assert_eq!(acc.count(MemberId(2)), 1);
        assert_eq!(
            acc.into_counts().into_iter().collect::<Vec<_>>(),
            vec![(MemberId(1), 2), (MemberId(2), 1)]
        );
    }
}
