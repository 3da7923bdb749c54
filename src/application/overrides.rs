// Override validation: reject overrides that can never all hold at once

use std::collections::{BTreeMap, BTreeSet};

use super::snapshot::{FactSnapshot, SongFacts};
use crate::domain::{InstrumentId, MemberId, ReadinessTier};

/// Check one song's overrides against each other and the gig facts.
///
/// Returns a description of every conflict found, joined with `"; "`.
pub fn validate_song_overrides(song: &SongFacts, snapshot: &FactSnapshot) -> Result<(), String> {
    let mut errors = Vec::new();
    let mut seen_members: BTreeSet<MemberId> = BTreeSet::new();
    let mut demand: BTreeMap<InstrumentId, u32> = BTreeMap::new();

    for ov in &song.overrides {
        if ov.tier == ReadinessTier::NotReady {
            errors.push(format!(
                "{} is forced onto {} at tier not_ready",
                ov.member, ov.part
            ));
        }
        if !snapshot.available_members.contains(&ov.member) {
            errors.push(format!("{} is not available for the gig", ov.member));
        }
        if !seen_members.insert(ov.member) {
            errors.push(format!("{} has more than one override", ov.member));
        }
        *demand.entry(ov.instrument).or_default() += 1;
    }

    for (instrument, wanted) in demand {
        let available = snapshot.inventory.get(&instrument).copied().unwrap_or(0);
        if wanted > available {
            errors.push(format!(
                "overrides need {} x {} but the gig has {}",
                wanted, instrument, available
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}
