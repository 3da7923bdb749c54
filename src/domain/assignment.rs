// Optimizer output: per-song assignments and the gig-level aggregate

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::band::{GigId, InstrumentId, MemberId, ReadinessTier, SongId, SongPartId};
use super::models::SolverStatistics;

/// One selected (member, part, instrument) pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub member: MemberId,
    pub instrument: InstrumentId,
    pub part: SongPartId,
    pub tier: ReadinessTier,
    /// Came from a gig override rather than the optimizer's choice
    pub from_override: bool,
}

/// Result for one successfully solved song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongAssignments {
    pub song: SongId,
    pub title: String,
    /// Sorted by part order, then member name
    pub assignments: Vec<Assignment>,
    /// Higher is better covered and uses scarcer instruments
    pub score: f64,
    /// Realised value of the minimised objective, fairness and tie-break included
    pub objective: f64,
    pub unplayed_parts: BTreeSet<SongPartId>,
    pub unassigned_eligible_members: BTreeSet<MemberId>,
    /// Instruments with units left over; fully used instruments are omitted
    pub remaining_instrument_capacity: BTreeMap<InstrumentId, u32>,
    pub statistics: SolverStatistics,
}

impl SongAssignments {
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.assignments.iter().map(|a| a.member)
    }

    pub fn is_fully_covered(&self) -> bool {
        self.unplayed_parts.is_empty()
    }
}

/// Why a song produced no result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SkipReason {
    OverrideConflict(String),
    Infeasible,
    SolverTimeout,
    SolverFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OverrideConflict(detail) => write!(f, "override conflict: {}", detail),
            SkipReason::Infeasible => write!(f, "no assignment satisfies the hard constraints"),
            SkipReason::SolverTimeout => write!(f, "solver time budget exceeded"),
            SkipReason::SolverFailed(detail) => write!(f, "solver failed: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSong {
    pub song: SongId,
    pub title: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSongCount {
    pub member: MemberId,
    pub name: String,
    pub songs: u32,
}

/// Everything one optimizer run produces for a gig
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GigAssignments {
    pub gig: GigId,
    /// Descending score, ties by ascending title
    pub songs: Vec<SongAssignments>,
    /// Solved songs on the gig's setlist, in running order
    pub setlist: Vec<SongId>,
    /// Solved songs not on the setlist, in `songs` order
    pub recommendations: Vec<SongId>,
    pub skipped: Vec<SkippedSong>,
    pub member_song_counts: BTreeMap<MemberId, u32>,
    /// Descending count, ties by name
    pub ranked_members: Vec<MemberSongCount>,
}

impl GigAssignments {
    pub fn song(&self, id: SongId) -> Option<&SongAssignments> {
        self.songs.iter().find(|s| s.song == id)
    }

    pub fn setlist_songs(&self) -> Vec<&SongAssignments> {
        self.setlist.iter().filter_map(|&id| self.song(id)).collect()
    }
}
