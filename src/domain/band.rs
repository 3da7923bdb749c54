// Band facts: the read-only inputs to one optimizer run

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a scheduled event
    GigId,
    "gig"
);
id_type!(MemberId, "member");
id_type!(SongId, "song");
id_type!(SongPartId, "part");
id_type!(InstrumentId, "instrument");

/// Confidence that a member can play a part on an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    /// Counts toward part coverage
    Ready,
    /// Selectable, but never covers a part on its own
    Backup,
    /// Never selectable
    NotReady,
}

impl ReadinessTier {
    pub fn is_selectable(self) -> bool {
        !matches!(self, ReadinessTier::NotReady)
    }

    pub fn covers_part(self) -> bool {
        matches!(self, ReadinessTier::Ready)
    }
}

/// A member's answer for one gig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Available,
    Unavailable,
    MaybeAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gig {
    pub id: GigId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    #[serde(default)]
    pub in_rotation: bool,
}

/// An ordered sub-unit of a song that needs coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPart {
    pub id: SongPartId,
    pub song: SongId,
    pub name: String,
    /// Position within the song, ascending
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub member: MemberId,
    pub status: AttendanceStatus,
}

/// Member can play `instrument` on `part` at `tier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityEdge {
    pub member: MemberId,
    pub part: SongPartId,
    pub instrument: InstrumentId,
    pub tier: ReadinessTier,
}

/// How many units of an instrument are physically at the gig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GigInstrument {
    pub instrument: InstrumentId,
    pub count: u32,
}

/// Mandatory pre-decided assignment for one gig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Override {
    pub member: MemberId,
    pub part: SongPartId,
    pub instrument: InstrumentId,
    pub tier: ReadinessTier,
}

impl Override {
    pub fn as_edge(&self) -> CapabilityEdge {
        CapabilityEdge {
            member: self.member,
            part: self.part,
            instrument: self.instrument,
            tier: self.tier,
        }
    }
}

/// One slot of a gig's running order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SetlistEntry {
    Song { song: SongId },
    Break { minutes: u32 },
}
