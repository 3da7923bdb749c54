#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use gigopt::domain::{
    Attendance, AttendanceStatus, CapabilityEdge, GigInstrument, InstrumentId, Member, MemberId,
    Override, ReadinessTier, SetlistEntry, Song, SongId, SongPart, SongPartId,
};
use gigopt::infrastructure::GigFacts;
use gigopt::{
    FactsDocument, GigAssignments, GigId, GigOptimizer, InMemoryFactStore, MicroLpSolver,
    OptimizerConfig,
};

pub const GIG: GigId = GigId(1);

pub use ReadinessTier::{Backup, NotReady, Ready};

/// Builds a facts document for a single gig
pub struct Band {
    doc: FactsDocument,
}

impl Band {
    pub fn new() -> Self {
        Self {
            doc: FactsDocument {
                gigs: vec![GigFacts {
                    id: GIG,
                    name: "Test Gig".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
        }
    }

    fn gig(&mut self) -> &mut GigFacts {
        &mut self.doc.gigs[0]
    }

    fn add_member(mut self, id: u32, name: &str, status: AttendanceStatus) -> Self {
        self.doc.members.push(Member {
            id: MemberId(id),
            name: name.into(),
        });
        self.gig().attendance.push(Attendance {
            member: MemberId(id),
            status,
        });
        self
    }

    pub fn member(self, id: u32, name: &str) -> Self {
        self.add_member(id, name, AttendanceStatus::Available)
    }

    pub fn absent_member(self, id: u32, name: &str) -> Self {
        self.add_member(id, name, AttendanceStatus::Unavailable)
    }

    /// Song in rotation; part ids are given in performance order
    pub fn song(mut self, id: u32, title: &str, parts: &[u32]) -> Self {
        self.doc.songs.push(Song {
            id: SongId(id),
            title: title.into(),
            in_rotation: true,
        });
        for (order, &part) in parts.iter().enumerate() {
            self.doc.parts.push(SongPart {
                id: SongPartId(part),
                song: SongId(id),
                name: format!("part {}", part),
                order: order as u32,
            });
        }
        self
    }

    pub fn instrument(mut self, id: u32, count: u32) -> Self {
        self.gig().inventory.push(GigInstrument {
            instrument: InstrumentId(id),
            count,
        });
        self
    }

    pub fn can_play(mut self, member: u32, part: u32, instrument: u32, tier: ReadinessTier) -> Self {
        self.doc.capabilities.push(CapabilityEdge {
            member: MemberId(member),
            part: SongPartId(part),
            instrument: InstrumentId(instrument),
            tier,
        });
        self
    }

    pub fn force(mut self, member: u32, part: u32, instrument: u32, tier: ReadinessTier) -> Self {
        self.gig().overrides.push(Override {
            member: MemberId(member),
            part: SongPartId(part),
            instrument: InstrumentId(instrument),
            tier,
        });
        self
    }

    pub fn setlist(mut self, entries: Vec<SetlistEntry>) -> Self {
        self.gig().setlist = entries;
        self
    }

    pub fn build(self) -> InMemoryFactStore {
        InMemoryFactStore::from_document(self.doc)
    }
}

pub fn optimizer(config: OptimizerConfig) -> GigOptimizer {
    GigOptimizer::new(Arc::new(MicroLpSolver::new()), config)
}

pub fn run(store: &InMemoryFactStore) -> GigAssignments {
    optimizer(OptimizerConfig::default())
        .optimize(store, GIG)
        .expect("optimizer run")
}

/// Exclusivity and capacity hold for every solved song
pub fn assert_hard_constraints(result: &GigAssignments, store: &InMemoryFactStore) {
    let inventory: BTreeMap<InstrumentId, u32> = store.document().gigs[0]
        .inventory
        .iter()
        .map(|gi| (gi.instrument, gi.count))
        .collect();

    for song in &result.songs {
        let mut members = BTreeSet::new();
        let mut used: BTreeMap<InstrumentId, u32> = BTreeMap::new();
        for a in &song.assignments {
            assert!(
                members.insert(a.member),
                "{} assigned twice on '{}'",
                a.member,
                song.title
            );
            *used.entry(a.instrument).or_default() += 1;
        }
        for (instrument, count) in used {
            let available = inventory.get(&instrument).copied().unwrap_or(0);
            assert!(
                count <= available,
                "'{}' uses {} x {} but only {} at the gig",
                song.title,
                count,
                instrument,
                available
            );
        }
    }
}
