// Fact Snapshot Loader
//
// Pulls every fact one gig needs from a `FactStore` and materialises it
// into an immutable `FactSnapshot` before any model is built. Nothing
// downstream talks to the store again.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::domain::{
    error::Result, Attendance, AttendanceStatus, CapabilityEdge, Gig, GigId, GigInstrument,
    InstrumentId, Member, MemberId, OptimizerError, Override, SetlistEntry, Song, SongId,
    SongPart, SongPartId, StoreError,
};

/// Read-only collaborator that owns members, songs, attendance and inventory
pub trait FactStore: Send + Sync {
    fn gig(&self, gig: GigId) -> std::result::Result<Option<Gig>, StoreError>;

    fn attendance(&self, gig: GigId) -> std::result::Result<Vec<Attendance>, StoreError>;

    fn capability_edges(&self) -> std::result::Result<Vec<CapabilityEdge>, StoreError>;

    fn inventory(&self, gig: GigId) -> std::result::Result<Vec<GigInstrument>, StoreError>;

    fn overrides(&self, gig: GigId) -> std::result::Result<Vec<Override>, StoreError>;

    fn songs_in_rotation(&self) -> std::result::Result<Vec<Song>, StoreError>;

    fn song(&self, song: SongId) -> std::result::Result<Option<Song>, StoreError>;

    /// Parts of a song, in performance order
    fn song_parts(&self, song: SongId) -> std::result::Result<Vec<SongPart>, StoreError>;

    fn members(&self) -> std::result::Result<Vec<Member>, StoreError>;

    fn setlist(&self, gig: GigId) -> std::result::Result<Vec<SetlistEntry>, StoreError>;
}

/// Facts for one song under consideration
#[derive(Debug, Clone)]
pub struct SongFacts {
    pub song: Song,
    /// Ordered by part order
    pub parts: Vec<SongPart>,
    /// Eligible capability edges, sorted by (part order, member, instrument)
    pub candidates: Vec<CapabilityEdge>,
    pub overrides: Vec<Override>,
}

impl SongFacts {
    /// Size of the candidate pool; drives processing order
    pub fn pool_size(&self) -> usize {
        self.candidates.len()
    }

    /// Members with at least one way onto this song
    pub fn eligible_members(&self) -> BTreeSet<MemberId> {
        self.candidates
            .iter()
            .map(|e| e.member)
            .chain(self.overrides.iter().map(|o| o.member))
            .collect()
    }
}

/// Immutable bundle of everything one optimizer run reads
#[derive(Debug, Clone)]
pub struct FactSnapshot {
    pub gig: Gig,
    pub available_members: BTreeSet<MemberId>,
    pub member_names: BTreeMap<MemberId, String>,
    /// Every instrument listed for the gig, including zero counts
    pub inventory: BTreeMap<InstrumentId, u32>,
    /// Sorted by song id
    pub songs: Vec<SongFacts>,
    /// Songs on the running order, breaks dropped
    pub setlist: Vec<SongId>,
}

impl FactSnapshot {
    pub fn member_name(&self, member: MemberId) -> String {
        self.member_names
            .get(&member)
            .cloned()
            .unwrap_or_else(|| member.to_string())
    }

    pub fn song(&self, id: SongId) -> Option<&SongFacts> {
        self.songs.iter().find(|s| s.song.id == id)
    }
}

/// Load and filter the facts for `gig_id`.
///
/// An edge is a candidate when its member is available, its instrument is at
/// the gig, its tier is selectable, and the member has no override on that
/// song. Unresolvable gigs, songs, parts or override members fail the whole
/// load with [`OptimizerError::DataUnavailable`].
pub fn load_snapshot(store: &dyn FactStore, gig_id: GigId) -> Result<FactSnapshot> {
    let gig = store
        .gig(gig_id)?
        .ok_or_else(|| OptimizerError::DataUnavailable(format!("{} does not exist", gig_id)))?;

    let members = store.members()?;
    let member_names: BTreeMap<MemberId, String> =
        members.into_iter().map(|m| (m.id, m.name)).collect();

    let available_members: BTreeSet<MemberId> = store
        .attendance(gig_id)?
        .into_iter()
        .filter(|a| a.status == AttendanceStatus::Available)
        .map(|a| a.member)
        .collect();

    let inventory: BTreeMap<InstrumentId, u32> = store
        .inventory(gig_id)?
        .into_iter()
        .map(|gi| (gi.instrument, gi.count))
        .collect();

    let setlist: Vec<SongId> = store
        .setlist(gig_id)?
        .into_iter()
        .filter_map(|entry| match entry {
            SetlistEntry::Song { song } => Some(song),
            SetlistEntry::Break { .. } => None,
        })
        .collect();

    let mut songs: BTreeMap<SongId, Song> = store
        .songs_in_rotation()?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    for &id in &setlist {
        if !songs.contains_key(&id) {
            let song = store.song(id)?.ok_or_else(|| {
                OptimizerError::DataUnavailable(format!("setlist of {} names missing {}", gig_id, id))
            })?;
            songs.insert(id, song);
        }
    }

    let mut song_facts: Vec<SongFacts> = Vec::with_capacity(songs.len());
    let mut part_to_song: HashMap<SongPartId, (usize, u32)> = HashMap::new();
    for (idx, (id, song)) in songs.into_iter().enumerate() {
        let mut parts = store.song_parts(id)?;
        parts.sort_by_key(|p| (p.order, p.id));
        for part in &parts {
            part_to_song.insert(part.id, (idx, part.order));
        }
        song_facts.push(SongFacts {
            song,
            parts,
            candidates: Vec::new(),
            overrides: Vec::new(),
        });
    }

    let mut overridden: HashSet<(MemberId, SongId)> = HashSet::new();
    for ov in store.overrides(gig_id)? {
        let &(idx, _) = part_to_song.get(&ov.part).ok_or_else(|| {
            OptimizerError::DataUnavailable(format!(
                "override for {} names {}, which is not part of any song under consideration",
                ov.member, ov.part
            ))
        })?;
        if !member_names.contains_key(&ov.member) {
            return Err(OptimizerError::DataUnavailable(format!(
                "override names unknown {}",
                ov.member
            )));
        }
        let facts = &mut song_facts[idx];
        overridden.insert((ov.member, facts.song.id));
        facts.overrides.push(ov);
    }

    let mut dropped = 0usize;
    for edge in store.capability_edges()? {
        let Some(&(idx, _)) = part_to_song.get(&edge.part) else {
            continue;
        };
        let song_id = song_facts[idx].song.id;
        let eligible = edge.tier.is_selectable()
            && available_members.contains(&edge.member)
            && inventory.get(&edge.instrument).is_some_and(|&count| count > 0)
            && !overridden.contains(&(edge.member, song_id));
        if eligible {
            song_facts[idx].candidates.push(edge);
        } else {
            dropped += 1;
        }
    }

    for facts in &mut song_facts {
        facts.candidates.sort_by_key(|e| {
            let order = part_to_song.get(&e.part).map_or(0, |&(_, order)| order);
            (order, e.part, e.member, e.instrument)
        });
        facts.candidates.dedup();
        facts.overrides.sort_by_key(|o| (o.part, o.member, o.instrument));
    }

    tracing::debug!(
        gig = %gig_id,
        songs = song_facts.len(),
        available = available_members.len(),
        instruments = inventory.len(),
        dropped_edges = dropped,
        "Loaded fact snapshot"
    );

    Ok(FactSnapshot {
        gig,
        available_members,
        member_names,
        inventory,
        songs: song_facts,
        setlist,
    })
}
