// In-memory FactStore backed by a facts document (JSON or TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::FactStore;
use crate::domain::{
    Attendance, CapabilityEdge, Gig, GigId, GigInstrument, Member, Override, SetlistEntry, Song,
    SongId, SongPart, StoreError,
};

/// Per-gig facts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GigFacts {
    pub id: GigId,
    pub name: String,
    pub attendance: Vec<Attendance>,
    pub inventory: Vec<GigInstrument>,
    pub overrides: Vec<Override>,
    pub setlist: Vec<SetlistEntry>,
}

/// Everything a band keeps about itself, in one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsDocument {
    pub members: Vec<Member>,
    pub songs: Vec<Song>,
    pub parts: Vec<SongPart>,
    pub capabilities: Vec<CapabilityEdge>,
    pub gigs: Vec<GigFacts>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFactStore {
    document: FactsDocument,
}

impl InMemoryFactStore {
    pub fn from_document(document: FactsDocument) -> Self {
        Self { document }
    }

    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json)
            .map(Self::from_document)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, StoreError> {
        toml::from_str(text)
            .map(Self::from_document)
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Load a facts file; `.toml` is parsed as TOML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let store = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text)?,
            _ => Self::from_json_str(&text)?,
        };

        tracing::debug!(
            path = %path.display(),
            members = store.document.members.len(),
            songs = store.document.songs.len(),
            gigs = store.document.gigs.len(),
            "Loaded facts file"
        );
        Ok(store)
    }

    pub fn document(&self) -> &FactsDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut FactsDocument {
        &mut self.document
    }

    fn gig_facts(&self, gig: GigId) -> Option<&GigFacts> {
        self.document.gigs.iter().find(|g| g.id == gig)
    }

    fn with_gig<T>(&self, gig: GigId, f: impl FnOnce(&GigFacts) -> Vec<T>) -> Vec<T> {
        self.gig_facts(gig).map(f).unwrap_or_default()
    }
}

impl FactStore for InMemoryFactStore {
    fn gig(&self, gig: GigId) -> Result<Option<Gig>, StoreError> {
        Ok(self.gig_facts(gig).map(|g| Gig {
            id: g.id,
            name: g.name.clone(),
        }))
    }

    fn attendance(&self, gig: GigId) -> Result<Vec<Attendance>, StoreError> {
        Ok(self.with_gig(gig, |g| g.attendance.clone()))
    }

    fn capability_edges(&self) -> Result<Vec<CapabilityEdge>, StoreError> {
        Ok(self.document.capabilities.clone())
    }

    fn inventory(&self, gig: GigId) -> Result<Vec<GigInstrument>, StoreError> {
        Ok(self.with_gig(gig, |g| g.inventory.clone()))
    }

    fn overrides(&self, gig: GigId) -> Result<Vec<Override>, StoreError> {
        Ok(self.with_gig(gig, |g| g.overrides.clone()))
    }

    fn songs_in_rotation(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self
            .document
            .songs
            .iter()
            .filter(|s| s.in_rotation)
            .cloned()
            .collect())
    }

    fn song(&self, song: SongId) -> Result<Option<Song>, StoreError> {
        Ok(self.document.songs.iter().find(|s| s.id == song).cloned())
    }

    fn song_parts(&self, song: SongId) -> Result<Vec<SongPart>, StoreError> {
        let mut parts: Vec<SongPart> = self
            .document
            .parts
            .iter()
            .filter(|p| p.song == song)
            .cloned()
            .collect();
        parts.sort_by_key(|p| (p.order, p.id));
        Ok(parts)
    }

    fn members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.document.members.clone())
    }

    fn setlist(&self, gig: GigId) -> Result<Vec<SetlistEntry>, StoreError> {
        Ok(self.with_gig(gig, |g| g.setlist.clone()))
    }
}
