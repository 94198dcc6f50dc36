use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Sentinel for a musical key the user has not entered yet.
pub const UNKNOWN_KEY: &str = "Unknown";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("song name cannot be empty")]
    EmptyName,
    #[error("a song named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("cannot link a song to itself")]
    SelfLink,
    #[error("no song with id {0}")]
    UnknownSong(String),
    #[error("songs are already linked")]
    AlreadyLinked,
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// A song in the catalog. A `tempo` of 0 and a `key` of "Unknown" mean the
/// value has not been entered yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub tempo: u32,
    pub key: String,
}

/// The directed transition edges out of one source song. At most one record
/// exists per source; targets are distinct and kept in link order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_song_id: String,
    pub to_song_ids: Vec<String>,
}

/// Counters for the `stats` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub songs: usize,
    pub linked_sources: usize,
    pub transitions: usize,
}

/// The owning store for songs and transition edges.
///
/// Songs live here exactly once, in insertion order. Everything else —
/// transition targets, set lists — refers to them by id and resolves through
/// the catalog at read time, so deleting a song cannot leave an aliased
/// reference behind.
#[derive(Debug, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    transitions: Vec<Transition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a catalog from persisted records.
    pub fn from_parts(songs: Vec<Song>, transitions: Vec<Transition>) -> Self {
        Self { songs, transitions }
    }

    /// Songs in insertion order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Edge records, one per source song that has outgoing links.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Add a song with a fresh id. The name is trimmed and must be non-empty
    /// and unique in the catalog, ignoring case.
    pub fn add_song(&mut self, name: &str, tempo: u32, key: &str) -> Result<&Song> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.find_song_by_name(name).is_some() {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }

        let song = Song {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            tempo,
            key: key.to_string(),
        };
        log::debug!("Added song \"{}\" ({})", song.name, song.id);
        self.songs.push(song);
        Ok(&self.songs[self.songs.len() - 1])
    }

    /// Case-insensitive exact name lookup.
    pub fn find_song_by_name(&self, name: &str) -> Option<&Song> {
        let needle = name.to_lowercase();
        self.songs.iter().find(|s| s.name.to_lowercase() == needle)
    }

    /// Id lookup.
    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    /// Case-insensitive substring search. An empty or blank term matches
    /// every song.
    pub fn search(&self, term: &str) -> Vec<&Song> {
        let needle = term.trim().to_lowercase();
        self.songs
            .iter()
            .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Link a transition from one song to another. The edge record for the
    /// source is created lazily on first link.
    pub fn link(&mut self, from_id: &str, to_id: &str) -> Result<()> {
        if from_id == to_id {
            return Err(CatalogError::SelfLink);
        }
        if self.song(from_id).is_none() {
            return Err(CatalogError::UnknownSong(from_id.to_string()));
        }
        if self.song(to_id).is_none() {
            return Err(CatalogError::UnknownSong(to_id.to_string()));
        }

        let idx = match self
            .transitions
            .iter()
            .position(|t| t.from_song_id == from_id)
        {
            Some(i) => i,
            None => {
                self.transitions.push(Transition {
                    from_song_id: from_id.to_string(),
                    to_song_ids: Vec::new(),
                });
                self.transitions.len() - 1
            }
        };

        let record = &mut self.transitions[idx];
        if record.to_song_ids.iter().any(|t| t == to_id) {
            return Err(CatalogError::AlreadyLinked);
        }
        record.to_song_ids.push(to_id.to_string());
        Ok(())
    }

    /// Resolved transition targets for a song, in link order. Empty if the
    /// song has no outgoing links (or does not exist).
    pub fn transitions_from(&self, id: &str) -> Vec<&Song> {
        self.transitions
            .iter()
            .find(|t| t.from_song_id == id)
            .map(|t| t.to_song_ids.iter().filter_map(|tid| self.song(tid)).collect())
            .unwrap_or_default()
    }

    /// Remove songs by id, cascading to the transition graph: the removed
    /// songs' own edge records are dropped, the removed ids disappear from
    /// every other record's target list, and records left with no targets
    /// are dropped too. Unknown ids are ignored. Returns the number of songs
    /// actually removed.
    pub fn remove_songs(&mut self, ids: &[String]) -> usize {
        let before = self.songs.len();
        self.songs.retain(|s| !ids.contains(&s.id));
        let removed = before - self.songs.len();

        if removed > 0 {
            self.transitions.retain(|t| !ids.contains(&t.from_song_id));
            for t in &mut self.transitions {
                t.to_song_ids.retain(|tid| !ids.contains(tid));
            }
            self.transitions.retain(|t| !t.to_song_ids.is_empty());
            log::debug!("Removed {removed} song(s) and cascaded transitions");
        }
        removed
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            songs: self.songs.len(),
            linked_sources: self.transitions.len(),
            transitions: self.transitions.iter().map(|t| t.to_song_ids.len()).sum(),
        }
    }
}
