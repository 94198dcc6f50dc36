use crate::catalog::{Catalog, Song, Transition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// File-backed persistence for the catalog, watch list, and set list: four
/// JSON files under one data directory.
///
/// Loads degrade to the empty collection when a file is missing or
/// malformed — a damaged catalog file must never take the tool down — with
/// a warning in the malformed case. Saves propagate their errors.
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn songs_path(&self) -> PathBuf {
        self.data_dir.join("songs.json")
    }

    fn transitions_path(&self) -> PathBuf {
        self.data_dir.join("transitions.json")
    }

    fn watched_path(&self) -> PathBuf {
        self.data_dir.join("watched_folders.json")
    }

    fn setlist_path(&self) -> PathBuf {
        self.data_dir.join("setlist.json")
    }

    pub fn load_catalog(&self) -> Catalog {
        let songs: Vec<Song> = self.load_list(&self.songs_path());
        let transitions: Vec<Transition> = self.load_list(&self.transitions_path());
        Catalog::from_parts(songs, transitions)
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        self.save_list(&self.songs_path(), catalog.songs())?;
        self.save_list(&self.transitions_path(), catalog.transitions())
    }

    pub fn load_watched(&self) -> Vec<PathBuf> {
        self.load_list(&self.watched_path())
    }

    pub fn save_watched(&self, folders: &[PathBuf]) -> Result<()> {
        self.save_list(&self.watched_path(), folders)
    }

    pub fn load_setlist(&self) -> Vec<String> {
        self.load_list(&self.setlist_path())
    }

    pub fn save_setlist(&self, ids: &[String]) -> Result<()> {
        self.save_list(&self.setlist_path(), ids)
    }

    fn load_list<T: DeserializeOwned>(&self, path: &Path) -> Vec<T> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!(
                    "Failed to read {}: {e}. Treating as empty.",
                    path.display()
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(e) => {
                log::warn!(
                    "Malformed JSON in {}: {e}. Treating as empty.",
                    path.display()
                );
                Vec::new()
            }
        }
    }

    fn save_list<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Write a set-list export: one song name per line, no header.
pub fn write_setlist_text(path: &Path, names: &[String]) -> Result<usize> {
    let mut text = names.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(names.len())
}

/// Read a set-list text file: one name per line, blank lines ignored.
pub fn read_setlist_text(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}
