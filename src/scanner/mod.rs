pub mod filename;

use crate::AUDIO_EXTENSIONS;
use crate::catalog::{Catalog, UNKNOWN_KEY};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Prefix of AppleDouble resource-fork files ("._foo.mp3"); never imported.
const HIDDEN_PREFIX: &str = "._";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot list {path}: {message}")]
    List { path: PathBuf, message: String },
    #[error("no .mp3 or .wav files found in {0}")]
    NoAudioFiles(PathBuf),
}

/// Counters from one import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub eligible: usize,
    pub added: usize,
    pub skipped: usize,
}

/// Whether a path is worth importing: an audio extension we know, and not a
/// hidden resource-fork file.
fn is_eligible(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with(HIDDEN_PREFIX) {
        return false;
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    AUDIO_EXTENSIONS.contains(&ext.as_str())
}

/// Flat (non-recursive) listing of a folder's eligible audio files, sorted
/// by file name for deterministic processing order.
pub fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| ScanError::List {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_eligible(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Import candidate audio files into the catalog. Each file stem is cleaned
/// into a song name; duplicates of existing songs (and names that clean down
/// to nothing) are skipped, not errors. Tempo and key start at their unset
/// sentinels.
pub fn import_paths(catalog: &mut Catalog, paths: &[PathBuf]) -> ImportOutcome {
    let mut outcome = ImportOutcome {
        eligible: paths.len(),
        ..Default::default()
    };

    for path in paths {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let name = filename::clean_song_name(stem);

        match catalog.add_song(&name, 0, UNKNOWN_KEY) {
            Ok(_) => outcome.added += 1,
            Err(e) => {
                log::debug!("Skipping {}: {e}", path.display());
                outcome.skipped += 1;
            }
        }
    }
    outcome
}

/// Import every eligible audio file from one folder. A folder with nothing
/// eligible is reported as `NoAudioFiles`.
pub fn import_folder(catalog: &mut Catalog, dir: &Path) -> Result<ImportOutcome, ScanError> {
    let files = collect_audio_files(dir)?;
    if files.is_empty() {
        return Err(ScanError::NoAudioFiles(dir.to_path_buf()));
    }
    Ok(import_paths(catalog, &files))
}
