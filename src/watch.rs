use crate::catalog::Catalog;
use crate::scanner::{self, ScanError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("folder is already watched: {0}")]
    AlreadyWatched(PathBuf),
}

/// Result of re-scanning every watched folder. Per-folder failures are
/// collected here; they never abort the remaining folders.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub added: usize,
    pub errors: Vec<(PathBuf, ScanError)>,
}

/// The set of folders to re-scan on demand. Paths are stored canonicalized
/// and are unique ignoring case, in the order they were added.
#[derive(Debug, Default)]
pub struct WatchList {
    folders: Vec<PathBuf>,
}

/// Path equality the way the watch list sees it: case-insensitive on the
/// full canonical string.
fn same_folder(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted paths.
    pub fn from_folders(folders: Vec<PathBuf>) -> Self {
        Self { folders }
    }

    /// Watched folders in stable (insertion) order.
    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Start watching a folder. The path must resolve to an existing
    /// directory; it is stored in canonical absolute form.
    pub fn add(&mut self, path: &Path) -> Result<&Path, WatchError> {
        let canonical = path
            .canonicalize()
            .map_err(|_| WatchError::NotADirectory(path.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(WatchError::NotADirectory(path.to_path_buf()));
        }
        if self.folders.iter().any(|f| same_folder(f, &canonical)) {
            return Err(WatchError::AlreadyWatched(canonical));
        }
        self.folders.push(canonical);
        Ok(&self.folders[self.folders.len() - 1])
    }

    /// Stop watching folders. Comparison is case-insensitive; paths that
    /// still exist on disk are canonicalized first so relative forms work.
    /// Returns the number of folders removed.
    pub fn remove(&mut self, paths: &[PathBuf]) -> usize {
        let targets: Vec<PathBuf> = paths
            .iter()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.clone()))
            .collect();
        let before = self.folders.len();
        self.folders
            .retain(|f| !targets.iter().any(|t| same_folder(f, t)));
        before - self.folders.len()
    }

    /// Re-scan every watched folder, importing new songs into the catalog.
    /// A folder that fails to list (vanished, unreadable) is recorded in the
    /// summary and the remaining folders are still scanned. The caller
    /// persists once, after the whole scan.
    pub fn scan_all(&self, catalog: &mut Catalog) -> ScanSummary {
        let mut summary = ScanSummary::default();

        let pb = ProgressBar::new(self.folders.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} folders {msg}",
            )
            .unwrap()
            .progress_chars("#>-"),
        );

        for folder in &self.folders {
            pb.set_message(folder.display().to_string());

            match scanner::collect_audio_files(folder) {
                Ok(files) => {
                    let outcome = scanner::import_paths(catalog, &files);
                    summary.added += outcome.added;
                }
                Err(e) => {
                    log::warn!("Error scanning {}: {e}", folder.display());
                    summary.errors.push((folder.clone(), e));
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message(format!("{} new songs", summary.added));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_add_rejects_missing_and_non_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        File::create(&file).unwrap();

        let mut watch = WatchList::new();
        assert!(matches!(
            watch.add(&dir.path().join("nope")),
            Err(WatchError::NotADirectory(_))
        ));
        assert!(matches!(
            watch.add(&file),
            Err(WatchError::NotADirectory(_))
        ));
        assert!(watch.is_empty());
    }

    #[test]
    fn test_add_dedups_watched_folders() {
        let dir = TempDir::new().unwrap();
        let mut watch = WatchList::new();

        watch.add(dir.path()).unwrap();
        assert!(matches!(
            watch.add(dir.path()),
            Err(WatchError::AlreadyWatched(_))
        ));
        // A differently-spelled path to the same directory canonicalizes to
        // the same entry
        assert!(matches!(
            watch.add(&dir.path().join(".")),
            Err(WatchError::AlreadyWatched(_))
        ));
        assert_eq!(watch.len(), 1);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut watch = WatchList::new();
        watch.add(dir.path()).unwrap();

        let shouty = PathBuf::from(watch.folders()[0].to_string_lossy().to_uppercase());
        assert_eq!(watch.remove(&[shouty]), 1);
        assert!(watch.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_zero() {
        let dir = TempDir::new().unwrap();
        let mut watch = WatchList::new();
        watch.add(dir.path()).unwrap();

        assert_eq!(watch.remove(&[PathBuf::from("/no/such/folder")]), 0);
        assert_eq!(watch.len(), 1);
    }

    #[test]
    fn test_scan_all_continues_past_missing_folder() {
        let keep_a = TempDir::new().unwrap();
        let gone = TempDir::new().unwrap();
        let keep_b = TempDir::new().unwrap();
        File::create(keep_a.path().join("Strobe.mp3")).unwrap();
        File::create(keep_b.path().join("Opus.wav")).unwrap();

        let mut watch = WatchList::new();
        watch.add(keep_a.path()).unwrap();
        watch.add(gone.path()).unwrap();
        watch.add(keep_b.path()).unwrap();

        // The middle folder vanishes between add and scan
        let gone_path = gone.path().to_path_buf();
        drop(gone);
        assert!(!gone_path.exists());

        let mut catalog = Catalog::new();
        let summary = watch.scan_all(&mut catalog);

        assert_eq!(summary.added, 2);
        assert_eq!(summary.errors.len(), 1);
        assert!(same_folder(&summary.errors[0].0, &watch.folders()[1]));
        assert!(catalog.find_song_by_name("Strobe").is_some());
        assert!(catalog.find_song_by_name("Opus").is_some());
    }

    #[test]
    fn test_scan_all_empty_folder_is_not_an_error() {
        let empty = TempDir::new().unwrap();
        let mut watch = WatchList::new();
        watch.add(empty.path()).unwrap();

        let mut catalog = Catalog::new();
        let summary = watch.scan_all(&mut catalog);
        assert_eq!(summary.added, 0);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_scan_all_skips_already_imported() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("Strobe.mp3")).unwrap();

        let mut watch = WatchList::new();
        watch.add(dir.path()).unwrap();

        let mut catalog = Catalog::new();
        assert_eq!(watch.scan_all(&mut catalog).added, 1);
        assert_eq!(watch.scan_all(&mut catalog).added, 0);
        assert_eq!(catalog.songs().len(), 1);
    }
}
