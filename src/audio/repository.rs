//! In-memory registry of imported audio files.
//!
//! The registry preserves the order files were supplied in; batch imports
//! collect per-file failures and never abort sibling imports.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::audio::decode::{self, Codec};
use crate::audio::entry::AudioEntry;
use crate::error::{Result, SoundbankError};

/// A single failed import within a batch.
#[derive(Debug)]
pub struct ImportFailure {
    pub path: PathBuf,
    pub error: SoundbankError,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// File names added to the registry, in supply order.
    pub added: Vec<String>,
    /// Per-file failures, in supply order.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of imported audio entries, keyed by file name.
#[derive(Debug, Default)]
pub struct AudioRepository {
    entries: Vec<AudioEntry>,
}

impl AudioRepository {
    pub fn new() -> Self {
        AudioRepository::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current entries in import order.
    pub fn entries(&self) -> &[AudioEntry] {
        &self.entries
    }

    /// Look up an entry by file name.
    pub fn get(&self, file_name: &str) -> Option<&AudioEntry> {
        self.entries.iter().find(|e| e.file_name == file_name)
    }

    /// Mutable lookup, for editing volume/loop fields.
    pub fn get_mut(&mut self, file_name: &str) -> Option<&mut AudioEntry> {
        self.entries.iter_mut().find(|e| e.file_name == file_name)
    }

    /// Mutable iteration over all entries, in import order.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut AudioEntry> {
        self.entries.iter_mut()
    }

    /// Import a single file.
    ///
    /// The extension gate runs before any decoding: non-`.wav`/`.mp3` paths
    /// fail with `UnsupportedFormat` without touching the file. Importing a
    /// file whose name is already registered replaces that entry in place,
    /// preserving its position.
    pub fn add_file(&mut self, path: &Path) -> Result<&AudioEntry> {
        if Codec::from_path(path).is_none() {
            return Err(SoundbankError::UnsupportedFormat {
                extension: decode::display_extension(path),
            });
        }

        let decoded = decode::decode_audio(path)?;
        let entry = AudioEntry::from_decoded(path, &decoded)?;

        match self.entries.iter().position(|e| e.file_name == entry.file_name) {
            Some(pos) => {
                warn!("replacing already imported file: {}", entry.file_name);
                self.entries[pos] = entry;
                Ok(&self.entries[pos])
            }
            None => {
                debug!("imported {} ({} frames)", entry.file_name, entry.frame_count);
                self.entries.push(entry);
                Ok(&self.entries[self.entries.len() - 1])
            }
        }
    }

    /// Import a batch of files.
    ///
    /// Failures are collected per file; a bad file never aborts the rest of
    /// the batch. The resulting registry order matches the supply order.
    pub fn add_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> ImportReport {
        let mut report = ImportReport::default();

        for path in paths {
            let path = path.as_ref();
            match self.add_file(path) {
                Ok(entry) => report.added.push(entry.file_name.clone()),
                Err(error) => {
                    warn!("skipping {}: {}", path.display(), error);
                    report.failures.push(ImportFailure {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Remove an entry by file name. Removing an absent name is a no-op.
    pub fn remove_file(&mut self, file_name: &str) -> bool {
        match self.entries.iter().position(|e| e.file_name == file_name) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => {
                debug!("remove_file: {} not in registry", file_name);
                false
            }
        }
    }

    /// Empty the registry. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
