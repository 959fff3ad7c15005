//! Project settings persistence.
//!
//! Settings are a human-editable JSON document with PascalCase keys, the
//! shape the legacy tool's project files used, so existing documents keep
//! loading. Restoring settings re-imports each referenced file and overlays
//! the saved per-file fields onto the fresh entries, matched by file name.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::audio::entry::AudioEntry;
use crate::audio::repository::AudioRepository;
use crate::error::{Result, SoundbankError};

/// Settings document schema version.
pub const SETTINGS_SCHEMA_VERSION: &str = "1.0";

pub const DEFAULT_SOUND_SET_NAME: &str = "special_soundset";
pub const DEFAULT_BANK_NAME: &str = "custom_sounds";
pub const DEFAULT_DATA_FILE_NAME: &str = "audioexample_sounds";
pub const DEFAULT_OUTPUT_AUDIO_NAME: &str = "Renewed-Audio";

/// Persisted project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BuildSettings {
    pub schema_version: String,
    pub sound_set_name: String,
    pub audio_bank_name: String,
    pub audio_data_file_name: String,
    pub output_path: PathBuf,
    pub output_audio_name: String,
    /// Per-file settings, in registry order.
    pub audio_files: Vec<FileSettings>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            schema_version: SETTINGS_SCHEMA_VERSION.to_string(),
            sound_set_name: DEFAULT_SOUND_SET_NAME.to_string(),
            audio_bank_name: DEFAULT_BANK_NAME.to_string(),
            audio_data_file_name: DEFAULT_DATA_FILE_NAME.to_string(),
            output_path: PathBuf::new(),
            output_audio_name: DEFAULT_OUTPUT_AUDIO_NAME.to_string(),
            audio_files: Vec::new(),
        }
    }
}

/// The mutable fields of one registry entry, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileSettings {
    pub file_path: PathBuf,
    pub file_name: String,
    pub file_extension: String,
    pub volume: f32,
    pub headroom: f32,
    pub play_begin: u32,
    pub play_end: u32,
    pub loop_begin: u32,
    pub loop_end: u32,
    /// Absent in older documents; resumes at `loop_begin` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loop_point: Option<u32>,
    pub peak: f32,
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            file_path: PathBuf::new(),
            file_name: String::new(),
            file_extension: String::new(),
            volume: 1.0,
            headroom: 0.0,
            play_begin: 0,
            play_end: 0,
            loop_begin: 0,
            loop_end: 0,
            loop_point: None,
            peak: 0.0,
        }
    }
}

impl From<&AudioEntry> for FileSettings {
    fn from(entry: &AudioEntry) -> Self {
        FileSettings {
            file_path: entry.file_path.clone(),
            file_name: entry.file_name.clone(),
            file_extension: entry.file_extension.clone(),
            volume: entry.volume,
            headroom: entry.headroom,
            play_begin: entry.play_begin,
            play_end: entry.play_end,
            loop_begin: entry.loop_begin,
            loop_end: entry.loop_end,
            loop_point: Some(entry.loop_point),
            peak: entry.peak,
        }
    }
}

impl BuildSettings {
    /// Replace the per-file list with the registry's current entries.
    pub fn capture(&mut self, repo: &AudioRepository) {
        self.audio_files = repo.entries().iter().map(FileSettings::from).collect();
    }
}

/// Outcome of restoring settings into a repository.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of files re-imported successfully.
    pub loaded: usize,
    /// Files that could not be restored: `MissingFile` for paths that no
    /// longer exist, `DecodeError` for files that failed to re-import.
    /// Warnings only, never fatal.
    pub skipped: Vec<SoundbankError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ============================================================================
// Serialization round trip
// ============================================================================

/// Serialize settings to pretty JSON bytes.
pub fn save_settings(settings: &BuildSettings) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(settings).map_err(|source| SoundbankError::FormatError { source })
}

/// Parse settings from JSON bytes. Malformed documents fail with
/// `FormatError`; the caller maps that into a user-facing message.
pub fn load_settings(bytes: &[u8]) -> Result<BuildSettings> {
    serde_json::from_slice(bytes).map_err(|source| SoundbankError::FormatError { source })
}

/// Write settings to a file.
pub fn save_settings_file(path: &Path, settings: &BuildSettings) -> Result<()> {
    let bytes = save_settings(settings)?;
    fs::write(path, bytes).map_err(|e| SoundbankError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!("settings saved: {}", path.display());
    Ok(())
}

/// Read settings from a file.
pub fn load_settings_file(path: &Path) -> Result<BuildSettings> {
    let bytes = fs::read(path).map_err(|e| SoundbankError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_settings(&bytes)
}

// ============================================================================
// Restore
// ============================================================================

/// Rebuild the registry from saved settings.
///
/// Clears the registry, re-imports every referenced file in document order,
/// then overlays the saved mutable fields onto the fresh entries matched by
/// file name. Files that are gone or fail to decode are collected in the
/// report; they never abort the restore. Saved settings whose file did not
/// come back are dropped.
pub fn restore(settings: &BuildSettings, repo: &mut AudioRepository) -> LoadReport {
    repo.clear();
    let mut report = LoadReport::default();

    for saved in &settings.audio_files {
        if !saved.file_path.exists() {
            warn!(
                "settings reference a missing file: {} ({})",
                saved.file_name,
                saved.file_path.display()
            );
            report.skipped.push(SoundbankError::MissingFile {
                name: saved.file_name.clone(),
                path: saved.file_path.clone(),
            });
            continue;
        }
        match repo.add_file(&saved.file_path) {
            Ok(_) => report.loaded += 1,
            Err(error) => {
                warn!("cannot restore {}: {}", saved.file_name, error);
                report.skipped.push(error);
            }
        }
    }

    for entry in repo.entries_mut() {
        let Some(saved) = settings
            .audio_files
            .iter()
            .find(|s| s.file_name == entry.file_name)
        else {
            continue;
        };
        entry.volume = saved.volume;
        entry.headroom = saved.headroom;
        entry.peak = saved.peak;
        if entry.set_play_range(saved.play_begin, saved.play_end).is_err() {
            warn!(
                "{}: saved play range {}..{} is invalid, keeping decoded bounds",
                entry.file_name, saved.play_begin, saved.play_end
            );
        }
        if entry
            .set_loop(saved.loop_begin, saved.loop_end, saved.loop_point)
            .is_err()
        {
            warn!(
                "{}: saved loop range {}..{} is invalid, keeping decoded bounds",
                entry.file_name, saved.loop_begin, saved.loop_end
            );
        }
    }

    info!(
        "settings restored: {} loaded, {} skipped",
        report.loaded,
        report.skipped.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::audio::testutil::write_pcm16_wav;

    fn settings_with_files(files: Vec<FileSettings>) -> BuildSettings {
        BuildSettings {
            audio_files: files,
            ..BuildSettings::default()
        }
    }

    #[test]
    fn test_save_load_round_trip_is_field_identical() {
        let settings = BuildSettings {
            schema_version: SETTINGS_SCHEMA_VERSION.to_string(),
            sound_set_name: "myset".to_string(),
            audio_bank_name: "mybank".to_string(),
            audio_data_file_name: "mydata".to_string(),
            output_path: PathBuf::from("/tmp/out"),
            output_audio_name: "MyBank-Audio".to_string(),
            audio_files: vec![FileSettings {
                file_path: PathBuf::from("/sounds/a.wav"),
                file_name: "a.wav".to_string(),
                file_extension: ".wav".to_string(),
                volume: 0.75,
                headroom: -3.0,
                play_begin: 10,
                play_end: 900,
                loop_begin: 20,
                loop_end: 800,
                loop_point: Some(25),
                peak: 0.87,
            }],
        };

        let bytes = save_settings(&settings).unwrap();
        let loaded = load_settings(&bytes).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_rejects_malformed_document() {
        let err = load_settings(b"{ not json").unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");

        let err = load_settings(br#"{"AudioFiles": 42}"#).unwrap_err();
        assert_eq!(err.error_code(), "FORMAT_ERROR");
    }

    #[test]
    fn test_load_fills_defaults_for_missing_fields() {
        let loaded = load_settings(b"{}").unwrap();
        assert_eq!(loaded.sound_set_name, DEFAULT_SOUND_SET_NAME);
        assert_eq!(loaded.audio_bank_name, DEFAULT_BANK_NAME);
        assert_eq!(loaded.output_audio_name, DEFAULT_OUTPUT_AUDIO_NAME);
        assert!(loaded.audio_files.is_empty());
    }

    #[test]
    fn test_document_uses_pascal_case_keys() {
        let bytes = save_settings(&BuildSettings::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"SoundSetName\""));
        assert!(text.contains("\"AudioBankName\""));
        assert!(text.contains("\"AudioFiles\""));
    }

    #[test]
    fn test_restore_reports_exactly_the_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let here = dir.path().join("here.wav");
        let gone = dir.path().join("gone.wav");
        write_pcm16_wav(&here, 1, 44_100, &[0i16; 100]);

        let settings = settings_with_files(vec![
            FileSettings {
                file_path: here.clone(),
                file_name: "here.wav".to_string(),
                play_end: 100,
                loop_end: 100,
                ..FileSettings::default()
            },
            FileSettings {
                file_path: gone.clone(),
                file_name: "gone.wav".to_string(),
                ..FileSettings::default()
            },
        ]);

        let mut repo = AudioRepository::new();
        let report = restore(&settings, &mut repo);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].error_code(), "MISSING_FILE");
        assert_eq!(repo.len(), 1);
        assert!(repo.get("here.wav").is_some());
    }

    #[test]
    fn test_restore_overlays_saved_fields() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pad.wav");
        write_pcm16_wav(&src, 1, 44_100, &[0i16; 1000]);

        let settings = settings_with_files(vec![FileSettings {
            file_path: src.clone(),
            file_name: "pad.wav".to_string(),
            file_extension: ".wav".to_string(),
            volume: 0.5,
            headroom: -6.0,
            play_begin: 100,
            play_end: 900,
            loop_begin: 200,
            loop_end: 800,
            loop_point: Some(300),
            peak: 0.42,
        }]);

        let mut repo = AudioRepository::new();
        let report = restore(&settings, &mut repo);
        assert!(report.is_clean());

        let entry = repo.get("pad.wav").unwrap();
        assert_eq!(entry.volume, 0.5);
        assert_eq!(entry.headroom, -6.0);
        assert_eq!(entry.play_begin, 100);
        assert_eq!(entry.play_end, 900);
        assert_eq!(entry.loop_begin, 200);
        assert_eq!(entry.loop_end, 800);
        assert_eq!(entry.loop_point, 300);
        assert_eq!(entry.peak, 0.42);
    }

    #[test]
    fn test_restore_defaults_absent_loop_point_to_loop_begin() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pad.wav");
        write_pcm16_wav(&src, 1, 44_100, &[0i16; 1000]);

        // older documents have no LoopPoint key
        let json = format!(
            r#"{{"AudioFiles": [{{"FilePath": "{}", "FileName": "pad.wav",
                 "LoopBegin": 150, "LoopEnd": 600, "PlayEnd": 1000}}]}}"#,
            src.display()
        );
        let settings = load_settings(json.as_bytes()).unwrap();
        assert_eq!(settings.audio_files[0].loop_point, None);

        let mut repo = AudioRepository::new();
        restore(&settings, &mut repo);

        assert_eq!(repo.get("pad.wav").unwrap().loop_point, 150);
    }

    #[test]
    fn test_restore_keeps_decoded_bounds_on_invalid_saved_range() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pad.wav");
        write_pcm16_wav(&src, 1, 44_100, &[0i16; 100]);

        let settings = settings_with_files(vec![FileSettings {
            file_path: src.clone(),
            file_name: "pad.wav".to_string(),
            loop_begin: 90,
            loop_end: 10,
            play_end: 100,
            ..FileSettings::default()
        }]);

        let mut repo = AudioRepository::new();
        restore(&settings, &mut repo);

        let entry = repo.get("pad.wav").unwrap();
        assert_eq!(entry.loop_begin, 0);
        assert_eq!(entry.loop_end, 100);
    }

    #[test]
    fn test_capture_mirrors_registry() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_pcm16_wav(&a, 1, 44_100, &[0i16; 10]);
        write_pcm16_wav(&b, 1, 44_100, &[0i16; 20]);

        let mut repo = AudioRepository::new();
        repo.add_file(&a).unwrap();
        repo.add_file(&b).unwrap();
        repo.get_mut("b.wav").unwrap().volume = 0.25;

        let mut settings = BuildSettings::default();
        settings.capture(&repo);

        assert_eq!(settings.audio_files.len(), 2);
        assert_eq!(settings.audio_files[0].file_name, "a.wav");
        assert_eq!(settings.audio_files[1].file_name, "b.wav");
        assert_eq!(settings.audio_files[1].volume, 0.25);
        assert_eq!(settings.audio_files[1].loop_point, Some(0));
    }
}
