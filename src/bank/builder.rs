//! Bank build operation.
//!
//! Packs the registry's entries into a bank binary plus a JSON description
//! file. The build is atomic from the caller's perspective: both artifacts
//! are written to `.tmp` siblings and renamed into place only after every
//! write succeeded, and any per-entry failure aborts the whole build with a
//! single aggregated error.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::audio::entry::AudioEntry;
use crate::bank::format::{self, BankRecord};
use crate::error::{Result, SoundbankError};

/// Naming and output parameters for one build.
#[derive(Debug, Clone)]
pub struct BuildParams {
    pub sound_set_name: String,
    pub bank_name: String,
    /// Directory both artifacts are written into.
    pub output_dir: PathBuf,
    /// File name of the JSON description artifact.
    pub data_file_name: String,
    /// File name of the bank binary artifact.
    pub output_audio_name: String,
    /// Also write per-entry text dumps under `debug/`. Never changes the
    /// bank's bytes.
    pub debug_files: bool,
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildArtifacts {
    pub bank_path: PathBuf,
    pub data_path: PathBuf,
    pub build_id: Uuid,
    pub bank_size: u64,
    pub entry_count: usize,
}

/// The description file: structured metadata referencing offsets into the
/// bank binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankManifest {
    pub sound_set: String,
    pub bank_name: String,
    /// File name of the bank binary this manifest describes.
    pub audio_file: String,
    pub build_id: Uuid,
    pub built_at: DateTime<Utc>,
    /// SHA-256 of the bank file's bytes.
    pub bank_sha256: String,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub codec: String,
    pub data_offset: u64,
    pub data_len: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_count: u32,
    pub play_begin: u32,
    pub play_end: u32,
    pub loop_begin: u32,
    pub loop_end: u32,
    pub loop_point: u32,
    pub volume: f32,
    pub headroom: f32,
    pub peak: f32,
}

impl ManifestEntry {
    fn from_record(record: &BankRecord) -> ManifestEntry {
        ManifestEntry {
            name: record.name.clone(),
            codec: record.codec.as_str().to_string(),
            data_offset: record.data_offset,
            data_len: record.data_len,
            sample_rate: record.sample_rate,
            channels: record.channels,
            frame_count: record.frame_count,
            play_begin: record.play_begin,
            play_end: record.play_end,
            loop_begin: record.loop_begin,
            loop_end: record.loop_end,
            loop_point: record.loop_point,
            volume: record.volume,
            headroom: record.headroom,
            peak: record.peak,
        }
    }
}

/// Build a bank from the given entries.
///
/// An empty entry list is rejected. Every per-entry failure (unreadable
/// source, invalid bounds) is collected first and surfaced as one aggregated
/// `BuildError`; nothing is written in that case. On success the bank binary
/// and the description file are both present under `params.output_dir`.
pub fn build_bank(params: &BuildParams, entries: &[AudioEntry]) -> Result<BuildArtifacts> {
    if entries.is_empty() {
        return Err(SoundbankError::BuildError {
            reason: "refusing to build a bank with no entries".to_string(),
        });
    }
    if params.output_audio_name.is_empty() || params.data_file_name.is_empty() {
        return Err(SoundbankError::BuildError {
            reason: "output file names must not be empty".to_string(),
        });
    }
    if params.output_audio_name == params.data_file_name {
        return Err(SoundbankError::BuildError {
            reason: "bank and description file names must differ".to_string(),
        });
    }

    info!(
        "building bank '{}' ({} entries) into {}",
        params.bank_name,
        entries.len(),
        params.output_dir.display()
    );

    // Gather every payload before writing anything, collecting all failures
    // so one aggregated error reports the full picture.
    let mut items = Vec::with_capacity(entries.len());
    let mut failures: Vec<String> = Vec::new();
    for entry in entries {
        if entry.play_begin > entry.play_end || entry.loop_begin > entry.loop_end {
            failures.push(format!("{}: invalid play/loop bounds", entry.file_name));
            continue;
        }
        let record = match BankRecord::from_entry(entry) {
            Ok(record) => record,
            Err(e) => {
                failures.push(format!("{}: {}", entry.file_name, e));
                continue;
            }
        };
        match fs::read(&entry.file_path) {
            Ok(payload) => items.push((record, payload)),
            Err(e) => failures.push(format!(
                "{}: cannot read {}: {}",
                entry.file_name,
                entry.file_path.display(),
                e
            )),
        }
    }

    if !failures.is_empty() {
        return Err(SoundbankError::BuildError {
            reason: format!(
                "{} of {} entries failed: {}",
                failures.len(),
                entries.len(),
                failures.join("; ")
            ),
        });
    }

    let (bank_bytes, index) = format::encode_bank(items);

    let manifest = BankManifest {
        sound_set: params.sound_set_name.clone(),
        bank_name: params.bank_name.clone(),
        audio_file: params.output_audio_name.clone(),
        build_id: Uuid::new_v4(),
        built_at: Utc::now(),
        bank_sha256: sha256_hex(&bank_bytes),
        entries: index.entries.iter().map(ManifestEntry::from_record).collect(),
    };
    let manifest_json =
        serde_json::to_vec_pretty(&manifest).map_err(|e| SoundbankError::BuildError {
            reason: format!("failed to serialize bank description: {}", e),
        })?;

    fs::create_dir_all(&params.output_dir).map_err(|e| SoundbankError::FileWriteError {
        path: params.output_dir.clone(),
        source: e,
    })?;

    let bank_path = params.output_dir.join(&params.output_audio_name);
    let data_path = params.output_dir.join(&params.data_file_name);
    publish(&bank_path, &bank_bytes, &data_path, &manifest_json)?;

    if params.debug_files {
        write_debug_dumps(&params.output_dir, &manifest);
    }

    info!(
        "bank written: {} ({} bytes), description: {}",
        bank_path.display(),
        bank_bytes.len(),
        data_path.display()
    );

    Ok(BuildArtifacts {
        bank_path,
        data_path,
        build_id: manifest.build_id,
        bank_size: bank_bytes.len() as u64,
        entry_count: manifest.entries.len(),
    })
}

/// Write both artifacts to `.tmp` siblings, then rename into place.
///
/// On any failure the temp files are removed; if the bank was already
/// renamed when the description rename fails, the bank is removed too, so
/// either both artifacts appear or neither does.
fn publish(bank_path: &Path, bank_bytes: &[u8], data_path: &Path, data_bytes: &[u8]) -> Result<()> {
    let bank_tmp = temp_sibling(bank_path);
    let data_tmp = temp_sibling(data_path);

    let write_err = |path: &Path, e: std::io::Error| SoundbankError::FileWriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Err(e) = fs::write(&bank_tmp, bank_bytes) {
        let _ = fs::remove_file(&bank_tmp);
        return Err(write_err(&bank_tmp, e));
    }
    if let Err(e) = fs::write(&data_tmp, data_bytes) {
        let _ = fs::remove_file(&bank_tmp);
        let _ = fs::remove_file(&data_tmp);
        return Err(write_err(&data_tmp, e));
    }
    if let Err(e) = fs::rename(&bank_tmp, bank_path) {
        let _ = fs::remove_file(&bank_tmp);
        let _ = fs::remove_file(&data_tmp);
        return Err(write_err(bank_path, e));
    }
    if let Err(e) = fs::rename(&data_tmp, data_path) {
        let _ = fs::remove_file(bank_path);
        let _ = fs::remove_file(&data_tmp);
        return Err(write_err(data_path, e));
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{}.tmp", name))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Human-readable per-entry dumps under `<output>/debug/`.
///
/// Side files for inspection only; failures are logged and ignored so they
/// can never fail a build whose artifacts are already in place.
fn write_debug_dumps(output_dir: &Path, manifest: &BankManifest) {
    let debug_dir = output_dir.join("debug");
    if let Err(e) = fs::create_dir_all(&debug_dir) {
        warn!("cannot create debug dump directory: {}", e);
        return;
    }

    for entry in &manifest.entries {
        let dump = format!(
            "name:         {}\n\
             codec:        {}\n\
             data offset:  {}\n\
             data length:  {}\n\
             sample rate:  {}\n\
             channels:     {}\n\
             frames:       {}\n\
             play range:   {}..{}\n\
             loop range:   {}..{} (resume at {})\n\
             volume:       {}\n\
             headroom:     {}\n\
             peak:         {}\n",
            entry.name,
            entry.codec,
            entry.data_offset,
            entry.data_len,
            entry.sample_rate,
            entry.channels,
            entry.frame_count,
            entry.play_begin,
            entry.play_end,
            entry.loop_begin,
            entry.loop_end,
            entry.loop_point,
            entry.volume,
            entry.headroom,
            entry.peak,
        );
        let path = debug_dir.join(format!("{}.txt", entry.name));
        if let Err(e) = fs::write(&path, dump) {
            warn!("cannot write debug dump {}: {}", path.display(), e);
        }
    }
}
