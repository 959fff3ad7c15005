//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use log::{info, warn};
use walkdir::WalkDir;

use crate::audio::decode::Codec;
use crate::audio::repository::AudioRepository;
use crate::bank::builder::{build_bank, BuildParams};
use crate::bank::format::read_bank;
use crate::error::{Result, SoundbankError};
use crate::settings::{load_settings_file, restore};
use crate::theme::{Theme, ThemeManager};

/// Validate a batch of audio files without building anything.
///
/// Directories are scanned recursively for `.wav`/`.mp3` files. Per-file
/// failures are printed and never abort the batch.
pub fn check(paths: &[PathBuf]) -> Result<()> {
    let files = expand_paths(paths);
    info!("checking {} file(s)", files.len());

    let mut repo = AudioRepository::new();
    let report = repo.add_files(&files);

    for entry in repo.entries() {
        println!(
            "ok      {} ({} Hz, {} ch, {} frames, peak {:.3})",
            entry.file_name, entry.sample_rate, entry.channels, entry.frame_count, entry.peak
        );
    }
    for failure in &report.failures {
        println!("FAILED  {}: {}", failure.path.display(), failure.error);
    }

    println!(
        "{} imported, {} failed",
        report.added.len(),
        report.failures.len()
    );
    Ok(())
}

/// Files passed through as-is; directories scanned for supported audio.
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| Codec::from_path(p).is_some())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Build a bank from a settings document.
pub fn build(settings_path: &Path, output: Option<&Path>, debug_files: bool) -> Result<()> {
    info!("loading settings: {}", settings_path.display());
    let settings = load_settings_file(settings_path)?;

    let mut repo = AudioRepository::new();
    let report = restore(&settings, &mut repo);

    if !report.is_clean() {
        println!(
            "Warning: {} file(s) could not be restored:",
            report.skipped.len()
        );
        for error in &report.skipped {
            println!("  {}", error);
        }
    }
    println!("Loaded {} audio file(s).", report.loaded);

    let output_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None if settings.output_path.as_os_str().is_empty() => {
            return Err(SoundbankError::BuildError {
                reason: "no output directory: settings have an empty OutputPath and no --output was given"
                    .to_string(),
            });
        }
        None => settings.output_path.clone(),
    };

    let params = BuildParams {
        sound_set_name: settings.sound_set_name.clone(),
        bank_name: settings.audio_bank_name.clone(),
        output_dir,
        data_file_name: settings.audio_data_file_name.clone(),
        output_audio_name: settings.output_audio_name.clone(),
        debug_files,
    };

    let artifacts = build_bank(&params, repo.entries())?;

    println!("Bank built successfully!");
    println!("  Bank:        {}", artifacts.bank_path.display());
    println!("  Description: {}", artifacts.data_path.display());
    println!("  Entries:     {}", artifacts.entry_count);
    println!("  Size:        {} bytes", artifacts.bank_size);
    println!("  Build id:    {}", artifacts.build_id);

    Ok(())
}

/// Print a bank file's header and directory.
pub fn inspect(bank: &Path) -> Result<()> {
    let index = read_bank(bank)?;

    println!("Bank: {}", bank.display());
    println!("Version: {}", index.version);
    println!("Entries: {}", index.entries.len());

    if index.entries.is_empty() {
        return Ok(());
    }

    println!("{:-<78}", "");
    for record in &index.entries {
        println!(
            "{}  [{}]  {} bytes at offset {}",
            record.name,
            record.codec.as_str(),
            record.data_len,
            record.data_offset
        );
        println!(
            "    {} Hz, {} ch, {} frames, play {}..{}, loop {}..{} (resume {}), vol {:.2}, headroom {:.2}, peak {:.3}",
            record.sample_rate,
            record.channels,
            record.frame_count,
            record.play_begin,
            record.play_end,
            record.loop_begin,
            record.loop_end,
            record.loop_point,
            record.volume,
            record.headroom,
            record.peak
        );
    }
    println!("{:-<78}", "");

    Ok(())
}

/// Show or set the persisted theme preference.
pub fn theme(value: Option<&str>, file: &Path) -> Result<()> {
    let mut manager = ThemeManager::new(file);

    match value {
        None => {
            println!("{}", manager.current());
        }
        Some(raw) => match raw.parse::<Theme>() {
            Ok(theme) => {
                manager.set_theme(theme);
                println!("Theme set to {}", theme);
            }
            Err(()) => {
                warn!("unknown theme token: {}", raw);
                println!("Unknown theme '{}': expected Light or Dark", raw);
            }
        },
    }

    Ok(())
}
