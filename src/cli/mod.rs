//! CLI Module
//!
//! Command-line interface for the soundbank assembly tool.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::theme::THEME_SETTINGS_FILE;

/// Soundbank - pack WAV/MP3 sounds into a single bank file
#[derive(Parser, Debug)]
#[command(name = "soundbank")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate audio files for import without building anything
    #[command(name = "check")]
    Check {
        /// Audio files or directories to scan for .wav/.mp3 files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Build a bank from a settings file
    #[command(name = "build")]
    Build {
        /// Path to the settings JSON document
        settings: PathBuf,

        /// Output directory (overrides the settings' OutputPath)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write per-entry text dumps alongside the bank
        #[arg(long)]
        debug_files: bool,
    },

    /// Print a bank file's header and directory
    #[command(name = "inspect")]
    Inspect {
        /// Path to the bank binary
        bank: PathBuf,
    },

    /// Show or set the persisted UI theme
    #[command(name = "theme")]
    Theme {
        /// Light or Dark; prints the current theme when omitted
        theme: Option<String>,

        /// Theme preference file
        #[arg(long, default_value = THEME_SETTINGS_FILE)]
        file: PathBuf,
    },
}
