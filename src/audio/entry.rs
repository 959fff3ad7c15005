//! One imported sound and its editable metadata.

use std::path::{Path, PathBuf};

use crate::audio::decode::{display_extension, Codec, DecodedAudio};
use crate::error::{Result, SoundbankError};

/// Default gain multiplier for new entries.
pub const DEFAULT_VOLUME: f32 = 1.0;
/// Default headroom in dB reserved below full scale.
pub const DEFAULT_HEADROOM: f32 = 0.0;

/// A single imported audio file.
///
/// `file_name` is the identity key inside the registry; no two live entries
/// share one. Play and loop bounds default to the full sample range and are
/// edited through the validated mutators, which keep `begin <= end`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEntry {
    /// Absolute path of the source file.
    pub file_path: PathBuf,
    /// File name including extension; unique within the registry.
    pub file_name: String,
    /// Extension with leading dot (`.wav` or `.mp3`).
    pub file_extension: String,
    /// Gain multiplier applied on playback.
    pub volume: f32,
    /// Margin in dB reserved below full scale.
    pub headroom: f32,
    /// First frame of the playback region.
    pub play_begin: u32,
    /// One past the last frame of the playback region.
    pub play_end: u32,
    /// First frame of the loop region.
    pub loop_begin: u32,
    /// One past the last frame of the loop region.
    pub loop_end: u32,
    /// Frame playback resumes from after reaching `loop_end`.
    pub loop_point: u32,
    /// Maximum absolute sample value, measured at import.
    pub peak: f32,
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_count: u32,
}

impl AudioEntry {
    /// Build an entry from a decoded source file.
    ///
    /// Play and loop bounds span the full sample range; the loop point
    /// starts at the loop begin.
    pub fn from_decoded(path: &Path, decoded: &DecodedAudio) -> Result<AudioEntry> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| SoundbankError::DecodeError {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
                source: None,
            })?;

        let frames = decoded.frames();

        Ok(AudioEntry {
            file_path: path.to_path_buf(),
            file_name,
            file_extension: display_extension(path),
            volume: DEFAULT_VOLUME,
            headroom: DEFAULT_HEADROOM,
            play_begin: 0,
            play_end: frames,
            loop_begin: 0,
            loop_end: frames,
            loop_point: 0,
            peak: decoded.peak(),
            sample_rate: decoded.sample_rate,
            channels: decoded.channels,
            frame_count: frames,
        })
    }

    /// Source codec, derived from the stored extension.
    pub fn codec(&self) -> Result<Codec> {
        Codec::from_path(&self.file_path).ok_or_else(|| SoundbankError::UnsupportedFormat {
            extension: self.file_extension.clone(),
        })
    }

    /// Set the playback region. Fails when `begin > end`.
    pub fn set_play_range(&mut self, begin: u32, end: u32) -> Result<()> {
        if begin > end {
            return Err(SoundbankError::InvalidRange {
                field: "play",
                begin,
                end,
            });
        }
        self.play_begin = begin;
        self.play_end = end;
        Ok(())
    }

    /// Set the loop region. Fails when `begin > end`.
    ///
    /// A `point` of `None` resumes playback at `begin`.
    pub fn set_loop(&mut self, begin: u32, end: u32, point: Option<u32>) -> Result<()> {
        if begin > end {
            return Err(SoundbankError::InvalidRange {
                field: "loop",
                begin,
                end,
            });
        }
        self.loop_begin = begin;
        self.loop_end = end;
        self.loop_point = point.unwrap_or(begin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn decoded_stub(frames: usize) -> DecodedAudio {
        DecodedAudio {
            samples: vec![0.25_f32; frames],
            channels: 1,
            sample_rate: 44_100,
        }
    }

    #[test]
    fn test_from_decoded_defaults_span_full_range() {
        let decoded = decoded_stub(1000);
        let entry = AudioEntry::from_decoded(Path::new("/sounds/kick.wav"), &decoded).unwrap();

        assert_eq!(entry.file_name, "kick.wav");
        assert_eq!(entry.file_extension, ".wav");
        assert_eq!(entry.play_begin, 0);
        assert_eq!(entry.play_end, 1000);
        assert_eq!(entry.loop_begin, 0);
        assert_eq!(entry.loop_end, 1000);
        assert_eq!(entry.loop_point, 0);
        assert_relative_eq!(entry.volume, 1.0);
        assert_relative_eq!(entry.peak, 0.25);
        assert_eq!(entry.frame_count, 1000);
    }

    #[test]
    fn test_set_loop_defaults_point_to_begin() {
        let mut entry =
            AudioEntry::from_decoded(Path::new("/sounds/pad.wav"), &decoded_stub(500)).unwrap();

        entry.set_loop(100, 400, None).unwrap();
        assert_eq!(entry.loop_point, 100);

        entry.set_loop(100, 400, Some(250)).unwrap();
        assert_eq!(entry.loop_point, 250);
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        let mut entry =
            AudioEntry::from_decoded(Path::new("/sounds/pad.wav"), &decoded_stub(500)).unwrap();

        let err = entry.set_loop(300, 100, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RANGE");
        // entry keeps its previous bounds on failure
        assert_eq!(entry.loop_begin, 0);
        assert_eq!(entry.loop_end, 500);

        assert!(entry.set_play_range(400, 200).is_err());
        assert_eq!(entry.play_begin, 0);
        assert_eq!(entry.play_end, 500);
    }

    #[test]
    fn test_codec_from_extension() {
        let entry =
            AudioEntry::from_decoded(Path::new("/sounds/loop.mp3"), &decoded_stub(10)).unwrap();
        assert_eq!(entry.codec().unwrap(), Codec::Mp3);
    }
}
