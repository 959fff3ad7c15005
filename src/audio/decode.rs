//! Audio file decoding for import.
//!
//! WAV files are read with hound and normalized to 32-bit float; MP3 files
//! are decoded through symphonia. Import only needs metadata and the sample
//! peak, so everything is decoded once, up front, into an interleaved buffer.

use std::fs::File;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use symphonia::core::audio::SampleBuffer as SymphoniaSampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::error::{Result, SoundbankError};

/// Source codec of an imported audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Wav,
    Mp3,
}

impl Codec {
    /// Determine the codec from a file extension (case-insensitive).
    ///
    /// Returns `None` for anything other than `.wav`/`.mp3`.
    pub fn from_path(path: &Path) -> Option<Codec> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wav" => Some(Codec::Wav),
            "mp3" => Some(Codec::Mp3),
            _ => None,
        }
    }

    /// Wire code used in bank directory records.
    pub fn code(self) -> u16 {
        match self {
            Codec::Wav => 0,
            Codec::Mp3 => 1,
        }
    }

    /// Inverse of [`Codec::code`].
    pub fn from_code(code: u16) -> Option<Codec> {
        match code {
            0 => Some(Codec::Wav),
            1 => Some(Codec::Mp3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Codec::Wav => "wav",
            Codec::Mp3 => "mp3",
        }
    }
}

/// Decoded audio in interleaved 32-bit float form.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples, `channels` per frame.
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> u32 {
        (self.samples.len() / self.channels.max(1) as usize) as u32
    }

    /// Maximum absolute sample value in the buffer.
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }
}

/// Decode an audio file for import.
///
/// Dispatches on the file extension. The caller is expected to have applied
/// the extension gate already; an unknown extension still fails cleanly with
/// `UnsupportedFormat`.
pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    match Codec::from_path(path) {
        Some(Codec::Wav) => decode_wav(path),
        Some(Codec::Mp3) => decode_mp3(path),
        None => Err(SoundbankError::UnsupportedFormat {
            extension: display_extension(path),
        }),
    }
}

/// Extension with its leading dot, for error messages.
pub fn display_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => "(none)".to_string(),
    }
}

fn decode_err(path: &Path, reason: String) -> SoundbankError {
    SoundbankError::DecodeError {
        path: path.to_path_buf(),
        reason,
        source: None,
    }
}

fn decode_err_with<E>(path: &Path, reason: String, source: E) -> SoundbankError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SoundbankError::DecodeError {
        path: path.to_path_buf(),
        reason,
        source: Some(Box::new(source)),
    }
}

// ============================================================================
// WAV (hound)
// ============================================================================

fn decode_wav(path: &Path) -> Result<DecodedAudio> {
    let reader = WavReader::open(path)
        .map_err(|e| decode_err_with(path, format!("failed to open WAV file: {}", e), e))?;

    let spec = reader.spec();
    let channels = spec.channels;
    let sample_rate = spec.sample_rate;

    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format, path)?;

    if samples.is_empty() {
        return Err(decode_err(path, "audio contains no samples".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        channels,
        sample_rate,
    })
}

/// Read samples from a WAV reader and normalize to f32.
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
    path: &Path,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| decode_err_with(path, format!("failed to read float samples: {}", e), e)),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    decode_err_with(path, format!("failed to read 8-bit samples: {}", e), e)
                }),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    decode_err_with(path, format!("failed to read 16-bit samples: {}", e), e)
                }),
            24 => {
                // 24-bit stored as i32 in hound
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / 8388608.0))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| {
                        decode_err_with(path, format!("failed to read 24-bit samples: {}", e), e)
                    })
            }
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| {
                    decode_err_with(path, format!("failed to read 32-bit int samples: {}", e), e)
                }),
            other => Err(decode_err(
                path,
                format!("{}-bit integer audio is not supported", other),
            )),
        },
    }
}

// ============================================================================
// MP3 (symphonia)
// ============================================================================

fn decode_mp3(path: &Path) -> Result<DecodedAudio> {
    let file = File::open(path)
        .map_err(|e| decode_err_with(path, format!("failed to open file: {}", e), e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err_with(path, format!("unrecognized audio format: {}", e), e))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| decode_err(path, "no default audio track".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_err(path, "missing sample rate".to_string()))?;
    let channels = track
        .codec_params
        .channels
        .ok_or_else(|| decode_err(path, "missing channel description".to_string()))?
        .count() as u16;

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err_with(path, format!("unsupported codec: {}", e), e))?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => {
                return Err(decode_err_with(
                    path,
                    format!("failed to read packet: {}", err),
                    err,
                ))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder
            .decode(&packet)
            .map_err(|e| decode_err_with(path, format!("failed to decode packet: {}", e), e))?;
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(decode_err(path, "audio contains no samples".to_string()));
    }

    Ok(DecodedAudio {
        samples,
        channels,
        sample_rate,
    })
}
