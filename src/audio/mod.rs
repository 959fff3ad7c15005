//! Audio import: decoding, entry metadata, and the in-memory registry.

pub mod decode;
pub mod entry;
pub mod repository;

pub use decode::{decode_audio, Codec, DecodedAudio};
pub use entry::AudioEntry;
pub use repository::{AudioRepository, ImportFailure, ImportReport};

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::Path;

    use hound::{SampleFormat, WavSpec, WavWriter};

    /// Write a 16-bit PCM WAV file for tests.
    pub fn write_pcm16_wav(path: &Path, channels: u16, sample_rate: u32, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }
}
