//! Audio format configuration.

use serde::{Deserialize, Serialize};

use resound_io::{AudioFormat, ByteOrder, Encoding};

use crate::error::ConfigError;
use crate::validation::validate_format;

/// Serializable description of the byte stream a pipeline reads.
///
/// Unlike [`AudioFormat`], this accepts any field values; problems are
/// reported by [`validate_format`](crate::validate_format) or when converting.
///
/// # TOML Format
///
/// ```toml
/// [format]
/// sample_rate = 48000
/// bits_per_sample = 24
/// channels = 2
/// encoding = "PCM_SIGNED"
/// byte_order = "big-endian"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Frames per second.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Bits per sample.
    #[serde(default = "default_bits")]
    pub bits_per_sample: u16,

    /// Channels per frame.
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Sample encoding.
    #[serde(default = "default_encoding")]
    pub encoding: Encoding,

    /// Byte order of multi-byte samples.
    #[serde(default)]
    pub byte_order: ByteOrder,
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_bits() -> u16 {
    16
}

fn default_channels() -> u16 {
    2
}

fn default_encoding() -> Encoding {
    Encoding::PcmSigned
}

impl Default for FormatConfig {
    fn default() -> Self {
        AudioFormat::NORMAL_QUALITY.into()
    }
}

impl From<AudioFormat> for FormatConfig {
    fn from(format: AudioFormat) -> Self {
        Self {
            sample_rate: format.sample_rate(),
            bits_per_sample: format.bits_per_sample(),
            channels: format.channels() as u16,
            encoding: format.encoding(),
            byte_order: format.byte_order(),
        }
    }
}

impl FormatConfig {
    /// Validated [`AudioFormat`], with an encoding the converter supports.
    pub fn to_audio_format(&self) -> Result<AudioFormat, ConfigError> {
        validate_format(self)?;
        Ok(self.to_audio_format_unchecked()?)
    }

    /// Builds the [`AudioFormat`] without checking encoding support.
    pub(crate) fn to_audio_format_unchecked(&self) -> resound_io::Result<AudioFormat> {
        AudioFormat::new(
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
            self.encoding,
            self.byte_order,
        )
    }
}
