//! Audio format descriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// Unsigned integer PCM, decoded to `[0, 1]`.
    #[serde(rename = "PCM_UNSIGNED")]
    PcmUnsigned,
    /// Signed integer PCM, decoded to `[-1, 1)`.
    #[serde(rename = "PCM_SIGNED")]
    PcmSigned,
    /// IEEE 754 float, 32 or 64 bit.
    #[serde(rename = "PCM_FLOAT")]
    PcmFloat,
    /// G.711 μ-law, 8 bit.
    #[serde(rename = "ULAW")]
    ULaw,
    /// G.711 A-law, 8 bit.
    #[serde(rename = "ALAW")]
    ALaw,
}

impl Encoding {
    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::PcmUnsigned => "PCM_UNSIGNED",
            Encoding::PcmSigned => "PCM_SIGNED",
            Encoding::PcmFloat => "PCM_FLOAT",
            Encoding::ULaw => "ULAW",
            Encoding::ALaw => "ALAW",
        }
    }

    /// Whether the encoding stores samples without companding.
    pub fn is_pcm(self) -> bool {
        matches!(
            self,
            Encoding::PcmUnsigned | Encoding::PcmSigned | Encoding::PcmFloat
        )
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    #[default]
    LittleEndian,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => f.write_str("big-endian"),
            ByteOrder::LittleEndian => f.write_str("little-endian"),
        }
    }
}

/// Immutable description of an interleaved byte stream.
///
/// ```rust
/// use resound_io::{AudioFormat, ByteOrder, Encoding};
///
/// let fmt = AudioFormat::new(48000, 24, 2, Encoding::PcmSigned, ByteOrder::LittleEndian)?;
/// assert_eq!(fmt.frame_size(), 6);
/// assert_eq!(fmt.byte_rate(), 288_000);
/// # Ok::<(), resound_io::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FormatFields")]
pub struct AudioFormat {
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
    encoding: Encoding,
    byte_order: ByteOrder,
}

/// Unvalidated serde mirror of [`AudioFormat`].
#[derive(Deserialize)]
struct FormatFields {
    sample_rate: u32,
    bits_per_sample: u16,
    channels: u16,
    encoding: Encoding,
    #[serde(default)]
    byte_order: ByteOrder,
}

impl TryFrom<FormatFields> for AudioFormat {
    type Error = Error;

    fn try_from(f: FormatFields) -> Result<Self> {
        Self::new(
            f.sample_rate,
            f.bits_per_sample,
            f.channels,
            f.encoding,
            f.byte_order,
        )
    }
}

impl AudioFormat {
    /// 8 kHz, 8-bit unsigned, mono.
    pub const LOWEST_QUALITY: Self =
        Self::preset(8000, 8, 1, Encoding::PcmUnsigned);
    /// 22.5 kHz, 8-bit unsigned, mono.
    pub const LOW_QUALITY: Self = Self::preset(22500, 8, 1, Encoding::PcmUnsigned);
    /// 44.1 kHz, 16-bit signed, stereo.
    pub const NORMAL_QUALITY: Self = Self::preset(44100, 16, 2, Encoding::PcmSigned);
    /// 48 kHz, 16-bit signed, stereo.
    pub const HIGH_QUALITY: Self = Self::preset(48000, 16, 2, Encoding::PcmSigned);
    /// 48 kHz, 32-bit float, stereo.
    pub const ULTRA_QUALITY: Self = Self::preset(48000, 32, 2, Encoding::PcmFloat);

    const fn preset(sample_rate: u32, bits_per_sample: u16, channels: u16, encoding: Encoding) -> Self {
        Self {
            sample_rate,
            bits_per_sample,
            channels,
            encoding,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Creates a format, rejecting zero sample rate, bit depth or channel count.
    pub fn new(
        sample_rate: u32,
        bits_per_sample: u16,
        channels: u16,
        encoding: Encoding,
        byte_order: ByteOrder,
    ) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidFormat("sample rate must be positive".into()));
        }
        if bits_per_sample == 0 {
            return Err(Error::InvalidFormat(
                "bits per sample must be positive".into(),
            ));
        }
        if channels == 0 {
            return Err(Error::InvalidFormat(
                "number of channels must be positive".into(),
            ));
        }
        Ok(Self {
            sample_rate,
            bits_per_sample,
            channels,
            encoding,
            byte_order,
        })
    }

    /// Frames per second.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Bytes per sample (`bits / 8`).
    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Channels per frame.
    pub fn channels(&self) -> usize {
        usize::from(self.channels)
    }

    /// Sample encoding.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte order of multi-byte samples.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether multi-byte samples are stored most significant byte first.
    pub fn is_big_endian(&self) -> bool {
        self.byte_order == ByteOrder::BigEndian
    }

    /// Bytes per interleaved frame.
    pub fn frame_size(&self) -> usize {
        self.bytes_per_sample() * self.channels()
    }

    /// Bytes per second.
    pub fn byte_rate(&self) -> usize {
        self.frame_size() * self.sample_rate as usize
    }

    /// Single channel.
    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }

    /// Exactly two channels.
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// More than 16 bits per sample.
    pub fn is_high_resolution(&self) -> bool {
        self.bits_per_sample > 16
    }

    /// PCM encodings are lossless; companded ones are not.
    pub fn is_lossless(&self) -> bool {
        self.encoding.is_pcm()
    }

    /// Same format with a different encoding.
    pub fn with_encoding(self, encoding: Encoding) -> Self {
        Self { encoding, ..self }
    }

    /// Same format with a different byte order.
    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }
}

/// Formats a bit rate with decimal prefixes, e.g. `1.41 Mbps`.
fn format_bit_rate(bits_per_sec: f64) -> String {
    if bits_per_sec >= 1e9 {
        format!("{:.2} Gbps", bits_per_sec / 1e9)
    } else if bits_per_sec >= 1e6 {
        format!("{:.2} Mbps", bits_per_sec / 1e6)
    } else if bits_per_sec >= 1e3 {
        format!("{:.2} kbps", bits_per_sec / 1e3)
    } else {
        format!("{bits_per_sec:.0} bps")
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {}-bit, {} ch, {}, {}, {}",
            self.sample_rate,
            self.bits_per_sample,
            self.channels,
            self.encoding,
            self.byte_order,
            format_bit_rate(self.byte_rate() as f64 * 8.0)
        )
    }
}
