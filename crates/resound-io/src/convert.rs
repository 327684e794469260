//! Interleaved bytes <-> planar `f32` conversion.
//!
//! Decoding rules per [`Encoding`]:
//!
//! | Encoding | Widths | Decoded range | Notes |
//! |----------|--------|---------------|-------|
//! | `PcmUnsigned` | 1-4 bytes | `[0, 1]` | Assembled high byte first regardless of byte order, divided by `2^(8N) - 1` |
//! | `PcmSigned` | 1-4 bytes | `[-1, 1)` | Divided by `2^(8N - 1)`; 24-bit is sign-extended by hand |
//! | `PcmFloat` | 4 or 8 bytes | unscaled | `f64` is narrowed to `f32` |
//! | `ULaw` / `ALaw` | 1 byte | `[-1, 1)` | G.711, normalized by 32768 |
//!
//! Encoding clamps to the decoded range, scales, and quantizes: unsigned
//! truncates, signed and companded round to nearest. Float is written as is.
//!
//! A trailing partial frame in the input bytes is ignored.

use resound_core::samples::{self, SamplesError};

use crate::format::{AudioFormat, ByteOrder, Encoding};
use crate::g711;
use crate::{Error, Result};

/// Per-sample codec resolved once per call from a format.
#[derive(Debug, Clone, Copy)]
enum SampleCodec {
    Unsigned { width: usize },
    Signed { width: usize, order: ByteOrder },
    Float32(ByteOrder),
    Float64(ByteOrder),
    ULaw,
    ALaw,
}

impl SampleCodec {
    fn for_format(format: &AudioFormat) -> Result<Self> {
        let bits = format.bits_per_sample();
        let unsupported = || Error::UnsupportedEncoding {
            encoding: format.encoding(),
            bits,
        };
        if bits % 8 != 0 {
            return Err(unsupported());
        }
        let width = format.bytes_per_sample();
        let order = format.byte_order();

        match (format.encoding(), width) {
            (Encoding::PcmUnsigned, 1..=4) => Ok(Self::Unsigned { width }),
            (Encoding::PcmSigned, 1..=4) => Ok(Self::Signed { width, order }),
            (Encoding::PcmFloat, 4) => Ok(Self::Float32(order)),
            (Encoding::PcmFloat, 8) => Ok(Self::Float64(order)),
            (Encoding::ULaw, 1) => Ok(Self::ULaw),
            (Encoding::ALaw, 1) => Ok(Self::ALaw),
            _ => Err(unsupported()),
        }
    }

    #[inline]
    fn decode(self, bytes: &[u8]) -> f32 {
        match self {
            Self::Unsigned { width } => {
                let value = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
                (value as f64 / unsigned_max(width)) as f32
            }
            Self::Signed { width, order } => {
                (f64::from(read_signed(bytes, width, order)) / signed_scale(width)) as f32
            }
            Self::Float32(order) => {
                let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
                match order {
                    ByteOrder::LittleEndian => f32::from_le_bytes(raw),
                    ByteOrder::BigEndian => f32::from_be_bytes(raw),
                }
            }
            Self::Float64(order) => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[..8]);
                let v = match order {
                    ByteOrder::LittleEndian => f64::from_le_bytes(raw),
                    ByteOrder::BigEndian => f64::from_be_bytes(raw),
                };
                v as f32
            }
            Self::ULaw => f32::from(g711::ulaw_decode(bytes[0])) / 32768.0,
            Self::ALaw => f32::from(g711::alaw_decode(bytes[0])) / 32768.0,
        }
    }

    #[inline]
    fn encode(self, sample: f32, out: &mut [u8]) {
        match self {
            Self::Unsigned { width } => {
                let value = (f64::from(sample.clamp(0.0, 1.0)) * unsigned_max(width)) as u64;
                for (i, b) in out[..width].iter_mut().enumerate() {
                    *b = (value >> (8 * (width - 1 - i))) as u8;
                }
            }
            Self::Signed { width, order } => {
                let scale = signed_scale(width);
                let max = scale - 1.0;
                let value = (f64::from(sample.clamp(-1.0, 1.0)) * scale)
                    .round()
                    .clamp(-scale, max) as i32;
                write_signed(value, &mut out[..width], order);
            }
            Self::Float32(order) => {
                let raw = match order {
                    ByteOrder::LittleEndian => sample.to_le_bytes(),
                    ByteOrder::BigEndian => sample.to_be_bytes(),
                };
                out[..4].copy_from_slice(&raw);
            }
            Self::Float64(order) => {
                let v = f64::from(sample);
                let raw = match order {
                    ByteOrder::LittleEndian => v.to_le_bytes(),
                    ByteOrder::BigEndian => v.to_be_bytes(),
                };
                out[..8].copy_from_slice(&raw);
            }
            Self::ULaw => out[0] = g711::ulaw_encode(quantize_i16(sample)),
            Self::ALaw => out[0] = g711::alaw_encode(quantize_i16(sample)),
        }
    }
}

/// `2^(8N) - 1`
#[inline]
fn unsigned_max(width: usize) -> f64 {
    ((1u64 << (8 * width)) - 1) as f64
}

/// `2^(8N - 1)`
#[inline]
fn signed_scale(width: usize) -> f64 {
    (1u64 << (8 * width - 1)) as f64
}

/// Clamp to [-1, 1], scale by 32768 and round into `i16`.
#[inline]
fn quantize_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32768.0)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Reads a `width`-byte two's complement integer, sign-extended to `i32`.
#[inline]
fn read_signed(bytes: &[u8], width: usize, order: ByteOrder) -> i32 {
    match (width, order) {
        (1, _) => i32::from(bytes[0] as i8),
        (2, ByteOrder::LittleEndian) => i32::from(i16::from_le_bytes([bytes[0], bytes[1]])),
        (2, ByteOrder::BigEndian) => i32::from(i16::from_be_bytes([bytes[0], bytes[1]])),
        (3, order) => {
            let (lo, mid, hi) = match order {
                ByteOrder::LittleEndian => (bytes[0], bytes[1], bytes[2]),
                ByteOrder::BigEndian => (bytes[2], bytes[1], bytes[0]),
            };
            let raw = i32::from(lo) | (i32::from(mid) << 8) | (i32::from(hi) << 16);
            // Shift the 24-bit sign bit into bit 31 and back
            (raw << 8) >> 8
        }
        (_, ByteOrder::LittleEndian) => {
            i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
        }
        (_, ByteOrder::BigEndian) => i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    }
}

/// Writes the low `out.len()` bytes of `value` in the given order.
#[inline]
fn write_signed(value: i32, out: &mut [u8], order: ByteOrder) {
    let le = value.to_le_bytes();
    let width = out.len();
    for (i, b) in out.iter_mut().enumerate() {
        *b = match order {
            ByteOrder::LittleEndian => le[i],
            ByteOrder::BigEndian => le[width - 1 - i],
        };
    }
}

fn samples_error(err: SamplesError, format: &AudioFormat) -> Error {
    match err {
        SamplesError::NoChannels => Error::ChannelCount {
            expected: format.channels(),
            actual: 0,
        },
        SamplesError::RaggedChannel {
            channel,
            len,
            expected,
        } => Error::ChannelLength {
            channel,
            len,
            expected,
        },
        SamplesError::ChannelCount { expected, actual } => Error::ChannelCount { expected, actual },
    }
}

/// Checks a planar buffer against the format and returns its frame count.
fn check_planar<S: AsRef<[f32]>>(channels: &[S], format: &AudioFormat) -> Result<usize> {
    if channels.len() != format.channels() {
        return Err(Error::ChannelCount {
            expected: format.channels(),
            actual: channels.len(),
        });
    }
    samples::validate(channels).map_err(|e| samples_error(e, format))
}

/// Checks that `format` names an encoding and width pair this crate can convert.
///
/// Supported: integer PCM of 1 to 4 bytes, float PCM of 4 or 8 bytes, and
/// 8-bit μ-law or A-law.
pub fn check_format(format: &AudioFormat) -> Result<()> {
    SampleCodec::for_format(format).map(|_| ())
}

/// Decodes interleaved bytes into a new planar buffer.
///
/// Returns one `Vec` per channel with `data.len() / frame_size` samples each.
pub fn to_samples(data: &[u8], format: &AudioFormat) -> Result<Vec<Vec<f32>>> {
    SampleCodec::for_format(format)?;
    let frames = data.len() / format.frame_size();
    let mut output = vec![vec![0.0f32; frames]; format.channels()];
    to_samples_into(data, &mut output, format)?;
    Ok(output)
}

/// Decodes interleaved bytes into caller-provided planar storage.
///
/// `output` must have one row per channel, each exactly
/// `data.len() / frame_size` samples long.
pub fn to_samples_into<S>(data: &[u8], output: &mut [S], format: &AudioFormat) -> Result<()>
where
    S: AsRef<[f32]> + AsMut<[f32]>,
{
    let codec = SampleCodec::for_format(format)?;
    let frame_size = format.frame_size();
    let width = format.bytes_per_sample();
    let frames = data.len() / frame_size;

    let rows = check_planar(&*output, format)?;
    if rows != frames {
        return Err(Error::ChannelLength {
            channel: 0,
            len: rows,
            expected: frames,
        });
    }

    let remainder = data.len() % frame_size;
    if remainder != 0 {
        tracing::debug!(
            bytes = remainder,
            frame_size,
            "to_samples: dropping trailing partial frame"
        );
    }

    for (i, frame) in data.chunks_exact(frame_size).enumerate() {
        for (row, bytes) in output.iter_mut().zip(frame.chunks_exact(width)) {
            row.as_mut()[i] = codec.decode(bytes);
        }
    }

    tracing::trace!(
        frames,
        channels = format.channels(),
        encoding = %format.encoding(),
        "to_samples"
    );
    Ok(())
}

/// Encodes a planar buffer into a new interleaved byte vector.
pub fn from_samples<S: AsRef<[f32]>>(samples: &[S], format: &AudioFormat) -> Result<Vec<u8>> {
    let frames = check_planar(samples, format)?;
    let mut out = vec![0u8; frames * format.frame_size()];
    from_samples_into(samples, &mut out, format)?;
    Ok(out)
}

/// Encodes a planar buffer into caller-provided bytes.
///
/// `output` must be exactly `frames * frame_size` bytes long.
pub fn from_samples_into<S: AsRef<[f32]>>(
    samples: &[S],
    output: &mut [u8],
    format: &AudioFormat,
) -> Result<()> {
    let codec = SampleCodec::for_format(format)?;
    let frames = check_planar(samples, format)?;
    let frame_size = format.frame_size();
    let width = format.bytes_per_sample();

    let expected = frames * frame_size;
    if output.len() != expected {
        return Err(Error::OutputLength {
            len: output.len(),
            expected,
        });
    }

    for (i, frame) in output.chunks_exact_mut(frame_size).enumerate() {
        for (row, bytes) in samples.iter().zip(frame.chunks_exact_mut(width)) {
            codec.encode(row.as_ref()[i], bytes);
        }
    }

    tracing::trace!(
        frames,
        channels = format.channels(),
        encoding = %format.encoding(),
        "from_samples"
    );
    Ok(())
}
