//! ITU-T G.711 μ-law and A-law companding.
//!
//! Converts between 16-bit linear PCM and 8-bit companded codes. The linear
//! side uses the full `i16` range; callers normalize by 32768.
//!
//! ```rust
//! use resound_io::g711;
//!
//! assert_eq!(g711::ulaw_encode(0), 0xFF);
//! assert_eq!(g711::ulaw_decode(0x80), 32124);
//! assert_eq!(g711::alaw_decode(0xD5), 8);
//! ```

/// μ-law bias added before segment search.
const ULAW_BIAS: i32 = 0x84;

/// Largest magnitude μ-law can represent once biased.
const ULAW_CLIP: i32 = 32635;

/// Upper bound of each A-law segment, in 13-bit magnitude.
const ALAW_SEGMENT_END: [i32; 8] = [0x1F, 0x3F, 0x7F, 0xFF, 0x1FF, 0x3FF, 0x7FF, 0xFFF];

/// Encodes a linear sample as μ-law.
pub fn ulaw_encode(sample: i16) -> u8 {
    let mut pcm = i32::from(sample);
    let sign = if pcm < 0 {
        pcm = -pcm;
        0x80
    } else {
        0x00
    };
    pcm = pcm.min(ULAW_CLIP) + ULAW_BIAS;

    // Segment is the position of the highest set bit above bit 7
    let mut exponent = 7;
    let mut mask = 0x4000;
    while exponent > 0 && pcm & mask == 0 {
        exponent -= 1;
        mask >>= 1;
    }
    let mantissa = (pcm >> (exponent + 3)) & 0x0F;

    !((sign | (exponent << 4) | mantissa) as u8)
}

/// Decodes a μ-law code to a linear sample in `[-32124, 32124]`.
pub fn ulaw_decode(code: u8) -> i16 {
    let u = i32::from(!code);
    let exponent = (u >> 4) & 0x07;
    let mantissa = u & 0x0F;
    let magnitude = (((mantissa << 3) + ULAW_BIAS) << exponent) - ULAW_BIAS;
    if u & 0x80 != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// Encodes a linear sample as A-law.
pub fn alaw_encode(sample: i16) -> u8 {
    let mut pcm = i32::from(sample) >> 3;
    let mask = if pcm >= 0 {
        0xD5
    } else {
        pcm = -pcm - 1;
        0x55
    };

    let Some(segment) = ALAW_SEGMENT_END.iter().position(|&end| pcm <= end) else {
        return (0x7F ^ mask) as u8;
    };

    let shift = if segment < 2 { 1 } else { segment };
    let code = ((segment as i32) << 4) | ((pcm >> shift) & 0x0F);
    (code ^ mask) as u8
}

/// Decodes an A-law code to a linear sample in `[-32256, 32256]`.
pub fn alaw_decode(code: u8) -> i16 {
    let a = i32::from(code ^ 0x55);
    let mut t = (a & 0x0F) << 4;
    let segment = (a & 0x70) >> 4;
    match segment {
        0 => t += 8,
        1 => t += 0x108,
        _ => {
            t += 0x108;
            t <<= segment - 1;
        }
    }
    if a & 0x80 != 0 { t as i16 } else { -t as i16 }
}
