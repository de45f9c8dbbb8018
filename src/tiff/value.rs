//! Typed TIFF tag values and the tag decoder.
//!
//! The decoder turns a raw payload buffer (as returned by the metadata query
//! port's second phase) into a [`TagValue`]. It is a total function: no
//! combination of wire type, element count, and buffer ever fails. Inputs it
//! cannot represent faithfully degrade to a best-effort form (a decimal
//! string or an opaque blob) rather than erroring, because a tag the core
//! cannot decode must never abort container parsing.
//!
//! Payload bytes are little-endian, per the metadata port contract.
//!
//! # Known Lossy Reinterpretation
//!
//! Signed 16/32/64-bit *arrays* are stored using the unsigned array variants
//! (bit-reinterpreted, not arithmetic-converted). This crate only
//! re-serializes array elements, never does arithmetic on them, so the
//! representation is preserved as-is; see the signed-array tests below,
//! which pin the behavior deliberately.

use std::fmt;

use bytes::Bytes;

use super::wire::WireType;

// =============================================================================
// Decode Options
// =============================================================================

/// Maximum number of array elements rendered in string projections.
/// Longer arrays are truncated with a trailing ",..." marker.
const DISPLAY_ELEMENT_CAP: usize = 10;

/// Tuning knobs for the tag decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum bytes to retain for opaque blob values, 0 = unlimited.
    ///
    /// Vendor blobs can be arbitrarily large; setting a limit keeps a
    /// hostile or malformed container from ballooning memory.
    pub max_blob_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_blob_bytes: 0 }
    }
}

// =============================================================================
// TagValue
// =============================================================================

/// A decoded TIFF tag value.
///
/// Closed sum over every wire representation the decoder produces. Exactly
/// one variant is active; array variants are never empty (an empty decode
/// result is `Unset`, which callers must not store).
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// No value (empty ASCII, empty array, or empty buffer)
    Unset,

    /// ASCII text, rational renderings, and numeric fallback strings
    Text(String),

    /// Unsigned 8-bit scalar
    U8(u8),

    /// Signed 8-bit scalar
    I8(i8),

    /// Unsigned 16-bit scalar
    U16(u16),

    /// Signed 16-bit scalar
    I16(i16),

    /// Unsigned 32-bit scalar
    U32(u32),

    /// Signed 32-bit scalar
    I32(i32),

    /// Unsigned 64-bit scalar
    U64(u64),

    /// Signed 64-bit scalar
    I64(i64),

    /// IEEE 32-bit float scalar
    F32(f32),

    /// IEEE 64-bit float scalar
    F64(f64),

    /// 16-bit integer array (signed arrays are bit-reinterpreted)
    U16Array(Vec<u16>),

    /// 32-bit integer array (signed arrays are bit-reinterpreted)
    U32Array(Vec<u32>),

    /// 64-bit integer array (signed arrays are bit-reinterpreted)
    U64Array(Vec<u64>),

    /// 32-bit float array
    F32Array(Vec<f32>),

    /// 64-bit float array
    F64Array(Vec<f64>),

    /// BYTE/SBYTE array payload
    ByteArray(Bytes),

    /// Opaque payload (UNDEFINED or unrecognized wire types)
    Blob(Bytes),
}

impl TagValue {
    /// Whether this value is absent. Callers must not store unset values
    /// in a tag mapping.
    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, TagValue::Unset)
    }

    /// Best-effort coercion to an unsigned 16-bit code.
    ///
    /// Used by the compression resolver: integer scalars are range-checked,
    /// strings are parsed as integers, everything else is `None`.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            TagValue::U8(v) => Some(u16::from(*v)),
            TagValue::U16(v) => Some(*v),
            TagValue::U32(v) => u16::try_from(*v).ok(),
            TagValue::U64(v) => u16::try_from(*v).ok(),
            TagValue::I8(v) => u16::try_from(*v).ok(),
            TagValue::I16(v) => u16::try_from(*v).ok(),
            TagValue::I32(v) => u16::try_from(*v).ok(),
            TagValue::I64(v) => u16::try_from(*v).ok(),
            TagValue::Text(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        }
    }

    /// Best-effort coercion to a signed 32-bit integer.
    ///
    /// Integer scalars are range-checked, integer arrays yield their first
    /// element, strings are parsed as integers; everything else is `None`.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TagValue::U8(v) => Some(i32::from(*v)),
            TagValue::I8(v) => Some(i32::from(*v)),
            TagValue::U16(v) => Some(i32::from(*v)),
            TagValue::I16(v) => Some(i32::from(*v)),
            TagValue::U32(v) => i32::try_from(*v).ok(),
            TagValue::I32(v) => Some(*v),
            TagValue::U64(v) => i32::try_from(*v).ok(),
            TagValue::I64(v) => i32::try_from(*v).ok(),
            TagValue::U16Array(v) => v.first().map(|&x| i32::from(x)),
            TagValue::U32Array(v) => v.first().and_then(|&x| i32::try_from(x).ok()),
            TagValue::U64Array(v) => v.first().and_then(|&x| i32::try_from(x).ok()),
            TagValue::Text(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    /// String projection used by the tag accessors.
    ///
    /// Numeric arrays render their first 10 elements comma-joined with a
    /// trailing ",..." when truncated; byte payloads render as "[N bytes]";
    /// `Unset` renders empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Unset => Ok(()),
            TagValue::Text(s) => f.write_str(s),
            TagValue::U8(v) => write!(f, "{v}"),
            TagValue::I8(v) => write!(f, "{v}"),
            TagValue::U16(v) => write!(f, "{v}"),
            TagValue::I16(v) => write!(f, "{v}"),
            TagValue::U32(v) => write!(f, "{v}"),
            TagValue::I32(v) => write!(f, "{v}"),
            TagValue::U64(v) => write!(f, "{v}"),
            TagValue::I64(v) => write!(f, "{v}"),
            TagValue::F32(v) => write!(f, "{v}"),
            TagValue::F64(v) => write!(f, "{v}"),
            TagValue::U16Array(v) => write_capped(f, v),
            TagValue::U32Array(v) => write_capped(f, v),
            TagValue::U64Array(v) => write_capped(f, v),
            TagValue::F32Array(v) => write_capped(f, v),
            TagValue::F64Array(v) => write_capped(f, v),
            TagValue::ByteArray(b) | TagValue::Blob(b) => write!(f, "[{} bytes]", b.len()),
        }
    }
}

/// Write a comma-joined array capped at [`DISPLAY_ELEMENT_CAP`] elements.
fn write_capped<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, v) in values.iter().take(DISPLAY_ELEMENT_CAP).enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{v}")?;
    }
    if values.len() > DISPLAY_ELEMENT_CAP {
        f.write_str(",...")?;
    }
    Ok(())
}

// =============================================================================
// Decoder
// =============================================================================

/// Decode a tag payload into a [`TagValue`].
///
/// Total function: never fails and never reads past `buffer`. The wire type
/// is taken as the raw code so that unknown codes flow into the opaque
/// fallback path instead of erroring.
///
/// # Arguments
/// * `wire_type` - Raw TIFF wire-type code reported by the metadata port
/// * `value_count` - Element count reported by the metadata port
/// * `buffer` - Payload bytes (little-endian)
/// * `options` - Blob size limit knob
pub fn decode(
    wire_type: u16,
    value_count: usize,
    buffer: &[u8],
    options: &DecodeOptions,
) -> TagValue {
    let Some(wt) = WireType::from_u16(wire_type) else {
        return decode_opaque(value_count, buffer, options);
    };

    match wt {
        WireType::Ascii => decode_ascii(buffer),

        WireType::Byte => {
            if value_count == 1 {
                match buffer.first() {
                    Some(&b) => TagValue::U8(b),
                    None => TagValue::Unset,
                }
            } else {
                byte_array(buffer)
            }
        }

        WireType::SByte => {
            if value_count == 1 {
                match buffer.first() {
                    Some(&b) => TagValue::I8(b as i8),
                    None => TagValue::Unset,
                }
            } else {
                // Signed byte arrays reuse the unsigned byte representation
                byte_array(buffer)
            }
        }

        WireType::Short => int_value(value_count, buffer, 2, |v| TagValue::U16(v as u16)),
        WireType::SShort => int_value(value_count, buffer, 2, |v| TagValue::I16(v as u16 as i16)),
        WireType::Long => int_value(value_count, buffer, 4, |v| TagValue::U32(v as u32)),
        WireType::SLong => int_value(value_count, buffer, 4, |v| TagValue::I32(v as u32 as i32)),
        WireType::Long8 | WireType::Ifd8 => int_value(value_count, buffer, 8, TagValue::U64),
        WireType::SLong8 => int_value(value_count, buffer, 8, |v| TagValue::I64(v as i64)),

        WireType::Float => {
            if value_count == 1 {
                match read_exact::<4>(buffer) {
                    Some(b) => TagValue::F32(f32::from_le_bytes(b)),
                    None => TagValue::Unset,
                }
            } else {
                let values: Vec<f32> = chunks_exact::<4>(buffer, value_count)
                    .map(f32::from_le_bytes)
                    .collect();
                non_empty(values, TagValue::F32Array)
            }
        }

        WireType::Double => {
            if value_count == 1 {
                match read_exact::<8>(buffer) {
                    Some(b) => TagValue::F64(f64::from_le_bytes(b)),
                    None => TagValue::Unset,
                }
            } else {
                let values: Vec<f64> = chunks_exact::<8>(buffer, value_count)
                    .map(f64::from_le_bytes)
                    .collect();
                non_empty(values, TagValue::F64Array)
            }
        }

        WireType::Rational => decode_rational(value_count, buffer, false),
        WireType::SRational => decode_rational(value_count, buffer, true),

        WireType::Undefined => decode_opaque(value_count, buffer, options),
    }
}

/// ASCII payload: strip trailing NULs, empty result means absent.
fn decode_ascii(buffer: &[u8]) -> TagValue {
    let end = buffer
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    if end == 0 {
        return TagValue::Unset;
    }
    TagValue::Text(String::from_utf8_lossy(&buffer[..end]).into_owned())
}

/// BYTE/SBYTE array payload covering the whole buffer.
fn byte_array(buffer: &[u8]) -> TagValue {
    if buffer.is_empty() {
        TagValue::Unset
    } else {
        TagValue::ByteArray(Bytes::copy_from_slice(buffer))
    }
}

/// Integer decode shared by all widths.
///
/// Scalar when `value_count == 1` (via `scalar`, which reinterprets the
/// zero-extended value at the right width/signedness), unsigned array of
/// the matching width otherwise. The element walk is clamped to the buffer
/// so a lying `value_count` cannot cause an out-of-bounds read.
fn int_value(
    value_count: usize,
    buffer: &[u8],
    width: usize,
    scalar: impl Fn(u64) -> TagValue,
) -> TagValue {
    if value_count == 1 {
        if buffer.is_empty() {
            return TagValue::Unset;
        }
        return scalar(read_uint_le(&buffer[..buffer.len().min(width)]));
    }

    let count = value_count.min(buffer.len() / width);
    if count == 0 {
        return TagValue::Unset;
    }

    match width {
        2 => TagValue::U16Array(
            (0..count)
                .map(|i| u16::from_le_bytes([buffer[i * 2], buffer[i * 2 + 1]]))
                .collect(),
        ),
        4 => TagValue::U32Array(
            (0..count)
                .map(|i| read_uint_le(&buffer[i * 4..i * 4 + 4]) as u32)
                .collect(),
        ),
        _ => TagValue::U64Array(
            (0..count)
                .map(|i| read_uint_le(&buffer[i * 8..i * 8 + 8]))
                .collect(),
        ),
    }
}

/// RATIONAL/SRATIONAL payload: 8 bytes per element, rendered as "N/D"
/// ("N" when the denominator is 0), arrays joined with ", ".
fn decode_rational(value_count: usize, buffer: &[u8], signed: bool) -> TagValue {
    let count = value_count.min(buffer.len() / 8);
    if count == 0 {
        return TagValue::Unset;
    }

    let mut out = String::new();
    for i in 0..count {
        let base = i * 8;
        let num = read_uint_le(&buffer[base..base + 4]) as u32;
        let den = read_uint_le(&buffer[base + 4..base + 8]) as u32;
        if i > 0 {
            out.push_str(", ");
        }
        if signed {
            let (num, den) = (num as i32, den as i32);
            if den != 0 {
                out.push_str(&format!("{num}/{den}"));
            } else {
                out.push_str(&num.to_string());
            }
        } else if den != 0 {
            out.push_str(&format!("{num}/{den}"));
        } else {
            out.push_str(&num.to_string());
        }
    }
    TagValue::Text(out)
}

/// UNDEFINED or unrecognized payload.
///
/// Small single values are reinterpreted as an unsigned 64-bit integer and
/// stored as a decimal string; anything else becomes an opaque blob subject
/// to the configured size limit.
fn decode_opaque(value_count: usize, buffer: &[u8], options: &DecodeOptions) -> TagValue {
    if buffer.is_empty() {
        return TagValue::Unset;
    }

    if buffer.len() <= 8 && value_count == 1 {
        return TagValue::Text(read_uint_le(buffer).to_string());
    }

    let keep = if options.max_blob_bytes > 0 {
        buffer.len().min(options.max_blob_bytes)
    } else {
        buffer.len()
    };
    TagValue::Blob(Bytes::copy_from_slice(&buffer[..keep]))
}

/// Read up to 8 little-endian bytes as a zero-extended u64.
fn read_uint_le(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    let n = bytes.len().min(8);
    raw[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(raw)
}

/// Copy the first N bytes of a buffer, or `None` if it is too short.
fn read_exact<const N: usize>(buffer: &[u8]) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(buffer.get(..N)?);
    Some(out)
}

/// Iterate over up to `count` N-byte chunks of a buffer.
fn chunks_exact<const N: usize>(
    buffer: &[u8],
    count: usize,
) -> impl Iterator<Item = [u8; N]> + '_ {
    buffer.chunks_exact(N).take(count).map(|c| {
        let mut out = [0u8; N];
        out.copy_from_slice(c);
        out
    })
}

/// Wrap a vector in an array variant, or `Unset` when empty.
fn non_empty<T>(values: Vec<T>, variant: impl FnOnce(Vec<T>) -> TagValue) -> TagValue {
    if values.is_empty() {
        TagValue::Unset
    } else {
        variant(values)
    }
}

// =============================================================================
// Tests
// =============================================================================
