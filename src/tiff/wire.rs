//! TIFF wire-type definitions.
//!
//! Wire types determine how a tag's payload bytes are encoded. The set here
//! covers classic TIFF plus the 64-bit BigTIFF additions (LONG8, SLONG8,
//! IFD8), which is everything whole-slide containers use in practice.

// =============================================================================
// WireType
// =============================================================================

/// TIFF wire types that determine how tag values are encoded.
///
/// Each type has a fixed element width, which is needed to walk array
/// payloads without reading past the negotiated buffer size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum WireType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character (NUL-terminated strings)
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Unsigned rational: two LONGs (numerator, denominator)
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Signed rational: two SLONGs (numerator, denominator)
    SRational = 10,

    /// IEEE 32-bit float
    Float = 11,

    /// IEEE 64-bit float
    Double = 12,

    /// Unsigned 64-bit integer (BigTIFF)
    Long8 = 16,

    /// Signed 64-bit integer (BigTIFF)
    SLong8 = 17,

    /// 64-bit IFD offset (BigTIFF)
    Ifd8 = 18,
}

impl WireType {
    /// Size of a single element of this type in bytes.
    #[inline]
    pub const fn element_size(self) -> usize {
        match self {
            WireType::Byte | WireType::Ascii | WireType::SByte | WireType::Undefined => 1,
            WireType::Short | WireType::SShort => 2,
            WireType::Long | WireType::SLong | WireType::Float => 4,
            WireType::Rational | WireType::SRational => 8,
            WireType::Double | WireType::Long8 | WireType::SLong8 | WireType::Ifd8 => 8,
        }
    }

    /// Create a WireType from its numeric code.
    ///
    /// Returns `None` for unknown codes; the tag decoder degrades those to
    /// its opaque fallback representation rather than erroring.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(WireType::Byte),
            2 => Some(WireType::Ascii),
            3 => Some(WireType::Short),
            4 => Some(WireType::Long),
            5 => Some(WireType::Rational),
            6 => Some(WireType::SByte),
            7 => Some(WireType::Undefined),
            8 => Some(WireType::SShort),
            9 => Some(WireType::SLong),
            10 => Some(WireType::SRational),
            11 => Some(WireType::Float),
            12 => Some(WireType::Double),
            16 => Some(WireType::Long8),
            17 => Some(WireType::SLong8),
            18 => Some(WireType::Ifd8),
            _ => None,
        }
    }

    /// Get the numeric wire-type code.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// Tests
// =============================================================================
