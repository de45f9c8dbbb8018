//! Structural tag and metadata kind vocabulary.
//!
//! The tag set here is a closed query list, not a discovery mechanism: the
//! IFD builder asks the backend for exactly these tags, by numeric ID, and
//! stores whatever comes back under the symbolic name. Tags outside this
//! list are ignored; vendor metadata travels separately as opaque blobs
//! keyed by [`MetadataKind`].

// =============================================================================
// Structural Tags
// =============================================================================

/// TIFF tags queried for every resolution level.
///
/// Covers image layout, compression, and the descriptive fields needed to
/// identify scanner vendors. The list is fixed; absence of any tag on a
/// level is normal and silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StructuralTag {
    /// Image type classification (0=full, 1=reduced resolution, ...)
    SubfileType = 254,

    /// Image width in pixels
    ImageWidth = 256,

    /// Image height (length) in pixels
    ImageLength = 257,

    /// Bits per sample
    BitsPerSample = 258,

    /// Compression scheme; drives codec resolution
    Compression = 259,

    /// Photometric interpretation (RGB, YCbCr, ...)
    Photometric = 262,

    /// Free-text description; carries vendor metadata in SVS files
    ImageDescription = 270,

    /// Scanner manufacturer
    Make = 271,

    /// Scanner model
    Model = 272,

    /// Number of components per pixel
    SamplesPerPixel = 277,

    /// Producing software
    Software = 305,

    /// Acquisition timestamp
    DateTime = 306,

    /// Width of each tile in pixels
    TileWidth = 322,

    /// Height of each tile in pixels
    TileLength = 323,

    /// SubIFD offsets (OME-TIFF and friends)
    SubIfd = 330,

    /// Sample format (unsigned/signed/float)
    SampleFormat = 339,

    /// Shared JPEG quantization/Huffman tables
    JpegTables = 347,
}

impl StructuralTag {
    /// Every tag in the query list, in query order.
    pub const ALL: [StructuralTag; 17] = [
        StructuralTag::SubfileType,
        StructuralTag::ImageWidth,
        StructuralTag::ImageLength,
        StructuralTag::BitsPerSample,
        StructuralTag::Compression,
        StructuralTag::Photometric,
        StructuralTag::ImageDescription,
        StructuralTag::Make,
        StructuralTag::Model,
        StructuralTag::SamplesPerPixel,
        StructuralTag::Software,
        StructuralTag::DateTime,
        StructuralTag::TileWidth,
        StructuralTag::TileLength,
        StructuralTag::SubIfd,
        StructuralTag::SampleFormat,
        StructuralTag::JpegTables,
    ];

    /// Numeric tag ID.
    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Symbolic name used as the key in the per-level tag mapping.
    pub const fn name(self) -> &'static str {
        match self {
            StructuralTag::SubfileType => "SUBFILETYPE",
            StructuralTag::ImageWidth => "IMAGEWIDTH",
            StructuralTag::ImageLength => "IMAGELENGTH",
            StructuralTag::BitsPerSample => "BITSPERSAMPLE",
            StructuralTag::Compression => "COMPRESSION",
            StructuralTag::Photometric => "PHOTOMETRIC",
            StructuralTag::ImageDescription => "IMAGEDESCRIPTION",
            StructuralTag::Make => "MAKE",
            StructuralTag::Model => "MODEL",
            StructuralTag::SamplesPerPixel => "SAMPLESPERPIXEL",
            StructuralTag::Software => "SOFTWARE",
            StructuralTag::DateTime => "DATETIME",
            StructuralTag::TileWidth => "TILEWIDTH",
            StructuralTag::TileLength => "TILELENGTH",
            StructuralTag::SubIfd => "SUBIFD",
            StructuralTag::SampleFormat => "SAMPLEFORMAT",
            StructuralTag::JpegTables => "JPEGTABLES",
        }
    }

    /// Create a StructuralTag from its numeric ID.
    ///
    /// Returns `None` for IDs outside the query list.
    pub fn from_id(id: u16) -> Option<Self> {
        StructuralTag::ALL.iter().copied().find(|t| t.id() == id)
    }
}

// =============================================================================
// Metadata Kinds
// =============================================================================

/// Kind codes for metadata blobs attached to a level.
///
/// The numeric values follow the backend's metadata enumeration; blobs with
/// kinds outside this list are stored under their raw code and ignored by
/// format detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MetadataKind {
    /// Unclassified metadata
    Unknown = 0,

    /// Standard numbered TIFF tags (synthesized entry, see
    /// [`crate::container::SlideDescriptor::metadata_kinds`])
    TiffTag = 1,

    /// ICC color profile
    IccProfile = 2,

    /// EXIF block
    Exif = 3,

    /// GeoTIFF block
    Geo = 4,

    /// Aperio (Leica Biosystems) slide metadata
    MedAperio = 5,

    /// Philips slide metadata
    MedPhilips = 6,

    /// Ventana (Roche) slide metadata
    MedVentana = 7,

    /// Leica SCN slide metadata
    MedLeica = 8,

    /// Trestle slide metadata
    MedTrestle = 9,
}

impl MetadataKind {
    /// Create a MetadataKind from its raw code.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(MetadataKind::Unknown),
            1 => Some(MetadataKind::TiffTag),
            2 => Some(MetadataKind::IccProfile),
            3 => Some(MetadataKind::Exif),
            4 => Some(MetadataKind::Geo),
            5 => Some(MetadataKind::MedAperio),
            6 => Some(MetadataKind::MedPhilips),
            7 => Some(MetadataKind::MedVentana),
            8 => Some(MetadataKind::MedLeica),
            9 => Some(MetadataKind::MedTrestle),
            _ => None,
        }
    }

    /// Raw kind code.
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Display label for vendor kinds, used by format detection.
    ///
    /// Returns `None` for non-vendor kinds.
    pub const fn vendor_label(self) -> Option<&'static str> {
        match self {
            MetadataKind::MedAperio => Some("Aperio SVS"),
            MetadataKind::MedPhilips => Some("Philips TIFF"),
            MetadataKind::MedLeica => Some("Leica SCN"),
            MetadataKind::MedVentana => Some("Ventana"),
            MetadataKind::MedTrestle => Some("Trestle"),
            _ => None,
        }
    }
}

// =============================================================================
// Compression Codes
// =============================================================================

/// TIFF Compression tag (259) values relevant to codec resolution.
pub mod compression {
    /// Uncompressed
    pub const NONE: u16 = 1;

    /// LZW
    pub const LZW: u16 = 5;

    /// JPEG (new-style)
    pub const JPEG: u16 = 7;

    /// Deflate (Adobe-style)
    pub const DEFLATE: u16 = 8;

    /// Deflate (old-style)
    pub const DEFLATE_OLD: u16 = 32946;

    /// Aperio JPEG 2000, YCbCr
    pub const APERIO_JP2K_YCBCR: u16 = 33003;

    /// Aperio JPEG 2000, RGB
    pub const APERIO_JP2K_RGB: u16 = 33005;

    /// JPEG 2000
    pub const JPEG2000: u16 = 34712;
}

// =============================================================================
// Tests
// =============================================================================
