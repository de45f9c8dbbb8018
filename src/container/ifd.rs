//! Per-level (IFD) metadata descriptor.
//!
//! One [`IfdDescriptor`] models a single resolution level of a whole-slide
//! container: its structural dimensions, the decoded tag mapping, the
//! vendor metadata blobs, and the codec label. Descriptors are populated
//! once during container parsing and are immutable afterwards, except for
//! the codec-label refinement performed by the compression resolver.

use std::collections::HashMap;

use bytes::Bytes;

use crate::backend::LevelImageInfo;
use crate::tiff::TagValue;

// =============================================================================
// MetadataBlob
// =============================================================================

/// An opaque vendor or standard metadata block attached to a level.
///
/// The payload is stored verbatim; interpreting vendor formats is out of
/// scope for the metadata core.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataBlob {
    /// Backend-specific payload format code
    pub format: i32,

    /// Raw payload bytes
    pub data: Bytes,
}

// =============================================================================
// IfdDescriptor
// =============================================================================

/// Metadata for one resolution level of a container.
///
/// The type parameter `L` is the backend's level handle. The descriptor
/// holds it as a view into the container's main handle: it is never
/// released here, because the backend may tie sub-stream lifetime to its
/// own instance rather than to this descriptor. Only the owning
/// [`crate::container::SlideDescriptor`] releases the main handle.
#[derive(Debug, Clone)]
pub struct IfdDescriptor<L> {
    /// Zero-based level index (`image_idx` as reported by the container)
    pub index: u32,

    /// Level width in pixels
    pub width: u32,

    /// Level height in pixels
    pub height: u32,

    /// Number of channels
    pub channel_count: u32,

    /// Bits per sample (element byte width x 8)
    pub bits_per_sample: u32,

    /// Operative codec label for this level.
    ///
    /// Starts as the container's generic codec name and is refined by the
    /// compression resolver once tags are extracted.
    pub codec: String,

    /// The codec label the container reported for this level, kept as-is
    /// after `codec` has been refined.
    pub generic_codec: String,

    /// Decoded structural tags, keyed by symbolic name
    pub tags: HashMap<&'static str, TagValue>,

    /// Metadata blobs keyed by kind code, in enumeration order
    pub blobs: Vec<(i32, MetadataBlob)>,

    /// Free-text image description (tag 270), when present
    pub image_description: Option<String>,

    /// View handle for this level's sub-stream (never released here)
    pub level: L,
}

impl<L> IfdDescriptor<L> {
    /// Create an empty descriptor from the backend's structural summary.
    pub fn new(index: u32, info: &LevelImageInfo, level: L) -> Self {
        Self {
            index,
            width: info.width,
            height: info.height,
            channel_count: info.channel_count,
            bits_per_sample: info.element_byte_width * 8,
            codec: info.codec_name.clone(),
            generic_codec: info.codec_name.clone(),
            tags: HashMap::new(),
            blobs: Vec::new(),
            image_description: None,
            level,
        }
    }

    /// Look up a decoded tag by its symbolic name.
    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    /// String projection of a tag, empty when absent.
    pub fn tag_string(&self, name: &str) -> String {
        self.tags.get(name).map(|v| v.to_string()).unwrap_or_default()
    }

    /// SubfileType (tag 254) as an integer, -1 when absent or uncoercible.
    pub fn subfile_type(&self) -> i32 {
        self.tag("SUBFILETYPE")
            .and_then(|v| v.as_i32())
            .unwrap_or(-1)
    }

    /// Store a blob under its kind code, replacing any existing entry for
    /// the same kind (kinds are unique within a level).
    pub fn insert_blob(&mut self, kind: i32, blob: MetadataBlob) {
        if let Some(existing) = self.blobs.iter_mut().find(|(k, _)| *k == kind) {
            existing.1 = blob;
        } else {
            self.blobs.push((kind, blob));
        }
    }

    /// Look up a blob by kind code.
    pub fn blob(&self, kind: i32) -> Option<&MetadataBlob> {
        self.blobs.iter().find(|(k, _)| *k == kind).map(|(_, b)| b)
    }

    /// Blob kind codes in enumeration order.
    pub fn blob_kinds(&self) -> impl Iterator<Item = i32> + '_ {
        self.blobs.iter().map(|(k, _)| *k)
    }
}

// =============================================================================
// Tests
// =============================================================================
