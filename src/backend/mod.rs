//! Backend collaborator interfaces.
//!
//! The metadata core never touches files or pixel data itself. Everything it
//! knows about a container comes through two narrow ports implemented by an
//! external codec backend (typically a process-wide singleton wrapping a
//! vendor SDK):
//!
//! - [`ContainerPort`] - opening a container, enumerating resolution levels,
//!   and reading per-level structural image info
//! - [`MetadataPort`] - querying TIFF tags and vendor metadata blobs for a
//!   level, using the backend's two-phase size-negotiation protocol
//!
//! # Two-Phase Size Negotiation
//!
//! The backend owns no buffers on behalf of the caller. Every metadata query
//! is therefore split into two calls:
//!
//! 1. A *probe* call with no buffer, which returns the required buffer size
//!    (and, for blob enumeration, the entry count).
//! 2. A *fetch* call with a caller-allocated buffer of exactly that size,
//!    which returns the decoded type code, element count, and payload.
//!
//! A fetch reporting 0 bytes written after a non-zero probe size means the
//! tag is absent. That is a known backend quirk, not an error, and callers
//! must discard the query result without retrying.
//!
//! # Handle Ownership
//!
//! Level handles obtained from [`ContainerPort::level_view`] are views into
//! the container handle: they are never released individually. Only the
//! container handle is released, through [`ContainerPort::release`], whose
//! contract is explicitly idempotent so that teardown ordering against the
//! backend's own process-wide state does not matter.

use std::path::Path;

use crate::error::BackendError;

// =============================================================================
// Structural Image Info
// =============================================================================

/// Per-level structural summary reported by the container backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelImageInfo {
    /// Level width in pixels
    pub width: u32,

    /// Level height in pixels
    pub height: u32,

    /// Number of channels (planes)
    pub channel_count: u32,

    /// Width of one sample element in bytes (1 for 8-bit data)
    pub element_byte_width: u32,

    /// Generic codec label for the level as reported by the container.
    ///
    /// For TIFF-family containers this names the container format (e.g.
    /// "tiff"), not the pixel compression; the compression resolver refines
    /// it after tag extraction.
    pub codec_name: String,
}

// =============================================================================
// Container Port
// =============================================================================

/// Container-open collaborator: file handles and structural queries.
///
/// Implementations wrap the backend SDK's container lifecycle. The
/// associated types are opaque to the core; it only threads them back into
/// the port's own methods.
pub trait ContainerPort {
    /// Handle to an opened container (main stream)
    type Container;

    /// Handle to one resolution level (sub-stream view into the container)
    type Level;

    /// Open a container file. This is the only fatal failure point during
    /// parsing: an error here means no descriptor is constructed.
    fn open(&self, path: &Path) -> Result<Self::Container, BackendError>;

    /// Number of resolution levels (IFDs) the container reports.
    fn level_count(&self, container: &Self::Container) -> Result<u32, BackendError>;

    /// Create a view handle for the level at `image_idx`.
    ///
    /// The returned handle is a view into `container`; the caller must not
    /// release it independently.
    fn level_view(&self, container: &Self::Container, image_idx: u32)
        -> Result<Self::Level, BackendError>;

    /// Read the structural image info for a level.
    fn image_info(&self, level: &Self::Level) -> Result<LevelImageInfo, BackendError>;

    /// Release a container handle.
    ///
    /// Must be safe to call zero or more times, in any order relative to
    /// sibling teardown calls, including after the backend's own
    /// process-wide state has been torn down.
    fn release(&self, container: &mut Self::Container);
}

// =============================================================================
// Metadata Port
// =============================================================================

/// Phase-1 result of a per-tag probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagProbe {
    /// TIFF wire-type code of the stored value
    pub wire_type: u16,

    /// Number of elements of that type
    pub value_count: usize,

    /// Required payload buffer size in bytes
    pub buffer_size: usize,
}

/// Phase-2 result of a per-tag fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPayload {
    /// TIFF wire-type code of the stored value
    pub wire_type: u16,

    /// Number of elements of that type
    pub value_count: usize,

    /// Bytes actually written into the caller's buffer.
    ///
    /// 0 after a non-zero probe size means "tag absent" (backend quirk).
    pub written: usize,
}

/// Phase-1 result of blob enumeration: one entry per attached blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobProbe {
    /// Metadata kind code (see [`crate::tiff::MetadataKind`])
    pub kind: i32,

    /// Backend-specific payload format code
    pub format: i32,

    /// Required payload buffer size in bytes
    pub buffer_size: usize,
}

/// Phase-2 result of a blob fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobPayload {
    /// Metadata kind code
    pub kind: i32,

    /// Backend-specific payload format code
    pub format: i32,

    /// Bytes actually written into the caller's buffer
    pub written: usize,
}

/// Metadata query port: per-tag queries and vendor blob enumeration.
///
/// Both operations follow the two-phase protocol described at the module
/// level. All payload bytes are little-endian, matching the backend's
/// decoded representation (not the container's on-disk byte order).
pub trait MetadataPort: ContainerPort {
    /// Phase 1 of blob enumeration: list every metadata blob attached to
    /// the level along with its required buffer size.
    ///
    /// An empty list is a valid terminal result, not a failure.
    fn enumerate_blobs(&self, level: &Self::Level) -> Result<Vec<BlobProbe>, BackendError>;

    /// Phase 2 of blob enumeration: copy the payload of entry
    /// `entry_index` (an index into the phase-1 list) into `buf`.
    fn fetch_blob(
        &self,
        level: &Self::Level,
        entry_index: usize,
        buf: &mut [u8],
    ) -> Result<BlobPayload, BackendError>;

    /// Phase 1 of a per-tag query: probe the size of tag `tag_id`.
    ///
    /// Returns `Ok(None)` if the tag does not exist on this level. That is
    /// normal and must not be logged as an error.
    fn probe_tag(
        &self,
        level: &Self::Level,
        tag_id: u16,
    ) -> Result<Option<TagProbe>, BackendError>;

    /// Phase 2 of a per-tag query: copy the payload of tag `tag_id` into
    /// `buf`, which the caller sized from the phase-1 probe.
    fn fetch_tag(
        &self,
        level: &Self::Level,
        tag_id: u16,
        buf: &mut [u8],
    ) -> Result<TagPayload, BackendError>;
}
