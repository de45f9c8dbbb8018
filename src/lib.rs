//! # WSI Probe
//!
//! Structural metadata extraction for TIFF-family Whole Slide Images (WSI).
//!
//! This library walks the resolution levels of a pyramidal container through
//! an injected backend, decodes a fixed list of structural TIFF tags into
//! typed values, collects vendor metadata blobs, and resolves the pixel
//! compression codec per level. It reads metadata only; pixel decoding is
//! out of scope.
//!
//! ## Features
//!
//! - **Total tag decoding**: every wire type / count / buffer combination
//!   maps to a defined [`TagValue`], never a panic
//! - **Two-phase size negotiation**: caller-allocated buffers sized from a
//!   prior probe, matching backends that cannot allocate on your behalf
//! - **Codec resolution**: priority-ordered rules refine the container's
//!   generic label into the actual pixel compression
//! - **Format detection**: vendor blob kinds (Aperio, Philips, Leica,
//!   Ventana, Trestle) mapped to display labels
//! - **Graceful degradation**: only file open is fatal; broken levels are
//!   skipped and missing tags are simply absent
//!
//! ## Architecture
//!
//! - [`backend`] - the container and metadata query ports a backend implements
//! - [`tiff`] - wire types, tag decoding, structural tags, codec resolution
//! - [`container`] - per-level descriptors and the whole-file descriptor
//! - [`error`] - error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wsi_probe::SlideDescriptor;
//! # use wsi_probe::backend::MetadataPort;
//! # fn open<B: MetadataPort>(backend: Arc<B>) -> Result<(), wsi_probe::ParseError> {
//! let slide = SlideDescriptor::open(backend, "slides/CMU-1.svs")?;
//! println!("format: {}", slide.detected_format());
//! println!("levels: {} of {}", slide.level_count(), slide.reported_level_count());
//! for ifd in slide.levels() {
//!     println!("level {}: {}x{} {}", ifd.index, ifd.width, ifd.height, ifd.codec);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod container;
pub mod error;
pub mod tiff;

// Re-export commonly used types
pub use backend::{
    BlobPayload, BlobProbe, ContainerPort, LevelImageInfo, MetadataPort, TagPayload, TagProbe,
};
pub use container::{IfdDescriptor, MetadataBlob, SlideDescriptor};
pub use error::{BackendError, ParseError};
pub use tiff::{
    compression, decode, refine_codec, DecodeOptions, MetadataKind, StructuralTag, TagValue,
    WireType, CODEC_JPEG, CODEC_JPEG2000, CODEC_TIFF,
};
