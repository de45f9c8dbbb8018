//! TIFF metadata vocabulary and decoding.
//!
//! This module carries the pure, I/O-free half of the core:
//!
//! - [`wire`] - wire-type vocabulary and element widths
//! - [`value`] - the [`TagValue`] sum type and the total tag decoder
//! - [`tags`] - the closed structural tag list and metadata kind codes
//! - [`codec`] - the per-level compression resolver

pub mod codec;
pub mod tags;
pub mod value;
pub mod wire;

pub use codec::{refine_codec, CODEC_JPEG, CODEC_JPEG2000, CODEC_TIFF};
pub use tags::{compression, MetadataKind, StructuralTag};
pub use value::{decode, DecodeOptions, TagValue};
pub use wire::WireType;
