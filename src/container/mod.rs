//! Container-level aggregation: per-level descriptors, the builder that
//! populates them, and the whole-file descriptor with format detection.

mod builder;
mod descriptor;
mod ifd;

pub use descriptor::SlideDescriptor;
pub use ifd::{IfdDescriptor, MetadataBlob};
