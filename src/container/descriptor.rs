//! Whole-container metadata descriptor.
//!
//! `SlideDescriptor` opens a file through an injected backend, walks its
//! resolution levels, and aggregates one `IfdDescriptor` per level that
//! survived the structural queries. Only the open call and the level-count
//! query are fatal; everything below level granularity degrades gracefully.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::MetadataPort;
use crate::error::ParseError;
use crate::tiff::{refine_codec, DecodeOptions, MetadataKind, CODEC_TIFF};

use super::builder::build_ifd;
use super::ifd::IfdDescriptor;

/// Vendor blob kinds checked during format detection, highest priority
/// first. The first kind present on the base level wins.
const VENDOR_PRIORITY: [MetadataKind; 5] = [
    MetadataKind::MedAperio,
    MetadataKind::MedPhilips,
    MetadataKind::MedLeica,
    MetadataKind::MedVentana,
    MetadataKind::MedTrestle,
];

/// Parsed structural metadata for one container file.
///
/// The descriptor exclusively owns its level data. Level handles held by
/// the per-level descriptors are views into the main container handle and
/// carry no release obligation; only the main handle is released, once,
/// on drop.
pub struct SlideDescriptor<B: MetadataPort> {
    backend: Arc<B>,
    path: PathBuf,
    container: Option<B::Container>,
    reported_level_count: u32,
    levels: Vec<IfdDescriptor<B::Level>>,
}

impl<B: MetadataPort> SlideDescriptor<B> {
    /// Open `path` and extract structural metadata for every readable level.
    ///
    /// Fails only if the backend cannot open the file or cannot report the
    /// level count. A level whose view or image-info query fails is logged
    /// and omitted; the remaining levels are still parsed.
    pub fn open(backend: Arc<B>, path: impl AsRef<Path>) -> Result<Self, ParseError> {
        Self::open_with(backend, path, &DecodeOptions::default())
    }

    /// Like [`Self::open`], with explicit decode options.
    pub fn open_with(
        backend: Arc<B>,
        path: impl AsRef<Path>,
        options: &DecodeOptions,
    ) -> Result<Self, ParseError> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.to_string_lossy().into_owned();

        let container = backend.open(&path)?;
        let reported_level_count = backend.level_count(&container)?;

        let mut levels = Vec::with_capacity(reported_level_count as usize);
        for index in 0..reported_level_count {
            let level = match backend.level_view(&container, index) {
                Ok(level) => level,
                Err(e) => {
                    warn!(level = index, error = %e, "skipping level: view query failed");
                    continue;
                }
            };
            let info = match backend.image_info(&level) {
                Ok(info) => info,
                Err(e) => {
                    warn!(level = index, error = %e, "skipping level: image info query failed");
                    continue;
                }
            };

            let mut ifd = build_ifd(backend.as_ref(), level, index, &info, &path, options);
            refine_codec(&mut ifd, &path_str);
            levels.push(ifd);
        }

        debug!(
            path = %path.display(),
            parsed = levels.len(),
            reported = reported_level_count,
            "opened container"
        );

        Ok(Self {
            backend,
            path,
            container: Some(container),
            reported_level_count,
            levels,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of levels that were successfully parsed. Strictly less than
    /// [`Self::reported_level_count`] when levels were skipped.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level count as reported by the backend, before any skips.
    pub fn reported_level_count(&self) -> u32 {
        self.reported_level_count
    }

    pub fn level(&self, index: usize) -> Option<&IfdDescriptor<B::Level>> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[IfdDescriptor<B::Level>] {
        &self.levels
    }

    /// Textual projection of a tag on one level. Empty string when the
    /// level or the tag is absent.
    pub fn tag(&self, level_index: usize, tag_name: &str) -> String {
        self.level(level_index)
            .map(|ifd| ifd.tag_string(tag_name))
            .unwrap_or_default()
    }

    /// SubfileType of one level, `-1` when absent or unparseable.
    pub fn subfile_type(&self, level_index: usize) -> i32 {
        self.level(level_index)
            .map(|ifd| ifd.subfile_type())
            .unwrap_or(-1)
    }

    /// Kind codes of all metadata attached to one level. The TIFF-tag kind
    /// comes first when any tags were extracted, followed by blob kinds in
    /// enumeration order.
    pub fn metadata_kinds(&self, level_index: usize) -> Vec<i32> {
        let Some(ifd) = self.level(level_index) else {
            return Vec::new();
        };

        let mut kinds = Vec::with_capacity(ifd.blobs.len() + 1);
        if !ifd.tags.is_empty() {
            kinds.push(MetadataKind::TiffTag.as_i32());
        }
        kinds.extend(ifd.blob_kinds());
        kinds
    }

    /// Display label for the container format, derived from the base level.
    pub fn detected_format(&self) -> String {
        detect_format(&self.levels)
    }
}

impl<B: MetadataPort> Drop for SlideDescriptor<B> {
    fn drop(&mut self) {
        // Level handles are views into the main handle and are never
        // released individually. The backend documents release as
        // idempotent and order-independent.
        if let Some(mut container) = self.container.take() {
            self.backend.release(&mut container);
        }
    }
}

/// Format detection over the parsed level sequence: vendor blob kinds on
/// the base level, highest priority first, then a generic fallback naming
/// the resolved codec.
fn detect_format<L>(levels: &[IfdDescriptor<L>]) -> String {
    let Some(base) = levels.first() else {
        return "Unknown".to_string();
    };

    for kind in VENDOR_PRIORITY {
        if base.blob(kind.as_i32()).is_some() {
            if let Some(label) = kind.vendor_label() {
                return label.to_string();
            }
        }
    }

    // A codec that still carries the container's opaque label was never
    // resolved to a pixel compression.
    if base.codec.is_empty() || base.codec == CODEC_TIFF {
        "Generic TIFF".to_string()
    } else {
        format!("Generic TIFF ({})", base.codec)
    }
}

// =============================================================================
// Tests
// =============================================================================
