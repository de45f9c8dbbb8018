//! Per-level descriptor population.
//!
//! The builder drives the metadata query port for one resolution level:
//! blob enumeration first, then the fixed structural tag list, each through
//! the port's two-phase size negotiation. Every failure below level
//! granularity is tolerated - a tag that cannot be fetched is simply
//! absent, and a level with no tags at all falls back to filename
//! heuristics for the compression code.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::backend::{LevelImageInfo, MetadataPort};
use crate::tiff::{decode, DecodeOptions, StructuralTag, TagValue};

use super::ifd::{IfdDescriptor, MetadataBlob};

/// File extensions of JPEG-compressed WSI formats, used when the backend
/// exposes no per-tag queries at all. Aperio SVS and Hamamatsu NDPI/VMS/VMU
/// store JPEG tiles in practice; this is a documented approximation, not a
/// guarantee.
const JPEG_WSI_EXTENSIONS: [&str; 4] = ["svs", "ndpi", "vms", "vmu"];

/// Populate a descriptor for one resolution level.
///
/// `level` is a view handle into the container; the returned descriptor
/// stores it without taking a release obligation. This function never
/// fails: metadata query errors degrade to absent tags/blobs.
pub(crate) fn build_ifd<B: MetadataPort>(
    backend: &B,
    level: B::Level,
    index: u32,
    info: &LevelImageInfo,
    path: &Path,
    options: &DecodeOptions,
) -> IfdDescriptor<B::Level> {
    let mut ifd = IfdDescriptor::new(index, info, level);

    collect_blobs(backend, &mut ifd);
    let extracted = collect_tags(backend, &mut ifd, options);

    if extracted == 0 {
        apply_extension_heuristic(&mut ifd, path);
    }

    // Mirror the description tag into the free-text field
    if ifd.image_description.is_none() {
        let description = ifd.tag_string(StructuralTag::ImageDescription.name());
        if !description.is_empty() {
            ifd.image_description = Some(description);
        }
    }

    debug!(
        level = index,
        tags = ifd.tags.len(),
        blobs = ifd.blobs.len(),
        "populated level descriptor"
    );

    ifd
}

/// Enumerate and store every metadata blob attached to the level.
///
/// Blob contents are stored opaquely; vendor-specific parsing is out of
/// scope here. An empty enumeration is a valid terminal result.
fn collect_blobs<B: MetadataPort>(backend: &B, ifd: &mut IfdDescriptor<B::Level>) {
    let probes = match backend.enumerate_blobs(&ifd.level) {
        Ok(probes) => probes,
        Err(e) => {
            debug!(level = ifd.index, error = %e, "blob enumeration failed");
            return;
        }
    };

    for (entry_index, probe) in probes.iter().enumerate() {
        if probe.buffer_size == 0 {
            continue;
        }

        let mut buf = vec![0u8; probe.buffer_size];
        let payload = match backend.fetch_blob(&ifd.level, entry_index, &mut buf) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(level = ifd.index, entry_index, error = %e, "blob fetch failed");
                continue;
            }
        };
        if payload.written == 0 {
            continue;
        }

        trace!(
            level = ifd.index,
            kind = payload.kind,
            format = payload.format,
            size = payload.written,
            "stored metadata blob"
        );
        buf.truncate(payload.written);
        ifd.insert_blob(
            payload.kind,
            MetadataBlob {
                format: payload.format,
                data: Bytes::from(buf),
            },
        );
    }
}

/// Query the fixed structural tag list and store every present value under
/// its symbolic name. Returns the number of tags extracted.
fn collect_tags<B: MetadataPort>(
    backend: &B,
    ifd: &mut IfdDescriptor<B::Level>,
    options: &DecodeOptions,
) -> usize {
    let mut extracted = 0;

    for tag in StructuralTag::ALL {
        // Phase 1: size probe. Absence is normal, not an error.
        let probe = match backend.probe_tag(&ifd.level, tag.id()) {
            Ok(Some(probe)) => probe,
            Ok(None) => continue,
            Err(e) => {
                debug!(level = ifd.index, tag = tag.name(), error = %e, "tag probe failed");
                continue;
            }
        };
        if probe.buffer_size == 0 {
            continue;
        }

        // Phase 2: fetch into a buffer of exactly the negotiated size.
        let mut buf = vec![0u8; probe.buffer_size];
        let payload = match backend.fetch_tag(&ifd.level, tag.id(), &mut buf) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(level = ifd.index, tag = tag.name(), error = %e, "tag fetch failed");
                continue;
            }
        };
        if payload.written == 0 {
            // Backend quirk: a tag can vanish between phases. Treat as
            // absent, no retry.
            continue;
        }

        let value = decode(
            payload.wire_type,
            payload.value_count,
            &buf[..payload.written.min(buf.len())],
            options,
        );
        if value.is_unset() {
            continue;
        }

        trace!(level = ifd.index, tag = tag.name(), value = %value, "extracted tag");
        ifd.tags.insert(tag.name(), value);
        extracted += 1;
    }

    extracted
}

/// Synthesize a Compression tag from the file extension when the backend
/// returned no tags at all (legacy backends without per-tag queries).
fn apply_extension_heuristic<L>(ifd: &mut IfdDescriptor<L>, path: &Path) {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return;
    };

    if JPEG_WSI_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
    {
        debug!(
            level = ifd.index,
            extension = ext,
            "no tags available, inferring JPEG compression from extension"
        );
        ifd.tags.insert(
            StructuralTag::Compression.name(),
            TagValue::U16(crate::tiff::compression::JPEG),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
