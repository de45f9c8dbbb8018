//! End-to-end parsing tests over the mock backend.
//!
//! Tests verify:
//! - Tag extraction and textual projection through the two-phase protocol
//! - Per-level skip and per-tag absence semantics
//! - The filename-based compression heuristic for tagless backends
//! - Container handle release on drop

use std::sync::Arc;

use wsi_probe::{MetadataKind, SlideDescriptor, TagValue};

use super::test_utils::{init_tracing, MockBackend, MockLevel};

const TAG_SUBFILE_TYPE: u16 = 254;
const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_IMAGE_DESCRIPTION: u16 = 270;

fn open(backend: MockBackend, path: &str) -> SlideDescriptor<MockBackend> {
    init_tracing();
    SlideDescriptor::open(Arc::new(backend), path).expect("open should succeed")
}

// =============================================================================
// Tag Extraction
// =============================================================================

#[test]
fn test_short_scalar_tag() {
    let backend =
        MockBackend::new().with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[7]));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level_count(), 1);
    assert_eq!(
        slide.level(0).unwrap().tag("COMPRESSION"),
        Some(&TagValue::U16(7))
    );
    assert_eq!(slide.tag(0, "COMPRESSION"), "7");
}

#[test]
fn test_short_array_tag() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_BITS_PER_SAMPLE, &[8, 8, 8]));
    let slide = open(backend, "scan.tif");

    assert_eq!(
        slide.level(0).unwrap().tag("BITSPERSAMPLE"),
        Some(&TagValue::U16Array(vec![8, 8, 8]))
    );
    assert_eq!(slide.tag(0, "BITSPERSAMPLE"), "8,8,8");
}

#[test]
fn test_ascii_tag_strips_terminator() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(4096, 4096).with_ascii_tag(TAG_IMAGE_DESCRIPTION, "Aperio Leica Biosystems"),
    );
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.tag(0, "IMAGEDESCRIPTION"), "Aperio Leica Biosystems");
    assert_eq!(
        slide.level(0).unwrap().image_description.as_deref(),
        Some("Aperio Leica Biosystems")
    );
}

#[test]
fn test_absent_tag_projects_empty_string() {
    let backend = MockBackend::new().with_level(MockLevel::new(64, 64));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.tag(0, "SOFTWARE"), "");
    assert_eq!(slide.tag(99, "SOFTWARE"), "");
}

#[test]
fn test_subfile_type() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_long_tag(TAG_SUBFILE_TYPE, &[1]))
        .with_level(MockLevel::new(64, 64));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.subfile_type(0), 1);
    // Absent tag and out-of-range level both fall back to -1.
    assert_eq!(slide.subfile_type(1), -1);
    assert_eq!(slide.subfile_type(99), -1);
}

#[test]
fn test_structural_fields_from_image_info() {
    let backend = MockBackend::new().with_level(MockLevel::new(1920, 1080));
    let slide = open(backend, "scan.tif");

    let ifd = slide.level(0).unwrap();
    assert_eq!(ifd.width, 1920);
    assert_eq!(ifd.height, 1080);
    assert_eq!(ifd.channel_count, 3);
    assert_eq!(ifd.bits_per_sample, 8);
}

// =============================================================================
// Two-Phase Protocol Contract
// =============================================================================

#[test]
fn test_probe_precedes_fetch_with_exact_buffer() {
    let backend =
        MockBackend::new().with_level(MockLevel::new(64, 64).with_short_tag(TAG_COMPRESSION, &[7]));
    let backend = Arc::new(backend);
    let _slide = SlideDescriptor::open(backend.clone(), "scan.tif").unwrap();

    let calls = backend.calls();
    let probe_pos = calls
        .iter()
        .position(|c| c == &format!("probe_tag:0:{TAG_COMPRESSION}"))
        .expect("compression tag should be probed");
    // Fetch buffer is sized exactly from the probe (one SHORT = 2 bytes).
    let fetch_pos = calls
        .iter()
        .position(|c| c == &format!("fetch_tag:0:{TAG_COMPRESSION}:2"))
        .expect("compression tag should be fetched with a 2-byte buffer");
    assert!(probe_pos < fetch_pos);
}

#[test]
fn test_vanishing_tag_treated_as_absent_without_retry() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(64, 64)
            .with_short_tag(TAG_IMAGE_WIDTH, &[64])
            .with_vanishing_tag(TAG_COMPRESSION, 3, 2),
    );
    let backend = Arc::new(backend);
    let slide = SlideDescriptor::open(backend.clone(), "scan.tif").unwrap();

    assert!(slide.level(0).unwrap().tag("COMPRESSION").is_none());
    assert_eq!(slide.tag(0, "COMPRESSION"), "");

    let fetches = backend
        .calls()
        .iter()
        .filter(|c| c.starts_with(&format!("fetch_tag:0:{TAG_COMPRESSION}")))
        .count();
    assert_eq!(fetches, 1, "a vanished tag must not be retried");
}

// =============================================================================
// Tolerated Failures
// =============================================================================

#[test]
fn test_failed_level_is_skipped() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[7]))
        .with_level(MockLevel::new(1024, 1024).failing_view())
        .with_level(MockLevel::new(256, 256));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.reported_level_count(), 3);
    assert_eq!(slide.level_count(), 2);
    assert!(slide.level_count() < slide.reported_level_count() as usize);
    // Surviving levels keep their original indices.
    assert_eq!(slide.level(0).unwrap().index, 0);
    assert_eq!(slide.level(1).unwrap().index, 2);
}

#[test]
fn test_failed_image_info_skips_level() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096))
        .with_level(MockLevel::new(1024, 1024).failing_info());
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level_count(), 1);
}

#[test]
fn test_open_failure_is_fatal() {
    let result = SlideDescriptor::open(Arc::new(MockBackend::new().failing_open()), "missing.tif");
    assert!(result.is_err());
}

#[test]
fn test_level_count_failure_is_fatal() {
    let result = SlideDescriptor::open(
        Arc::new(MockBackend::new().failing_level_count()),
        "scan.tif",
    );
    assert!(result.is_err());
}

// =============================================================================
// Filename Heuristic for Tagless Backends
// =============================================================================

#[test]
fn test_svs_without_tags_infers_jpeg_compression() {
    let backend = MockBackend::new().with_level(MockLevel::new(4096, 4096));
    let slide = open(backend, "slides/CMU-1.svs");

    let ifd = slide.level(0).unwrap();
    assert_eq!(ifd.tag("COMPRESSION"), Some(&TagValue::U16(7)));
    assert_eq!(ifd.codec, "jpeg");
}

#[test]
fn test_svs_with_tags_keeps_reported_compression() {
    // The extension heuristic only applies when no tags came back at all.
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[33005]));
    let slide = open(backend, "slides/CMU-1.svs");

    let ifd = slide.level(0).unwrap();
    assert_eq!(ifd.tag("COMPRESSION"), Some(&TagValue::U16(33005)));
    assert_eq!(ifd.codec, "jpeg2000");
}

// =============================================================================
// Metadata Kinds and Blobs
// =============================================================================

#[test]
fn test_metadata_kinds_order() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(4096, 4096)
            .with_short_tag(TAG_COMPRESSION, &[7])
            .with_short_tag(TAG_IMAGE_WIDTH, &[4096])
            .with_long_tag(TAG_SUBFILE_TYPE, &[0])
            .with_blob(MetadataKind::MedAperio.as_i32(), 0, b"aperio header")
            .with_blob(MetadataKind::MedPhilips.as_i32(), 1, b"<philips/>"),
    );
    let slide = open(backend, "scan.tif");

    // TIFF-tag kind first, then blob kinds in enumeration order.
    assert_eq!(slide.metadata_kinds(0), vec![1, 5, 6]);
}

#[test]
fn test_metadata_kinds_without_tags() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(64, 64).with_blob(MetadataKind::MedLeica.as_i32(), 0, b"<scn/>"),
    );
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.metadata_kinds(0), vec![MetadataKind::MedLeica.as_i32()]);
    assert_eq!(slide.metadata_kinds(42), Vec::<i32>::new());
}

#[test]
fn test_blob_payload_is_preserved() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(64, 64).with_blob(MetadataKind::IccProfile.as_i32(), 2, b"icc-bytes"),
    );
    let slide = open(backend, "scan.tif");

    let blob = slide
        .level(0)
        .unwrap()
        .blob(MetadataKind::IccProfile.as_i32())
        .expect("blob should be stored");
    assert_eq!(blob.format, 2);
    assert_eq!(blob.data.as_ref(), b"icc-bytes");
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_container_released_once_on_drop() {
    let backend = Arc::new(MockBackend::new().with_level(MockLevel::new(64, 64)));
    let slide = SlideDescriptor::open(backend.clone(), "scan.tif").unwrap();

    assert_eq!(backend.release_count(), 0);
    drop(slide);
    assert_eq!(backend.release_count(), 1);
}
