//! Format detection and compression resolution tests.
//!
//! Tests verify:
//! - Vendor blob kinds map to fixed display labels, in priority order
//! - The generic fallback names the resolved codec
//! - Compression codes and filename substrings drive codec refinement

use std::sync::Arc;

use wsi_probe::{MetadataKind, SlideDescriptor};

use super::test_utils::{init_tracing, MockBackend, MockLevel};

const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_COMPRESSION: u16 = 259;

fn open(backend: MockBackend, path: &str) -> SlideDescriptor<MockBackend> {
    init_tracing();
    SlideDescriptor::open(Arc::new(backend), path).expect("open should succeed")
}

// =============================================================================
// Vendor Labels
// =============================================================================

#[test]
fn test_philips_label_regardless_of_codec() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(4096, 4096)
            .with_short_tag(TAG_COMPRESSION, &[7])
            .with_blob(MetadataKind::MedPhilips.as_i32(), 0, b"<DataObject/>"),
    );
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level(0).unwrap().codec, "jpeg");
    assert_eq!(slide.detected_format(), "Philips TIFF");
}

#[test]
fn test_aperio_label() {
    let backend = MockBackend::new().with_level(
        MockLevel::new(4096, 4096).with_blob(MetadataKind::MedAperio.as_i32(), 0, b"Aperio"),
    );
    let slide = open(backend, "slides/CMU-1.svs");

    assert_eq!(slide.detected_format(), "Aperio SVS");
}

#[test]
fn test_vendor_priority_over_enumeration_order() {
    // Philips enumerated before Aperio, but Aperio outranks it.
    let backend = MockBackend::new().with_level(
        MockLevel::new(4096, 4096)
            .with_blob(MetadataKind::MedPhilips.as_i32(), 0, b"<DataObject/>")
            .with_blob(MetadataKind::MedAperio.as_i32(), 0, b"Aperio"),
    );
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.detected_format(), "Aperio SVS");
}

#[test]
fn test_vendor_blob_on_upper_level_is_ignored() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096))
        .with_level(
            MockLevel::new(1024, 1024)
                .with_blob(MetadataKind::MedVentana.as_i32(), 0, b"ventana"),
        );
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.detected_format(), "Generic TIFF");
}

// =============================================================================
// Generic Fallback
// =============================================================================

#[test]
fn test_generic_tiff_with_resolved_codec() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[7]));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.detected_format(), "Generic TIFF (jpeg)");
}

#[test]
fn test_generic_tiff_when_codec_unresolved() {
    // LZW keeps the container's generic label.
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[5]));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level(0).unwrap().codec, "tiff");
    assert_eq!(slide.detected_format(), "Generic TIFF");
}

#[test]
fn test_unknown_when_no_levels_survive() {
    let backend = MockBackend::new().with_level(MockLevel::new(64, 64).failing_view());
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level_count(), 0);
    assert_eq!(slide.detected_format(), "Unknown");
}

// =============================================================================
// Compression Resolution
// =============================================================================

#[test]
fn test_aperio_jp2k_compression_codes() {
    for code in [33003u16, 33005, 34712] {
        let backend = MockBackend::new()
            .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[code]));
        let slide = open(backend, "scan.tif");
        assert_eq!(slide.level(0).unwrap().codec, "jpeg2000", "code {code}");
    }
}

#[test]
fn test_jp2k_filename_rule_without_compression_tag() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_IMAGE_WIDTH, &[4096]));
    let slide = open(backend, "exports/scan_JP2K.tif");

    assert_eq!(slide.level(0).unwrap().codec, "jpeg2000");
    assert_eq!(slide.detected_format(), "Generic TIFF (jpeg2000)");
}

#[test]
fn test_backend_reported_codec_survives_jp2k_path() {
    // When the backend reports a concrete per-level codec, no rule runs:
    // the filename marker must not rewrite it.
    let backend = MockBackend::new().with_level(MockLevel::new(4096, 4096).with_codec("jpeg"));
    let slide = open(backend, "exports/scan_JP2K.tif");

    assert_eq!(slide.level(0).unwrap().codec, "jpeg");
    assert_eq!(slide.detected_format(), "Generic TIFF (jpeg)");
}

#[test]
fn test_compression_resolved_per_level() {
    let backend = MockBackend::new()
        .with_level(MockLevel::new(4096, 4096).with_short_tag(TAG_COMPRESSION, &[7]))
        .with_level(MockLevel::new(1024, 1024).with_short_tag(TAG_COMPRESSION, &[33005]))
        .with_level(MockLevel::new(256, 256).with_short_tag(TAG_COMPRESSION, &[1]));
    let slide = open(backend, "scan.tif");

    assert_eq!(slide.level(0).unwrap().codec, "jpeg");
    assert_eq!(slide.level(1).unwrap().codec, "jpeg2000");
    assert_eq!(slide.level(2).unwrap().codec, "tiff");
}
