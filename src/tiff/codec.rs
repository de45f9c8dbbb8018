//! Pixel codec resolution for resolution levels.
//!
//! Containers report a generic codec label (e.g. "tiff") that names the
//! container format, not the pixel compression. The resolver refines that
//! label into the operative codec per level, so the downstream region
//! decoder picks the right backend path. Choosing wrong is costly: the
//! decode call either fails outright or corrupts pixels.
//!
//! Resolution is a priority-ordered chain of guarded rules evaluated until
//! one fires:
//!
//! 1. **Tag rule** - a decoded Compression tag, coerced to a u16 code
//! 2. **Filename rule** - `JP2K`/`jp2k` substring in the file path
//! 3. **Unresolved** - the label stays generic; logged, not an error
//!
//! The resolver never fails and is idempotent: it only applies while the
//! level's codec label is still the opaque container-format label. A codec
//! the backend already reported concretely is left alone.

use tracing::{debug, warn};

use super::tags::{compression, StructuralTag};
use crate::container::IfdDescriptor;

/// Opaque label TIFF-family containers report before refinement.
///
/// Names the container format, not a pixel compression; it is the only
/// label the resolver will rewrite.
pub const CODEC_TIFF: &str = "tiff";

/// Codec label for JPEG-compressed levels.
pub const CODEC_JPEG: &str = "jpeg";

/// Codec label for JPEG 2000-compressed levels.
pub const CODEC_JPEG2000: &str = "jpeg2000";

/// Outcome of one resolution rule.
enum RuleOutcome {
    /// Rule fired: set the codec label to this value
    Set(&'static str),

    /// Rule fired: the generic label already names the right path
    /// (uncompressed, LZW, Deflate are handled by the generic decoder)
    Keep,

    /// Rule did not apply; evaluate the next rule
    Continue,
}

/// Refine a level's codec label in place.
///
/// No-op unless the label is still the opaque container-format label: a
/// label already refined, or reported as a concrete codec by the backend
/// itself, is never rewritten. That also makes repeated calls safe.
pub fn refine_codec<L>(ifd: &mut IfdDescriptor<L>, file_path: &str) {
    if ifd.codec != CODEC_TIFF {
        return;
    }

    let rules: [fn(&IfdDescriptor<L>, &str) -> RuleOutcome; 2] = [tag_rule, filename_rule];

    for rule in rules {
        match rule(ifd, file_path) {
            RuleOutcome::Set(codec) => {
                debug!(level = ifd.index, codec, "resolved pixel codec");
                ifd.codec = codec.to_string();
                return;
            }
            RuleOutcome::Keep => {
                debug!(level = ifd.index, codec = %ifd.codec, "generic codec path confirmed");
                return;
            }
            RuleOutcome::Continue => {}
        }
    }

    if ifd.tags.is_empty() {
        // Downstream decoding may be limited to the generic fallback path
        warn!(
            level = ifd.index,
            file = file_path,
            "codec is generic and compression could not be inferred"
        );
    }
}

/// Rule 1: map the Compression tag (259) value to a codec.
fn tag_rule<L>(ifd: &IfdDescriptor<L>, _file_path: &str) -> RuleOutcome {
    let Some(value) = ifd.tag(StructuralTag::Compression.name()) else {
        return RuleOutcome::Continue;
    };
    let Some(code) = value.as_u16() else {
        return RuleOutcome::Continue;
    };

    match code {
        compression::NONE | compression::LZW => RuleOutcome::Keep,
        compression::DEFLATE | compression::DEFLATE_OLD => RuleOutcome::Keep,
        compression::JPEG => RuleOutcome::Set(CODEC_JPEG),
        compression::APERIO_JP2K_YCBCR | compression::APERIO_JP2K_RGB | compression::JPEG2000 => {
            RuleOutcome::Set(CODEC_JPEG2000)
        }
        _ => RuleOutcome::Continue,
    }
}

/// Rule 2: Aperio JPEG 2000 files conventionally carry "JP2K" in the name.
fn filename_rule<L>(_ifd: &IfdDescriptor<L>, file_path: &str) -> RuleOutcome {
    if file_path.contains("JP2K") || file_path.contains("jp2k") {
        RuleOutcome::Set(CODEC_JPEG2000)
    } else {
        RuleOutcome::Continue
    }
}

// =============================================================================
// Tests
// =============================================================================
