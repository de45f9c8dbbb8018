use thiserror::Error;

/// Errors reported by the codec backend collaborator.
///
/// These cover the container-open interface and the metadata query port.
/// Backends report failures as numeric status codes; the variants here
/// preserve those codes for diagnostics without interpreting them.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend itself could not be initialized or is not present
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The container file could not be opened
    #[error("failed to open container {path} (status {status})")]
    Open { path: String, status: i32 },

    /// The per-file structural summary (level count) could not be read
    #[error("failed to read container structure (status {0})")]
    ContainerInfo(i32),

    /// A sub-stream view for a resolution level could not be created
    #[error("failed to create view for level {level} (status {status})")]
    LevelView { level: u32, status: i32 },

    /// The structural image info query for a level failed
    #[error("failed to read image info for level {level} (status {status})")]
    ImageInfo { level: u32, status: i32 },

    /// A metadata query (blob enumeration or per-tag fetch) failed
    #[error("metadata query failed (status {0})")]
    Metadata(i32),
}

/// Errors that can occur when parsing a whole-slide container.
///
/// Only container-open failures are fatal: a `SlideDescriptor` is either
/// fully constructed or not constructed at all. Per-level and per-tag
/// failures are handled internally (levels are skipped, tags are treated
/// as absent) and never surface through this type.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The backend could not open the file or report its structure
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}
