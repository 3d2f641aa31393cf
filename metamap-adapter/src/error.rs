use thiserror::Error;

/// Errors returned by adapter operations.
///
/// Configuration errors (the validation variants) are reported before any
/// file is created; tool-reported errors never appear here — they travel in
/// [`crate::types::Extraction::error`] alongside whatever partial concepts
/// were decoded.
#[derive(Debug, Error)]
pub enum MetaMapError {
    #[error("MetaMap executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Failed to check version: {0}")]
    VersionCheckFailed(String),

    #[error("allow_acronym_variants and unique_acronym_variants are mutually exclusive")]
    ConflictingAcronymOptions,

    #[error("exactly one of sentences or filename must be supplied")]
    AmbiguousInput,

    #[error("file_format must be sldi or sldiID, got {0:?}")]
    InvalidFileFormat(String),

    #[error("mm_data_version must be Base, USAbase, or NLM, got {0:?}")]
    InvalidDataVersion(String),

    #[error("got {ids} ids for {sentences} sentences")]
    IdCountMismatch { ids: usize, sentences: usize },

    #[error("Failed to stage {stage} file: {source}")]
    Staging {
        stage: &'static str,
        source: std::io::Error,
    },

    #[error("Failed to spawn process: {0}")]
    SpawnFailed(std::io::Error),

    #[error("Failed to capture child stdout")]
    NoStdout,

    #[error("Failed to capture child stderr")]
    NoStderr,

    #[error("Failed to read staged output: {0}")]
    OutputRead(std::io::Error),
}
