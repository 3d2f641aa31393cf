//! Rust adapter for driving MetaMap as a subprocess.
//!
//! This crate turns a batch of sentences (or a pre-built input file) plus an
//! option bag into a MetaMap command-line invocation with a staged file
//! exchange, detects the tool's partial-failure signature in its stdout, and
//! decodes the fielded output file into typed concept records.

/// Command-line argument construction for MetaMap invocations.
pub mod cmd;
/// Discovery and resolution of the MetaMap executable path.
pub mod discovery;
/// Error types returned by adapter operations.
pub mod error;
/// Initialization and capability probing of a MetaMap install.
pub mod init;
/// Subprocess execution, failure classification, and output decoding.
pub mod process;
/// Input staging and guaranteed cleanup of the file exchange.
pub mod staging;
/// Shared data types for configuration, results, and capabilities.
pub mod types;

pub use discovery::{discover_metamap, METAMAP_BIN_ENV_VAR};
pub use error::MetaMapError;
pub use init::init;
pub use metamap_concepts::{Concept, ConceptAa, ConceptMmi, Corpus};
pub use process::{run_metamap, run_metamap_with, FailureClassifier, StdoutMarkerClassifier};
pub use types::*;

/// High-level client for a MetaMap install.
#[derive(Clone)]
pub struct MetaMapCli {
    /// Filesystem path to the `metamap` executable.
    pub path: std::path::PathBuf,
    /// Feature capabilities detected during initialization.
    pub capabilities: types::Capabilities,
}

impl MetaMapCli {
    /// Creates a new `MetaMapCli` from a resolved path and detected
    /// capabilities.
    #[must_use]
    pub const fn new(path: std::path::PathBuf, capabilities: types::Capabilities) -> Self {
        Self { path, capabilities }
    }

    /// Runs one extraction call and returns the decoded concepts.
    ///
    /// # Errors
    ///
    /// Returns [`MetaMapError`] for configuration errors (before any file is
    /// created) and for staging/spawn/read failures. A failure reported by
    /// the tool itself is returned in [`types::Extraction::error`], not as
    /// an `Err`.
    pub async fn extract_concepts(
        &self,
        request: &types::ExtractionRequest,
    ) -> Result<types::Extraction, MetaMapError> {
        run_metamap(&self.path, request).await
    }
}
