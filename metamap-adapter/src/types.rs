//! Shared data types for MetaMap adapter configuration and results.

use crate::error::MetaMapError;
use metamap_concepts::Concept;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Input file format announced to the tool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileFormat {
    /// Single-line-delimited input, one sentence per line.
    #[default]
    Sldi,
    /// Single-line-delimited input with a leading record identifier.
    SldiId,
}

impl FileFormat {
    /// The literal tag the tool recognizes for this format.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sldi => "sldi",
            Self::SldiId => "sldiID",
        }
    }
}

impl FromStr for FileFormat {
    type Err = MetaMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sldi" => Ok(Self::Sldi),
            "sldiID" => Ok(Self::SldiId),
            other => Err(MetaMapError::InvalidFileFormat(other.to_string())),
        }
    }
}

/// UMLS data version selector (`-V`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataVersion {
    /// The base data set.
    Base,
    /// The USAbase data set.
    UsaBase,
    /// The full NLM data set.
    Nlm,
}

impl DataVersion {
    /// The literal the tool expects after `-V`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::UsaBase => "USAbase",
            Self::Nlm => "NLM",
        }
    }
}

impl FromStr for DataVersion {
    type Err = MetaMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Base" => Ok(Self::Base),
            "USAbase" => Ok(Self::UsaBase),
            "NLM" => Ok(Self::Nlm),
            other => Err(MetaMapError::InvalidDataVersion(other.to_string())),
        }
    }
}

/// Option bag for a single extraction call.
///
/// All cross-field invariants are checked in one place,
/// [`ExtractionRequest::validate`], before any file is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Composite phrase depth (`-Q`).
    pub composite_phrase: u32,
    /// Input format tag announced via the selector flag.
    pub file_format: FileFormat,
    /// Word sense disambiguation (`-y`).
    pub word_sense_disambiguation: bool,
    /// Allow large N (`-l`).
    pub allow_large_n: bool,
    /// Suppress derivational variants (`-d`).
    pub no_derivational_variants: bool,
    /// Generate all derivational variants (`-D`).
    pub derivational_variants: bool,
    /// Ignore word order (`-i`).
    pub ignore_word_order: bool,
    /// Allow acronym/abbreviation variants (`-a`).
    pub allow_acronym_variants: bool,
    /// Unique acronym/abbreviation variants (`-u`).
    pub unique_acronym_variants: bool,
    /// Prefer multiple concepts (`-Y`).
    pub prefer_multiple_concepts: bool,
    /// Ignore stop phrases (`-K`).
    pub ignore_stop_phrases: bool,
    /// Compute all mappings (`-b`).
    pub compute_all_mappings: bool,
    /// UMLS data version (`-V`).
    pub mm_data_version: Option<DataVersion>,
    /// Candidate pruning threshold (`--prune`).
    pub max_prune: Option<u32>,
    /// UMLS sources to exclude (`-e`).
    pub exclude_sources: Option<Vec<String>>,
    /// UMLS sources to restrict to (`-R`).
    pub restrict_sources: Option<Vec<String>>,
    /// Semantic types to restrict to (`-J`).
    pub restrict_sts: Option<Vec<String>>,
    /// Semantic types to exclude (`-k`).
    pub exclude_sts: Option<Vec<String>>,
    /// Directory for staged files (useful for RAM-disk placement).
    /// `None` uses the platform temp directory.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            composite_phrase: 4,
            file_format: FileFormat::Sldi,
            word_sense_disambiguation: false,
            allow_large_n: false,
            no_derivational_variants: false,
            derivational_variants: false,
            ignore_word_order: false,
            allow_acronym_variants: false,
            unique_acronym_variants: false,
            prefer_multiple_concepts: false,
            ignore_stop_phrases: false,
            compute_all_mappings: false,
            mm_data_version: None,
            max_prune: None,
            exclude_sources: None,
            restrict_sources: None,
            restrict_sts: None,
            exclude_sts: None,
            temp_dir: None,
        }
    }
}

/// The full set of inputs to one extraction call.
///
/// Exactly one of `sentences` / `filename` must be present; `ids`, when
/// supplied, pairs one identifier with each sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    /// Sentences to stage into a fresh input file.
    pub sentences: Option<Vec<String>>,
    /// Record identifiers, one per sentence.
    pub ids: Option<Vec<String>>,
    /// Pre-built input file to read instead of staging sentences.
    pub filename: Option<PathBuf>,
    /// Tool options for this call.
    pub options: ExtractOptions,
}

impl ExtractionRequest {
    /// Builds a request staging the given sentences.
    #[must_use]
    pub fn from_sentences(sentences: Vec<String>) -> Self {
        Self {
            sentences: Some(sentences),
            ..Self::default()
        }
    }

    /// Builds a request reading from a pre-built input file.
    #[must_use]
    pub fn from_file(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    /// Checks every cross-field invariant, before any filesystem access.
    ///
    /// # Errors
    ///
    /// Returns the configuration-error variant naming the violated
    /// invariant: conflicting acronym options, sentences/filename
    /// exclusivity, or an id count that does not match the sentence count.
    pub fn validate(&self) -> Result<(), MetaMapError> {
        if self.options.allow_acronym_variants && self.options.unique_acronym_variants {
            return Err(MetaMapError::ConflictingAcronymOptions);
        }
        if self.sentences.is_some() == self.filename.is_some() {
            return Err(MetaMapError::AmbiguousInput);
        }
        if let (Some(ids), Some(sentences)) = (&self.ids, &self.sentences) {
            if ids.len() != sentences.len() {
                return Err(MetaMapError::IdCountMismatch {
                    ids: ids.len(),
                    sentences: sentences.len(),
                });
            }
        }
        Ok(())
    }

    /// Whether the identifier-bearing selector flag applies: identifiers were
    /// supplied, or the caller asked for the id-bearing format while reading
    /// from a pre-built file.
    #[must_use]
    pub fn wants_id_format(&self) -> bool {
        self.ids.is_some()
            || (self.options.file_format == FileFormat::SldiId && self.sentences.is_none())
    }
}

/// Result of a completed extraction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Concepts decoded from the staged output file, in output order.
    pub concepts: Vec<Concept>,
    /// Right-trimmed stdout text when the tool reported a failure, `None` on
    /// a clean run. Partial concepts are returned either way.
    pub error: Option<String>,
    /// Process exit code (`-1` if unavailable).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Individual extended flag the installed tool may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// The `--sldi` / `--sldiID` input formats.
    SldiFormats,
    /// Word sense disambiguation.
    WordSenseDisambiguation,
    /// The `--prune` candidate threshold.
    Prune,
    /// Source restriction/exclusion lists.
    SourceFilters,
    /// Semantic-type restriction/exclusion lists.
    SemanticTypeFilters,
}

/// Set of features detected from the tool's help text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Features present in this install.
    pub features: BTreeSet<Feature>,
}

impl Capabilities {
    /// Returns `true` if the given feature is supported.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// Report produced by the initialization sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitReport {
    /// Resolved path to the tool executable.
    pub metamap_path: PathBuf,
    /// Banner line reported by the tool's help output.
    pub version: String,
    /// Detected capabilities.
    pub capabilities: Capabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_acronym_options_rejected() {
        let request = ExtractionRequest {
            sentences: Some(vec!["fever".to_string()]),
            options: ExtractOptions {
                allow_acronym_variants: true,
                unique_acronym_variants: true,
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(MetaMapError::ConflictingAcronymOptions)
        ));
    }

    #[test]
    fn neither_sentences_nor_filename_rejected() {
        let request = ExtractionRequest::default();
        assert!(matches!(
            request.validate(),
            Err(MetaMapError::AmbiguousInput)
        ));
    }

    #[test]
    fn both_sentences_and_filename_rejected() {
        let request = ExtractionRequest {
            sentences: Some(vec!["fever".to_string()]),
            filename: Some(PathBuf::from("/tmp/input.sldi")),
            ..ExtractionRequest::default()
        };
        assert!(matches!(
            request.validate(),
            Err(MetaMapError::AmbiguousInput)
        ));
    }

    #[test]
    fn id_count_must_match_sentence_count() {
        let request = ExtractionRequest {
            ids: Some(vec!["p1".to_string()]),
            ..ExtractionRequest::from_sentences(vec!["fever".to_string(), "cough".to_string()])
        };
        assert!(matches!(
            request.validate(),
            Err(MetaMapError::IdCountMismatch {
                ids: 1,
                sentences: 2
            })
        ));
    }

    #[test]
    fn sentence_request_with_matching_ids_is_valid() {
        let request = ExtractionRequest {
            ids: Some(vec!["p1".to_string()]),
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn file_format_tags_round_trip() {
        assert_eq!("sldi".parse::<FileFormat>().unwrap(), FileFormat::Sldi);
        assert_eq!("sldiID".parse::<FileFormat>().unwrap(), FileFormat::SldiId);
        assert!(matches!(
            "mmi".parse::<FileFormat>(),
            Err(MetaMapError::InvalidFileFormat(_))
        ));
    }

    #[test]
    fn data_version_literals_round_trip() {
        for (tag, version) in [
            ("Base", DataVersion::Base),
            ("USAbase", DataVersion::UsaBase),
            ("NLM", DataVersion::Nlm),
        ] {
            assert_eq!(tag.parse::<DataVersion>().unwrap(), version);
            assert_eq!(version.tag(), tag);
        }
        assert!(matches!(
            "2020AA".parse::<DataVersion>(),
            Err(MetaMapError::InvalidDataVersion(_))
        ));
    }

    #[test]
    fn id_format_selection() {
        let with_ids = ExtractionRequest {
            ids: Some(vec!["p1".to_string()]),
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        assert!(with_ids.wants_id_format());

        let plain = ExtractionRequest::from_sentences(vec!["fever".to_string()]);
        assert!(!plain.wants_id_format());

        let mut prebuilt = ExtractionRequest::from_file("/tmp/input.sldiID");
        prebuilt.options.file_format = FileFormat::SldiId;
        assert!(prebuilt.wants_id_format());

        // The id-bearing tag on staged sentences without ids stays plain.
        let mut staged = ExtractionRequest::from_sentences(vec!["fever".to_string()]);
        staged.options.file_format = FileFormat::SldiId;
        assert!(!staged.wants_id_format());
    }
}
