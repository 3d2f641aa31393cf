//! Staging of the file exchange with the tool.
//!
//! The tool's interface is file-path-based, so sentences are serialized to a
//! uniquely named temporary input file and a second temporary file is
//! reserved for the tool to populate. Both are owned by a single extraction
//! call: dropping [`StagedFiles`] removes them on every exit path — clean
//! return, detected tool error, or error propagation mid-call. A
//! caller-supplied input file is never deleted.

use crate::error::MetaMapError;
use crate::types::ExtractionRequest;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// The transient input/output file pair for one extraction call.
pub struct StagedFiles {
    input: StagedInput,
    output: NamedTempFile,
}

enum StagedInput {
    /// Sentences serialized to a temp file we own and delete.
    Staged(NamedTempFile),
    /// Caller-supplied file, opened to verify readability and left in place.
    Caller(std::path::PathBuf),
}

impl StagedFiles {
    /// Stages the request's input and reserves the output file.
    ///
    /// With sentences, each line is the quoted representation of one
    /// sentence (or `'id'|'sentence'` when identifiers were supplied), fully
    /// flushed before this function returns so the child process observes a
    /// complete input. With a pre-built `filename`, the file is opened
    /// read-only to surface inaccessibility now rather than as a cryptic
    /// tool failure.
    ///
    /// # Errors
    ///
    /// Returns [`MetaMapError::Staging`] when a temp file cannot be created
    /// or written, or the caller-supplied file cannot be opened.
    pub fn stage(request: &ExtractionRequest) -> Result<Self, MetaMapError> {
        let temp_dir = request.options.temp_dir.as_deref();

        let input = if let Some(sentences) = &request.sentences {
            let mut file = new_temp(temp_dir, "mm-input-", "input")?;
            write_sentences(&mut file, sentences, request.ids.as_deref())?;
            StagedInput::Staged(file)
        } else if let Some(filename) = &request.filename {
            std::fs::File::open(filename).map_err(|source| MetaMapError::Staging {
                stage: "input",
                source,
            })?;
            StagedInput::Caller(filename.clone())
        } else {
            return Err(MetaMapError::AmbiguousInput);
        };

        let output = new_temp(temp_dir, "mm-output-", "output")?;
        tracing::debug!(
            input = %input_path_of(&input).display(),
            output = %output.path().display(),
            "staged file exchange"
        );

        Ok(Self { input, output })
    }

    /// Path the tool reads its input from.
    #[must_use]
    pub fn input_path(&self) -> &Path {
        input_path_of(&self.input)
    }

    /// Path the tool writes its output to.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        self.output.path()
    }
}

fn input_path_of(input: &StagedInput) -> &Path {
    match input {
        StagedInput::Staged(file) => file.path(),
        StagedInput::Caller(path) => path,
    }
}

fn new_temp(
    dir: Option<&Path>,
    prefix: &str,
    stage: &'static str,
) -> Result<NamedTempFile, MetaMapError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(prefix);
    match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|source| MetaMapError::Staging { stage, source })
}

fn write_sentences(
    file: &mut NamedTempFile,
    sentences: &[String],
    ids: Option<&[String]>,
) -> Result<(), MetaMapError> {
    let staging_err = |source| MetaMapError::Staging {
        stage: "input",
        source,
    };
    match ids {
        Some(ids) => {
            for (id, sentence) in ids.iter().zip(sentences) {
                writeln!(file, "{}|{}", quote(id), quote(sentence)).map_err(staging_err)?;
            }
        }
        None => {
            for sentence in sentences {
                writeln!(file, "{}", quote(sentence)).map_err(staging_err)?;
            }
        }
    }
    file.flush().map_err(staging_err)
}

/// Single-quoted representation of `text` with backslash escapes.
///
/// The escaping keeps every record on one physical line — an embedded
/// newline would otherwise split one sentence into two records on the
/// tool's side.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}
