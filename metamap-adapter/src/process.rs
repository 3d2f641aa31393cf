//! Subprocess execution, failure classification, and output decoding.

use crate::error::MetaMapError;
use crate::staging::StagedFiles;
use crate::types::{Extraction, ExtractionRequest};
use metamap_concepts::Corpus;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Decides whether a finished run failed, from its captured stdout.
///
/// The stock implementation is a substring heuristic; putting it behind a
/// trait lets a structured signal (exit codes, sentinel files) replace the
/// heuristic without touching the invocation logic.
pub trait FailureClassifier {
    /// Returns the error payload when the run failed, `None` on a clean run.
    fn classify(&self, stdout: &str) -> Option<String>;
}

/// The tool's own failure signature: the literal `ERROR` somewhere in its
/// stdout. On a hit the whole captured text, right-trimmed, becomes the
/// error payload.
#[derive(Debug, Clone)]
pub struct StdoutMarkerClassifier {
    marker: &'static str,
}

impl Default for StdoutMarkerClassifier {
    fn default() -> Self {
        Self { marker: "ERROR" }
    }
}

impl FailureClassifier for StdoutMarkerClassifier {
    fn classify(&self, stdout: &str) -> Option<String> {
        stdout
            .contains(self.marker)
            .then(|| stdout.trim_end().to_string())
    }
}

/// Runs one extraction call with the stock failure classifier.
///
/// Validates the request, stages the file exchange, invokes the tool, and
/// decodes the staged output into concepts. The staged files are removed on
/// every exit path. Blocks (at the await point) until the child has exited
/// and its output has been fully read; there is no timeout, so a hung child
/// blocks the caller indefinitely.
///
/// # Errors
///
/// Returns a configuration-error variant before any file is created, or an
/// I/O variant when staging, spawning, or reading the output file fails.
/// A failure *reported by the tool* is not an `Err`: it is returned in
/// [`Extraction::error`] together with whatever partial concepts the tool
/// managed to write.
pub async fn run_metamap(
    path: &std::path::Path,
    request: &ExtractionRequest,
) -> Result<Extraction, MetaMapError> {
    run_metamap_with(path, request, &StdoutMarkerClassifier::default()).await
}

/// Runs one extraction call with a caller-supplied failure classifier.
///
/// # Errors
///
/// Same contract as [`run_metamap`].
pub async fn run_metamap_with(
    path: &std::path::Path,
    request: &ExtractionRequest,
    classifier: &dyn FailureClassifier,
) -> Result<Extraction, MetaMapError> {
    request.validate()?;
    let staged = StagedFiles::stage(request)?;
    let args = crate::cmd::build_args(request, staged.input_path(), staged.output_path());
    let start_time = Instant::now();

    let mut cmd = Command::new(path);
    cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
    tracing::debug!(tool = %path.display(), args = args.len(), "spawning annotation process");

    let mut child = cmd.spawn().map_err(MetaMapError::SpawnFailed)?;
    let stdout = child.stdout.take().ok_or(MetaMapError::NoStdout)?;
    let stderr = child.stderr.take().ok_or(MetaMapError::NoStderr)?;

    let stdout_task = tokio::spawn(drain_lines(stdout));
    let stderr_task = tokio::spawn(drain_lines(stderr));

    let status = child.wait().await.map_err(MetaMapError::SpawnFailed)?;
    let stdout_text = stdout_task.await.unwrap_or_default();
    let stderr_text = stderr_task.await.unwrap_or_default();
    if !stderr_text.is_empty() {
        tracing::debug!(stderr = %stderr_text.trim_end(), "annotation process stderr");
    }

    let error = classifier.classify(&stdout_text);
    if error.is_some() {
        tracing::warn!(exit_code = status.code(), "tool reported a failure on stdout");
        // The child has already exited by the time classification runs, so
        // this termination request is a best-effort no-op kept idempotent.
        let _ = child.start_kill();
    }

    let output_text = tokio::fs::read_to_string(staged.output_path())
        .await
        .map_err(MetaMapError::OutputRead)?;
    let corpus = Corpus::load(output_text.lines());

    let duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(Extraction {
        concepts: corpus.concepts,
        error,
        exit_code: status.code().unwrap_or(-1),
        duration_ms,
    })
}

async fn drain_lines<R>(stream: R) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream).lines();
    let mut text = String::new();
    while let Ok(Some(line)) = reader.next_line().await {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_classifier_trims_payload() {
        let classifier = StdoutMarkerClassifier::default();
        assert_eq!(
            classifier.classify("ERROR: no match\n"),
            Some("ERROR: no match".to_string())
        );
    }

    #[test]
    fn marker_classifier_passes_clean_output() {
        let classifier = StdoutMarkerClassifier::default();
        assert_eq!(classifier.classify("processing 1 of 1\n"), None);
    }

    #[test]
    fn marker_anywhere_in_output_counts() {
        let classifier = StdoutMarkerClassifier::default();
        let payload = classifier.classify("banner\nERROR in phrase 3\ntrailer\n");
        assert_eq!(payload.as_deref(), Some("banner\nERROR in phrase 3\ntrailer"));
    }
}
