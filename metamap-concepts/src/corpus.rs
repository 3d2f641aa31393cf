//! Aggregation of MetaMap output lines into an ordered concept corpus.

use crate::concept::Concept;
use serde::{Deserialize, Serialize};

/// An ordered collection of concepts decoded from one tool run.
///
/// MetaMap interleaves record lines with banner and progress text on some
/// configurations, so [`Corpus::load`] keeps every line that parses as a
/// record and skips the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// Parsed records, in output order.
    pub concepts: Vec<Concept>,
}

impl Corpus {
    /// Builds a corpus from an ordered sequence of output lines.
    ///
    /// Lines that are not recognizable records (banners, blank lines,
    /// truncated trailing output from an interrupted run) are skipped.
    pub fn load<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut concepts = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match Concept::parse(line) {
                Ok(concept) => concepts.push(concept),
                Err(err) => {
                    tracing::debug!(%err, line, "skipping non-record output line");
                }
            }
        }
        Self { concepts }
    }

    /// Number of records in the corpus.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns `true` when no record was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

impl IntoIterator for Corpus {
    type Item = Concept;
    type IntoIter = std::vec::IntoIter<Concept>;

    fn into_iter(self) -> Self::IntoIter {
        self.concepts.into_iter()
    }
}
