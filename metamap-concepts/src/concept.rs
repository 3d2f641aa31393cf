//! Parsers for the individual record forms in MetaMap fielded output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when a single output line cannot be parsed as a record.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line has fewer `|`-separated fields than the record form requires.
    #[error("truncated record: {got} fields, expected at least {want}")]
    Truncated {
        /// Number of fields found on the line.
        got: usize,
        /// Minimum number of fields the record form requires.
        want: usize,
    },

    /// The second field names a record kind this crate does not know.
    #[error("unrecognized record kind {kind:?}")]
    UnknownKind {
        /// The unrecognized kind tag.
        kind: String,
    },

    /// A field that must be numeric did not parse.
    #[error("invalid numeric field {field}: {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field text.
        value: String,
    },
}

/// A recognized terminology concept (`MMI` record).
///
/// Field layout: `index|MMI|score|preferred_name|cui|[semtypes]|trigger|
/// location|pos_info|tree_codes`, with `tree_codes` optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMmi {
    /// Caller-supplied record identifier (or `USER` for anonymous input).
    pub index: String,
    /// Relevance score assigned by the mapping engine.
    pub score: f64,
    /// Preferred name of the concept in the vocabulary.
    pub preferred_name: String,
    /// Concept Unique Identifier.
    pub cui: String,
    /// Semantic type abbreviations, with the surrounding brackets stripped.
    pub semtypes: Vec<String>,
    /// Trigger information: the text that matched, per utterance.
    pub trigger: String,
    /// Location tag (`TI`, `AB`, `TX`, ...).
    pub location: String,
    /// Positional spans as `start/length` pairs, `;`-separated.
    pub pos_info: String,
    /// MeSH tree codes, when the concept carries any.
    pub tree_codes: Option<String>,
}

impl ConceptMmi {
    /// Parses one `MMI` line.
    pub fn from_mmi(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 9 {
            return Err(ParseError::Truncated {
                got: fields.len(),
                want: 9,
            });
        }
        let score = parse_number(fields[2], "score")?;
        let tree_codes = fields
            .get(9)
            .map(|s| (*s).to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            index: fields[0].to_string(),
            score,
            preferred_name: fields[3].to_string(),
            cui: fields[4].to_string(),
            semtypes: split_semtypes(fields[5]),
            trigger: fields[6].to_string(),
            location: fields[7].to_string(),
            pos_info: fields[8].to_string(),
            tree_codes,
        })
    }
}

/// An acronym/abbreviation expansion (`AA` record, also used for `UA`).
///
/// Field layout: `index|AA|short_form|long_form|num_tokens_short_form|
/// num_chars_short_form|num_tokens_long_form|num_chars_long_form|pos_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptAa {
    /// Caller-supplied record identifier.
    pub index: String,
    /// The abbreviated form as it appeared in the text.
    pub short_form: String,
    /// The expansion the tool resolved the abbreviation to.
    pub long_form: String,
    /// Token count of the short form.
    pub num_tokens_short_form: u32,
    /// Character count of the short form.
    pub num_chars_short_form: u32,
    /// Token count of the long form.
    pub num_tokens_long_form: u32,
    /// Character count of the long form.
    pub num_chars_long_form: u32,
    /// Positional span of the short form.
    pub pos_info: String,
}

impl ConceptAa {
    /// Parses one `AA` or `UA` line.
    pub fn from_aa(line: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 9 {
            return Err(ParseError::Truncated {
                got: fields.len(),
                want: 9,
            });
        }
        Ok(Self {
            index: fields[0].to_string(),
            short_form: fields[2].to_string(),
            long_form: fields[3].to_string(),
            num_tokens_short_form: parse_number(fields[4], "num_tokens_short_form")?,
            num_chars_short_form: parse_number(fields[5], "num_chars_short_form")?,
            num_tokens_long_form: parse_number(fields[6], "num_tokens_long_form")?,
            num_chars_long_form: parse_number(fields[7], "num_chars_long_form")?,
            pos_info: fields[8].to_string(),
        })
    }
}

/// One record from MetaMap fielded output, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Concept {
    /// A recognized terminology concept.
    Mmi(ConceptMmi),
    /// An acronym/abbreviation expansion.
    Aa(ConceptAa),
    /// A user-defined acronym expansion.
    Ua(ConceptAa),
}

impl Concept {
    /// Parses a single output line, dispatching on the record-kind field.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let kind = line.split('|').nth(1).unwrap_or_default();
        match kind {
            "MMI" => ConceptMmi::from_mmi(line).map(Self::Mmi),
            "AA" => ConceptAa::from_aa(line).map(Self::Aa),
            "UA" => ConceptAa::from_aa(line).map(Self::Ua),
            other => Err(ParseError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Returns the caller-supplied record identifier.
    #[must_use]
    pub fn index(&self) -> &str {
        match self {
            Self::Mmi(c) => &c.index,
            Self::Aa(c) | Self::Ua(c) => &c.index,
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn split_semtypes(field: &str) -> Vec<String> {
    field
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
