//! Typed concept records for MetaMap's fielded (`-N`) output format.
//!
//! MetaMap writes one `|`-separated record per line, with the record kind in
//! the second field: `MMI` for a recognized terminology concept, `AA` / `UA`
//! for acronym and user-defined-acronym expansions. This crate parses single
//! lines into typed records and aggregates whole output files into a
//! [`Corpus`].

/// Single-line record types and their parsers.
pub mod concept;
/// Aggregation of an ordered line sequence into a concept corpus.
pub mod corpus;

pub use concept::{Concept, ConceptAa, ConceptMmi, ParseError};
pub use corpus::Corpus;
