//! Command-line argument builder for MetaMap invocations.
//!
//! ## Flag Reference
//!
//! - `-N`: fielded output, one record per line (always set)
//! - `-Q <n>`: composite phrase depth
//! - `-V <version>`: UMLS data version (Base | USAbase | NLM)
//! - `-y -l -d -D -i -a -u -Y -K -b`: boolean switches, in that fixed order
//! - `--sldi` / `--sldiID`: input format selector
//! - `-e/-R/-k/-J/--prune`: list/threshold options; the tool's argument
//!   parser expects each of these as a *single* token with its value
//!   embedded after a space (`"-e SRC1,SRC2"`), never as two tokens
//! - input path, then output path, appended last

use crate::types::ExtractionRequest;
use std::ffi::OsString;
use std::path::Path;

/// Builds the argument list for one extraction call.
///
/// Pure and deterministic given the request: calling twice with the same
/// request and paths yields the same vector.
#[must_use]
pub fn build_args(request: &ExtractionRequest, input: &Path, output: &Path) -> Vec<OsString> {
    let options = &request.options;
    let mut args = Vec::new();

    args.push(OsString::from("-N"));
    args.push(OsString::from("-Q"));
    args.push(OsString::from(options.composite_phrase.to_string()));

    if let Some(version) = options.mm_data_version {
        args.push(OsString::from("-V"));
        args.push(OsString::from(version.tag()));
    }

    for (flag, active) in [
        ("-y", options.word_sense_disambiguation),
        ("-l", options.allow_large_n),
        ("-d", options.no_derivational_variants),
        ("-D", options.derivational_variants),
        ("-i", options.ignore_word_order),
        ("-a", options.allow_acronym_variants),
        ("-u", options.unique_acronym_variants),
        ("-Y", options.prefer_multiple_concepts),
        ("-K", options.ignore_stop_phrases),
        ("-b", options.compute_all_mappings),
    ] {
        if active {
            args.push(OsString::from(flag));
        }
    }

    if request.wants_id_format() {
        args.push(OsString::from("--sldiID"));
    } else {
        args.push(OsString::from("--sldi"));
    }

    if let Some(sources) = &options.exclude_sources {
        args.push(joined_token("-e", sources));
    }
    if let Some(sources) = &options.restrict_sources {
        args.push(joined_token("-R", sources));
    }
    if let Some(types) = &options.exclude_sts {
        args.push(joined_token("-k", types));
    }
    if let Some(types) = &options.restrict_sts {
        args.push(joined_token("-J", types));
    }
    if let Some(threshold) = options.max_prune {
        args.push(OsString::from(format!("--prune {threshold}")));
    }

    args.push(input.as_os_str().to_os_string());
    args.push(output.as_os_str().to_os_string());

    args
}

/// One token of the form `"<flag> <a,b,c>"`.
fn joined_token(flag: &str, values: &[String]) -> OsString {
    OsString::from(format!("{flag} {}", values.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataVersion, ExtractOptions, ExtractionRequest, FileFormat};
    use std::path::PathBuf;

    fn args_for(request: &ExtractionRequest) -> Vec<String> {
        build_args(
            request,
            Path::new("/tmp/in.sldi"),
            Path::new("/tmp/out.mmi"),
        )
        .iter()
        .filter_map(|s| s.to_str().map(ToString::to_string))
        .collect()
    }

    #[test]
    fn base_invocation_has_fielded_output_and_phrase_depth() {
        let request = ExtractionRequest::from_sentences(vec!["fever".to_string()]);
        let args = args_for(&request);
        assert_eq!(args[0], "-N");
        assert_eq!(args[1], "-Q");
        assert_eq!(args[2], "4");
    }

    #[test]
    fn paths_come_last_input_then_output() {
        let request = ExtractionRequest::from_sentences(vec!["fever".to_string()]);
        let args = args_for(&request);
        assert_eq!(args[args.len() - 2], "/tmp/in.sldi");
        assert_eq!(args[args.len() - 1], "/tmp/out.mmi");
    }

    #[test]
    fn boolean_flags_keep_stable_order() {
        let request = ExtractionRequest {
            options: ExtractOptions {
                word_sense_disambiguation: true,
                ignore_word_order: true,
                compute_all_mappings: true,
                mm_data_version: Some(DataVersion::UsaBase),
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        let args = args_for(&request);
        let v = args.iter().position(|a| a == "USAbase").unwrap();
        let y = args.iter().position(|a| a == "-y").unwrap();
        let i = args.iter().position(|a| a == "-i").unwrap();
        let b = args.iter().position(|a| a == "-b").unwrap();
        assert!(args[v - 1] == "-V");
        assert!(v < y && y < i && i < b);
    }

    #[test]
    fn prune_is_a_single_space_joined_token() {
        let request = ExtractionRequest {
            options: ExtractOptions {
                max_prune: Some(10),
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        let args = args_for(&request);
        assert!(args.contains(&"--prune 10".to_string()));
        assert!(!args.contains(&"--prune".to_string()));
    }

    #[test]
    fn source_and_semantic_type_lists_join_with_commas() {
        let request = ExtractionRequest {
            options: ExtractOptions {
                exclude_sources: Some(vec!["SNOMEDCT_US".to_string(), "MSH".to_string()]),
                restrict_sts: Some(vec!["sosy".to_string(), "dsyn".to_string()]),
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        let args = args_for(&request);
        assert!(args.contains(&"-e SNOMEDCT_US,MSH".to_string()));
        assert!(args.contains(&"-J sosy,dsyn".to_string()));
    }

    #[test]
    fn selector_is_plain_without_ids() {
        let request = ExtractionRequest::from_sentences(vec!["fever".to_string()]);
        let args = args_for(&request);
        assert!(args.contains(&"--sldi".to_string()));
        assert!(!args.contains(&"--sldiID".to_string()));
    }

    #[test]
    fn selector_carries_ids_when_supplied() {
        let request = ExtractionRequest {
            ids: Some(vec!["p1".to_string()]),
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        let args = args_for(&request);
        assert!(args.contains(&"--sldiID".to_string()));
    }

    #[test]
    fn selector_honors_id_format_for_prebuilt_files() {
        let request = ExtractionRequest {
            filename: Some(PathBuf::from("/data/batch.sldiID")),
            options: ExtractOptions {
                file_format: FileFormat::SldiId,
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::default()
        };
        let args = args_for(&request);
        assert!(args.contains(&"--sldiID".to_string()));
    }

    #[test]
    fn identical_requests_build_identical_vectors() {
        let request = ExtractionRequest {
            options: ExtractOptions {
                max_prune: Some(5),
                derivational_variants: true,
                ..ExtractOptions::default()
            },
            ..ExtractionRequest::from_sentences(vec!["fever".to_string()])
        };
        assert_eq!(args_for(&request), args_for(&request));
    }
}
