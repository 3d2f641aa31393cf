//! Initialization and capability probing of a MetaMap install.

use crate::discovery::discover_metamap;
use crate::error::MetaMapError;
use crate::types::{Capabilities, Feature, InitReport};
use std::path::PathBuf;
use tokio::process::Command;

/// Discovers the MetaMap executable and probes its help text.
///
/// Installs differ in which of the extended flags they support (older data
/// bundles lack `--prune` and the source/semantic-type filters), so the
/// probe records what this install advertises.
///
/// # Errors
///
/// Returns [`MetaMapError`] if the executable cannot be found, cannot be
/// run, or produces no recognizable banner.
pub async fn init(explicit_path: Option<PathBuf>) -> Result<InitReport, MetaMapError> {
    let path = discover_metamap(explicit_path)?;

    let help_output = Command::new(&path)
        .arg("--help")
        .output()
        .await
        .map_err(MetaMapError::SpawnFailed)?;

    // The launcher prints its banner and usage to stdout on some installs
    // and stderr on others.
    let mut help_text = String::from_utf8_lossy(&help_output.stdout).into_owned();
    help_text.push_str(&String::from_utf8_lossy(&help_output.stderr));

    let version = help_text
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .ok_or_else(|| {
            MetaMapError::VersionCheckFailed("help output carried no banner".to_string())
        })?;

    let feature_checks: &[(Feature, &str)] = &[
        (Feature::SldiFormats, "--sldi"),
        (Feature::WordSenseDisambiguation, "word_sense_disambiguation"),
        (Feature::Prune, "--prune"),
        (Feature::SourceFilters, "restrict_to_sources"),
        (Feature::SemanticTypeFilters, "restrict_to_sts"),
    ];

    let features = feature_checks
        .iter()
        .filter(|(_, pattern)| help_text.contains(pattern))
        .map(|(feature, _)| *feature)
        .collect();

    Ok(InitReport {
        metamap_path: path,
        version,
        capabilities: Capabilities { features },
    })
}
