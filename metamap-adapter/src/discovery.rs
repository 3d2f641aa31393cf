//! Locates the MetaMap launcher script on the system.

use crate::error::MetaMapError;
use std::path::PathBuf;
use which::which;

/// Environment variable that overrides the default MetaMap binary path.
pub const METAMAP_BIN_ENV_VAR: &str = "METAMAP_ADAPTER_BIN";

/// Locates the MetaMap executable.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `METAMAP_ADAPTER_BIN` environment variable.
/// 3. `metamap` resolved via `$PATH`.
/// 4. Common install location fallbacks (platform-specific).
/// 5. Helpful error with install instructions.
///
/// # Errors
///
/// Returns [`MetaMapError::ExecutableNotFound`] when no valid executable can
/// be located.
pub fn discover_metamap(explicit_path: Option<PathBuf>) -> Result<PathBuf, MetaMapError> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(MetaMapError::ExecutableNotFound(format!(
            "Explicit path does not exist: {}",
            path.display()
        )));
    }

    // 2. Environment variable
    if let Ok(path_str) = std::env::var(METAMAP_BIN_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. PATH lookup
    if let Ok(path) = which("metamap") {
        return Ok(path);
    }

    // 4. Common install locations
    for location in fallback_locations() {
        if location.exists() {
            return Ok(location);
        }
    }

    // 5. Helpful error
    Err(MetaMapError::ExecutableNotFound(
        "metamap not found. Download the distribution from the NLM and run its \
         install.sh, then put public_mm/bin on PATH.\n\
         Searched: PATH, common install locations."
            .to_string(),
    ))
}

#[cfg(unix)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join("public_mm/bin/metamap"));
        locations.push(home.join(".local/bin/metamap"));
    }
    locations.push(PathBuf::from("/opt/public_mm/bin/metamap"));
    locations.push(PathBuf::from("/usr/local/public_mm/bin/metamap"));
    locations
}

#[cfg(windows)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join("public_mm/bin/metamap.bat"));
    }
    locations.push(PathBuf::from(r"C:\public_mm\bin\metamap.bat"));
    locations
}
