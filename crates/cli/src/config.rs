//! rc-file loading.
//!
//! Precedence: a file named with `--config` (which must exist), else the
//! first existing of `~/.razor_clientrc`, `/etc/razor_client` and the older
//! `~/.py_razor_clientrc` and `/etc/py_razor_client`, else an empty config.
//! Command-line flags are layered on top by the caller.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rz_domain::config::RawConfig;

pub const RC_FILE_NAME: &str = ".razor_clientrc";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/razor_client";
/// Names used by earlier clients, still read when nothing newer exists.
pub const LEGACY_RC_FILE_NAME: &str = ".py_razor_clientrc";
pub const LEGACY_SYSTEM_CONFIG_PATH: &str = "/etc/py_razor_client";

/// Default config locations, in lookup order.
pub fn rc_locations() -> Vec<PathBuf> {
    let home = dirs::home_dir();
    let mut locations = Vec::with_capacity(4);
    if let Some(home) = &home {
        locations.push(home.join(RC_FILE_NAME));
    }
    locations.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    if let Some(home) = &home {
        locations.push(home.join(LEGACY_RC_FILE_NAME));
    }
    locations.push(PathBuf::from(LEGACY_SYSTEM_CONFIG_PATH));
    locations
}

/// Load the config file, searching the default locations when `explicit`
/// is `None`.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<RawConfig> {
    load_config_from(explicit, &rc_locations())
}

/// [`load_config`] with the search list supplied by the caller.
pub fn load_config_from(explicit: Option<&Path>, locations: &[PathBuf]) -> anyhow::Result<RawConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("no such config file: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => locations.iter().find(|p| p.exists()).cloned(),
    };

    let Some(path) = path else {
        tracing::debug!("no config file found, using command-line settings only");
        return Ok(RawConfig::default());
    };

    tracing::debug!(path = %path.display(), "loading config");
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_locations_prefer_current_names_over_legacy() {
        let locations = rc_locations();
        let position = |p: &Path| locations.iter().position(|l| l == p).unwrap();

        let system = position(Path::new(SYSTEM_CONFIG_PATH));
        let legacy_system = position(Path::new(LEGACY_SYSTEM_CONFIG_PATH));
        assert!(system < legacy_system);
        assert_eq!(legacy_system, locations.len() - 1);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(locations[0], home.join(RC_FILE_NAME));
            assert!(position(&home.join(LEGACY_RC_FILE_NAME)) > system);
        }
    }

    #[test]
    fn nothing_found_is_empty_config() {
        let missing = vec![PathBuf::from("/nonexistent/razor/rc")];
        let cfg = load_config_from(None, &missing).unwrap();
        assert_eq!(cfg, RawConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/razor/rc")), &[]).unwrap_err();
        assert!(err.to_string().contains("no such config file"));
    }
}
