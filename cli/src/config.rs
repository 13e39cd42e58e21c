use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pneumatic_core::StepRules;
use serde::Deserialize;

/// Settings read from `--config`.
///
/// ```toml
/// [rules]
/// shuttle_threshold = 0
/// thin_shuttle_threshold = 1
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub rules: StepRules,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        log::debug!("config: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("[rules]\nthin_shuttle_threshold = 1\n").unwrap();

        assert_eq!(config.rules.shuttle_threshold, 0);
        assert_eq!(config.rules.thin_shuttle_threshold, 1);
        assert_eq!(toml::from_str::<Config>("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(toml::from_str::<Config>("[render]\nscale = 2\n").is_err());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
