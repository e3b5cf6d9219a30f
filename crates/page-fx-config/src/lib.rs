use page_fx_engine::{CopySettings, ParallaxSettings, RevealSettings};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse page-fx config: {source}")]
    ConfigParseError { source: toml::de::Error },

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Unknown log level `{0}`")]
    UnknownLogLevel(String),
}

/// CSS selectors and attributes the page markup is expected to carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub copy_trigger: String,
    /// Attribute on a copy trigger holding the id of the element to copy
    pub copy_target_attribute: String,
    pub section: String,
    pub hero: String,
    pub hero_content: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            copy_trigger: ".copy-btn".to_string(),
            copy_target_attribute: "data-copy-target".to_string(),
            section: ".content-section".to_string(),
            hero: ".hero".to_string(),
            hero_content: ".hero-content".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub selectors: Selectors,
    pub copy: CopySettings,
    pub reveal: RevealSettings,
    pub parallax: ParallaxSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            selectors: Selectors::default(),
            copy: CopySettings::default(),
            reveal: RevealSettings::default(),
            parallax: ParallaxSettings::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn log_level(&self) -> Result<log::Level, ConfigError> {
        log::Level::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;

        non_empty("selectors.copy_trigger", &self.selectors.copy_trigger)?;
        non_empty(
            "selectors.copy_target_attribute",
            &self.selectors.copy_target_attribute,
        )?;
        non_empty("selectors.section", &self.selectors.section)?;
        non_empty("selectors.hero", &self.selectors.hero)?;
        non_empty("selectors.hero_content", &self.selectors.hero_content)?;

        class_name("copy.marker_class", &self.copy.marker_class)?;
        if self.copy.revert_delay_ms == 0 || self.copy.revert_delay_ms > u64::from(u32::MAX) {
            return Err(invalid(
                "copy.revert_delay_ms",
                format!("must be between 1 and {}", u32::MAX),
            ));
        }

        class_name("reveal.visible_class", &self.reveal.visible_class)?;
        non_empty("reveal.root_margin", &self.reveal.root_margin)?;
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(invalid(
                "reveal.threshold",
                format!("{} is outside 0.0..=1.0", self.reveal.threshold),
            ));
        }

        non_empty("parallax.pointer_query", &self.parallax.pointer_query)?;
        finite("parallax.content_intensity", self.parallax.content_intensity)?;
        finite(
            "parallax.background_intensity",
            self.parallax.background_intensity,
        )?;

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

fn class_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    non_empty(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(field, "a class name cannot contain whitespace"));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(invalid(field, "must be a finite number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_fx_engine::RevertPolicy;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_defaults_match_page_markup() {
        let config = Config::default();

        assert_eq!(config.selectors.copy_trigger, ".copy-btn");
        assert_eq!(config.selectors.section, ".content-section");
        assert_eq!(config.selectors.hero, ".hero");
        assert_eq!(config.selectors.hero_content, ".hero-content");
        assert_eq!(config.copy.idle_label, "Copy");
        assert_eq!(config.copy.copied_label, "Copied!");
        assert_eq!(config.copy.revert_delay_ms, 2000);
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.parallax.pointer_query, "(pointer: fine)");
        assert_eq!(config.log_level().unwrap(), log::Level::Info);
    }

    #[test]
    fn test_partial_override() {
        let config_content = r#"
log_level = "debug"

[copy]
copied_label = "Done!"
revert_policy = "ignore-while-pending"

[parallax]
background_intensity = 60.0
"#;

        let config = Config::from_toml_str(config_content).unwrap();

        assert_eq!(config.log_level().unwrap(), log::Level::Debug);
        assert_eq!(config.copy.copied_label, "Done!");
        assert_eq!(config.copy.idle_label, "Copy");
        assert_eq!(config.copy.revert_policy, RevertPolicy::IgnoreWhilePending);
        assert_eq!(config.parallax.background_intensity, 60.0);
        assert_eq!(config.parallax.content_intensity, 20.0);
        assert_eq!(config.reveal, RevealSettings::default());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = Config::default();
        original.selectors.copy_trigger = "button[data-copy]".to_string();
        original.reveal.threshold = 0.25;

        let toml_str = original.to_toml_string().unwrap();
        let deserialized = Config::from_toml_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = Config::from_toml_str("[copy\nidle_label = ");
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_unknown_revert_policy_is_parse_error() {
        let result = Config::from_toml_str("[copy]\nrevert_policy = \"sometimes\"");
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_unknown_log_level() {
        let result = Config::from_toml_str("log_level = \"chatty\"");
        assert!(matches!(result, Err(ConfigError::UnknownLogLevel(level)) if level == "chatty"));
    }

    #[rstest]
    #[case("[reveal]\nthreshold = 1.5", "reveal.threshold")]
    #[case("[reveal]\nthreshold = -0.1", "reveal.threshold")]
    #[case("[reveal]\nvisible_class = \"is visible\"", "reveal.visible_class")]
    #[case("[reveal]\nroot_margin = \"\"", "reveal.root_margin")]
    #[case("[copy]\nrevert_delay_ms = 0", "copy.revert_delay_ms")]
    #[case("[copy]\nrevert_delay_ms = 5000000000", "copy.revert_delay_ms")]
    #[case("[copy]\nmarker_class = \"\"", "copy.marker_class")]
    #[case("[selectors]\ncopy_trigger = \"  \"", "selectors.copy_trigger")]
    #[case("[selectors]\nhero = \"\"", "selectors.hero")]
    #[case("[parallax]\npointer_query = \"\"", "parallax.pointer_query")]
    #[case("[parallax]\ncontent_intensity = inf", "parallax.content_intensity")]
    #[case("[parallax]\nbackground_intensity = nan", "parallax.background_intensity")]
    fn test_invalid_values_name_the_field(#[case] content: &str, #[case] expected_field: &str) {
        match Config::from_toml_str(content) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid `{expected_field}`, got {other:?}"),
        }
    }

    #[test]
    fn test_error_message_mentions_field() {
        let err = Config::from_toml_str("[reveal]\nthreshold = 2.0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for `reveal.threshold`: 2 is outside 0.0..=1.0"
        );
    }
}
