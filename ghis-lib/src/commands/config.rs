use crate::Result;
use crate::dataset::RecordField;
use crate::series::EventOptions;
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use strum::Display;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

const LOG_TARGET: &str = "    config";

/// Configuration file looked up in the current directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "ghis.toml";

/// Record attribute whose values become the stacked series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CategoryField {
    /// Issue type (Bug, Feature, ...)
    #[default]
    Type,

    /// Issue label
    Label,
}

impl CategoryField {
    #[must_use]
    pub const fn record_field(self) -> RecordField {
        match self {
            Self::Type => RecordField::Type,
            Self::Label => RecordField::Label,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding the fetched issue tables
    #[serde(default = "default_data_dir")]
    pub data_dir: Utf8PathBuf,

    /// Attribute that splits issues into series
    #[serde(default)]
    pub category_field: CategoryField,

    /// Allowed values for `selected_categories` (empty allows any value)
    #[serde(default)]
    pub categories: Vec<String>,

    /// Categories charted by default
    #[serde(default)]
    pub selected_categories: Vec<String>,

    /// Prefixes that group known labels into filter choices
    #[serde(default)]
    pub label_filter_prefixes: Vec<String>,

    /// Number of top issue creators listed
    #[serde(default = "default_top_creator_count")]
    pub top_creator_count: usize,

    /// Count issue openings
    #[serde(default = "default_true")]
    pub include_open: bool,

    /// Count issue closings
    #[serde(default = "default_true")]
    pub include_closed: bool,

    /// Draw milestone due dates
    #[serde(default)]
    pub show_milestones: bool,
}

fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("data")
}

const fn default_top_creator_count() -> usize {
    10
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `ghis.toml` in `base_dir` is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading ghis configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No configuration file at '{path}', using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading ghis configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Which issue transitions to count
    #[must_use]
    pub const fn event_options(&self) -> EventOptions {
        EventOptions {
            include_open: self.include_open,
            include_closed: self.include_closed,
        }
    }

    /// Check that the settings are consistent
    ///
    /// # Errors
    ///
    /// Returns an error naming the first inconsistent setting
    pub fn validate(&self) -> Result<()> {
        if self.top_creator_count == 0 {
            return Err(app_err!("top_creator_count must be greater than 0"));
        }

        if !self.categories.is_empty()
            && let Some(unknown) = self.selected_categories.iter().find(|c| !self.categories.contains(c))
        {
            return Err(app_err!("selected category '{unknown}' is not listed in categories"));
        }

        if let Some(empty) = self.label_filter_prefixes.iter().position(String::is_empty) {
            return Err(app_err!("label_filter_prefixes entry {} is empty", empty + 1));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dir(tmp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.category_field, CategoryField::Type);
        assert_eq!(config.selected_categories, vec!["Bug"]);
        assert_eq!(config.event_options(), EventOptions::OPEN_ISSUES);
    }

    #[test]
    fn test_validate_zero_top_creators() {
        let config = Config { top_creator_count: 0, ..Config::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_creator_count"));
    }

    #[test]
    fn test_validate_selected_not_in_categories() {
        let config = Config {
            selected_categories: vec!["Chore".to_string()],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'Chore'"));
    }

    #[test]
    fn test_validate_selected_without_category_list() {
        let config = Config {
            categories: Vec::new(),
            selected_categories: vec!["Chore".to_string()],
            ..Config::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_empty_prefix() {
        let config = Config {
            label_filter_prefixes: vec!["a:".to_string(), String::new()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = base_dir(&tmp).join(DEFAULT_CONFIG_FILE);
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(&base_dir(&tmp), Some(&output_path)).unwrap();
        assert_eq!(loaded.categories, Config::default().categories);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&base_dir(&tmp), None).unwrap();
        assert_eq!(config.data_dir, Utf8PathBuf::from("data"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_finds_file_in_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(DEFAULT_CONFIG_FILE), "category_field = \"label\"\ncategories = []\n").unwrap();

        let config = Config::load(&base_dir(&tmp), None).unwrap();
        assert_eq!(config.category_field, CategoryField::Label);
        assert!(config.categories.is_empty());
        assert_eq!(config.top_creator_count, 10);
        assert!(config.include_open);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_rejects_unknown_field() {
        let tmp = tempfile::tempdir().unwrap();
        let path = base_dir(&tmp).join("bad.toml");
        fs::write(&path, "colour = \"red\"\n").unwrap();

        let err = Config::load(&base_dir(&tmp), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parsing configuration file"));
    }

    #[test]
    fn test_category_field_display() {
        assert_eq!(CategoryField::Type.to_string(), "type");
        assert_eq!(CategoryField::Label.record_field(), RecordField::Label);
    }
}
