use super::Host;
use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `ghis.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let base_dir = Utf8PathBuf::from(".");
    let config_path = args.config.as_ref();

    match Config::load(&base_dir, config_path) {
        Ok(config) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using ghis.toml from the current directory, or defaults if absent");
            }
            let _ = writeln!(
                host.output(),
                "Charting by {}: {}",
                config.category_field,
                if config.selected_categories.is_empty() {
                    "all issues".to_string()
                } else {
                    config.selected_categories.join(", ")
                }
            );
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_default_config_is_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().join("ghis.toml")).unwrap();

        let mut init_host = TestHost::new();
        init_config(&mut init_host, &InitArgs { output: Some(config_path.clone()) }).unwrap();

        let mut host = TestHost::new();
        validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap();

        let output = String::from_utf8(host.output_buf).unwrap();
        assert!(output.contains("Configuration file is valid"));
        assert!(output.contains("Charting by type: Bug"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_toml_syntax() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "invalid.toml", "categories = [\"Bug\"\n");

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });

        assert!(result.is_err(), "Invalid TOML syntax should fail validation");
        let errors = String::from_utf8(host.error_buf).unwrap();
        assert!(errors.contains("Configuration validation failed"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_unknown_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "unknown.toml", "unknown_field = \"value\"\n");

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });
        assert!(result.is_err(), "Unknown field should fail validation");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_category_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "field.toml", "category_field = \"milestone\"\n");

        let mut host = TestHost::new();
        let result = validate_config(&mut host, &ValidateArgs { config: Some(config_path) });
        assert!(result.is_err(), "Only type and label can split series");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_selection_outside_categories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(
            &temp_dir,
            "selection.toml",
            "categories = [\"Bug\", \"Feature\"]\nselected_categories = [\"Question\"]\n",
        );

        let mut host = TestHost::new();
        let err = validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap_err();
        assert!(err.to_string().contains("'Question'"));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_empty_config_is_valid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_config(&temp_dir, "empty.toml", "# Empty config file\n");

        let mut host = TestHost::new();
        validate_config(&mut host, &ValidateArgs { config: Some(config_path) }).unwrap();

        let output = String::from_utf8(host.output_buf).unwrap();
        assert!(output.contains("Charting by type: all issues"));
    }
}
