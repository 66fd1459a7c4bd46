//! Run configuration.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via `apply_overrides`)
//! 2. TOML config file, when one is given
//! 3. Compiled defaults
//!
//! Configuration names where things are read and written, plus the few rule
//! boundaries that must be explicit. It never defines new rules.
use crate::error::ConfigError;
use crate::normalize::DEFAULT_DATE_FORMATS;
use crate::pipeline::CleanColumns;
use crate::validation::MissingValuePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub paths: PathsConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub control_summary: PathBuf,
    pub audit_log: PathBuf,
    pub row_results: PathBuf,
    pub clean_output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: "transactions.csv".into(),
            control_summary: "control_results.csv".into(),
            audit_log: "audit_log.csv".into(),
            row_results: "row_level_results.csv".into(),
            clean_output: "clean_transactions.csv".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// chrono formats tried in order when parsing `date`.
    pub date_formats: Vec<String>,
    pub missing_values: MissingValuePolicy,
    pub clean_columns: CleanColumns,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            missing_values: MissingValuePolicy::default(),
            clean_columns: CleanColumns::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub control_summary: Option<PathBuf>,
    pub audit_log: Option<PathBuf>,
    pub row_results: Option<PathBuf>,
    pub clean_output: Option<PathBuf>,
}

impl QualityConfig {
    /// Defaults, then `file` if given, then `overrides`. The result is validated.
    pub fn load(file: Option<&Path>, overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parses a TOML string. Unset keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, cli: &CliOverrides) {
        let paths = &mut self.paths;
        for (slot, value) in [
            (&mut paths.input, &cli.input),
            (&mut paths.control_summary, &cli.control_summary),
            (&mut paths.audit_log, &cli.audit_log),
            (&mut paths.row_results, &cli.row_results),
            (&mut paths.clean_output, &cli.clean_output),
        ] {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.paths;
        for (field, path) in [
            ("paths.input", &p.input),
            ("paths.control_summary", &p.control_summary),
            ("paths.audit_log", &p.audit_log),
            ("paths.row_results", &p.row_results),
            ("paths.clean_output", &p.clean_output),
        ] {
            if path.as_os_str().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if self.rules.date_formats.is_empty() {
            return Err(invalid("rules.date_formats", "at least one format is required"));
        }
        if self.rules.date_formats.iter().any(|f| f.trim().is_empty()) {
            return Err(invalid("rules.date_formats", "formats must not be blank"));
        }
        if let CleanColumns::Projection(cols) = &self.rules.clean_columns {
            if cols.is_empty() {
                return Err(invalid("rules.clean_columns", "projection must name at least one column"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid { field: field.to_string(), message: message.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ColumnSet;

    #[test]
    fn test_defaults_match_artifact_names() {
        let config = QualityConfig::default();
        assert_eq!(config.paths.input, PathBuf::from("transactions.csv"));
        assert_eq!(config.paths.audit_log, PathBuf::from("audit_log.csv"));
        assert_eq!(config.rules.missing_values, MissingValuePolicy::RawCells);
        assert_eq!(config.rules.clean_columns, CleanColumns::Set(ColumnSet::Input));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = QualityConfig::from_toml(
            r#"
[paths]
input = "batches/2024-06-01.csv"

[rules]
missing_values = "include_coercion_failures"
clean_columns = ["txn_id", "amount"]
"#,
        )
        .unwrap();
        assert_eq!(config.paths.input, PathBuf::from("batches/2024-06-01.csv"));
        assert_eq!(config.paths.control_summary, PathBuf::from("control_results.csv"));
        assert_eq!(config.rules.missing_values, MissingValuePolicy::IncludeCoercionFailures);
        assert_eq!(
            config.rules.clean_columns,
            CleanColumns::Projection(vec!["txn_id".into(), "amount".into()])
        );
        assert_eq!(config.rules.date_formats.len(), 2);
    }

    #[test]
    fn test_row_flag_missing_policy_parses() {
        let config =
            QualityConfig::from_toml("[rules]\nmissing_values = \"include_coercion_failures_in_row_flag\"\n").unwrap();
        assert_eq!(config.rules.missing_values, MissingValuePolicy::IncludeCoercionFailuresInRowFlag);
    }

    #[test]
    fn test_clean_columns_named_set() {
        let config = QualityConfig::from_toml("[rules]\nclean_columns = \"annotated\"\n").unwrap();
        assert_eq!(config.rules.clean_columns, CleanColumns::Set(ColumnSet::Annotated));
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("quality.toml");
        std::fs::write(&file, "[paths]\ninput = \"a.csv\"\naudit_log = \"history.csv\"\n").unwrap();

        let cli = CliOverrides { input: Some("b.csv".into()), ..Default::default() };
        let config = QualityConfig::load(Some(&file), &cli).unwrap();
        assert_eq!(config.paths.input, PathBuf::from("b.csv"));
        assert_eq!(config.paths.audit_log, PathBuf::from("history.csv"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = QualityConfig::from_toml("[rules]\ndate_formats = []\n").unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "rules.date_formats"));

        let err = QualityConfig::from_toml("[rules]\nclean_columns = []\n").unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "rules.clean_columns"));
    }

    #[test]
    fn test_bad_toml_and_missing_file() {
        assert!(matches!(QualityConfig::from_toml("[paths"), Err(ConfigError::Parse { .. })));
        let missing = QualityConfig::load(Some(Path::new("/nonexistent/quality.toml")), &CliOverrides::default());
        assert!(matches!(missing, Err(ConfigError::FileNotFound { .. })));
    }
}
