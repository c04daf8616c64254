//! Configuration schema for cdoclint.
//!
//! A configuration selects which rules apply and where. It is optional; a
//! missing file means every default rule at its default severity.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detect::{AnalyzerOptions, Limits, RuleId, Severity};

/// File names searched for, in order, when no path is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["cdoclint.yaml", ".cdoclint.yaml"];

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("invalid excluded path pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("limit '{0}' must be greater than zero")]
    InvalidLimit(&'static str),
}

/// Configuration as written in YAML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawConfig {
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub severity: BTreeMap<String, Severity>,
    #[serde(default)]
    pub limits: Option<Limits>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub disabled_rules: Vec<RuleId>,
    pub excluded_paths: Vec<String>,
    pub severity: BTreeMap<RuleId, Severity>,
    pub limits: Option<Limits>,
    excluded: GlobSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disabled_rules: Vec::new(),
            excluded_paths: Vec::new(),
            severity: BTreeMap::new(),
            limits: None,
            excluded: GlobSet::empty(),
        }
    }
}

impl Config {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(content)?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let disabled_rules = raw
            .disabled_rules
            .iter()
            .map(|name| parse_rule(name))
            .collect::<Result<Vec<_>, _>>()?;

        let severity = raw
            .severity
            .iter()
            .map(|(name, severity)| -> Result<_, ConfigError> {
                Ok((parse_rule(name)?, *severity))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let mut builder = GlobSetBuilder::new();
        for pattern in &raw.excluded_paths {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let excluded = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: raw.excluded_paths.join(", "),
            source,
        })?;

        if let Some(limits) = &raw.limits {
            if limits.max_functions_per_file == 0 {
                return Err(ConfigError::InvalidLimit("max_functions_per_file"));
            }
            if limits.max_function_lines == 0 {
                return Err(ConfigError::InvalidLimit("max_function_lines"));
            }
        }

        Ok(Self {
            disabled_rules,
            excluded_paths: raw.excluded_paths,
            severity,
            limits: raw.limits,
            excluded,
        })
    }

    /// Load the first config file found in `dir`, or defaults when there is
    /// none. Returns the path that was used, if any.
    pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                let config = Self::parse_file(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }
        Ok((Self::default(), None))
    }

    pub fn is_rule_disabled(&self, rule: RuleId) -> bool {
        self.disabled_rules.contains(&rule)
    }

    /// Effective severity of a rule after overrides.
    pub fn severity_for(&self, rule: RuleId) -> Severity {
        self.severity
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    pub fn is_path_excluded(&self, path: &Path) -> bool {
        !self.excluded_paths.is_empty() && self.excluded.is_match(path)
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            limits: self.limits,
        }
    }
}

fn parse_rule(name: &str) -> Result<RuleId, ConfigError> {
    RuleId::parse(name).ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
}
