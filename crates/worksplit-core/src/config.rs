//! Configuration types for worksplit

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{WorksplitError, WorksplitResult};

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// HTTP server configuration
    pub api: ApiConfig,
    /// Assignment defaults and limits
    pub assignment: AssignmentConfig,
    /// Share text configuration
    pub share: ShareConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> WorksplitResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WorksplitError::Config(format!("Failed to read config file: {}", e))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WorksplitError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> WorksplitResult<()> {
        if self.assignment.max_problems == 0 {
            return Err(WorksplitError::Config(
                "assignment.max_problems must be at least 1".to_string(),
            ));
        }
        if self.assignment.unspecified_subject.trim().is_empty() {
            return Err(WorksplitError::Config(
                "assignment.unspecified_subject must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind the HTTP server
    pub address: String,
    /// Port for the HTTP server
    pub port: u16,
    /// Enable CORS on the JSON API
    pub cors_enabled: bool,
    /// Page title shown on the form
    pub title: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8501,
            cors_enabled: false,
            title: "Homework Splitter".to_string(),
        }
    }
}

/// How the remainder is distributed when problems don't divide evenly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemainderPolicy {
    /// Random extra members, random problem numbers
    #[default]
    Random,
    /// Random extra members, problems dealt in contiguous blocks
    RandomExtra,
    /// Problems dealt one at a time in member order
    RoundRobin,
}

impl std::fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemainderPolicy::Random => write!(f, "random"),
            RemainderPolicy::RandomExtra => write!(f, "random-extra"),
            RemainderPolicy::RoundRobin => write!(f, "round-robin"),
        }
    }
}

impl std::str::FromStr for RemainderPolicy {
    type Err = WorksplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(RemainderPolicy::Random),
            "random-extra" | "random_extra" => Ok(RemainderPolicy::RandomExtra),
            "round-robin" | "round_robin" | "roundrobin" => Ok(RemainderPolicy::RoundRobin),
            other => Err(WorksplitError::Config(format!(
                "Unknown remainder policy: {}",
                other
            ))),
        }
    }
}

/// Assignment defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentConfig {
    /// Remainder policy used when a request doesn't name one
    pub policy: RemainderPolicy,
    /// Fixed seed for reproducible output (unset in production)
    pub seed: Option<u64>,
    /// Largest accepted problem count
    pub max_problems: u32,
    /// Members pre-filled in the form
    pub default_members: Vec<String>,
    /// Subjects offered in the form
    pub subjects: Vec<String>,
    /// Label meaning "no subject"
    pub unspecified_subject: String,
    /// Accept subjects that are not in `subjects`
    pub allow_custom_subjects: bool,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            policy: RemainderPolicy::Random,
            seed: None,
            max_problems: 1000,
            default_members: ["Ito", "Saito", "Sawa", "Nishikawa"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            subjects: ["Civil Law 1", "Civil Law 2", "Constitutional Law", "Criminal Law"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unspecified_subject: "Unspecified".to_string(),
            allow_custom_subjects: false,
        }
    }
}

impl AssignmentConfig {
    /// Map a submitted subject to a label, `None` meaning no subject
    pub fn resolve_subject(&self, subject: Option<&str>) -> WorksplitResult<Option<String>> {
        let subject = match subject.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) if s == self.unspecified_subject => return Ok(None),
            Some(s) => s,
        };

        if self.allow_custom_subjects || self.subjects.iter().any(|s| s == subject) {
            Ok(Some(subject.to_string()))
        } else {
            Err(WorksplitError::UnknownSubject(subject.to_string()))
        }
    }

    /// Subject options in form order, "unspecified" first
    pub fn subject_options(&self) -> Vec<&str> {
        std::iter::once(self.unspecified_subject.as_str())
            .chain(self.subjects.iter().map(String::as_str))
            .collect()
    }
}

/// Language of the share text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareLocale {
    #[default]
    En,
    Ja,
}

/// Share text configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// Share text language
    pub locale: ShareLocale,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive
    pub level: String,
    /// Log format (text or compact)
    pub format: String,
    /// Log file path (if any)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}
