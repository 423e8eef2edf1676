// Path: crates/types/src/config/mod.rs

//! Configuration for the `dagsel` command-line front end.
use crate::cid::Multicodec;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Selects the codec used when importing new blocks.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CodecName {
    /// DAG-JSON.
    DagJson,
    /// The workspace's binary codec.
    #[default]
    DagBincode,
}

impl CodecName {
    /// The multicodec code for this codec.
    pub fn multicodec(&self) -> Multicodec {
        match self {
            Self::DagJson => Multicodec::DAG_JSON,
            Self::DagBincode => Multicodec::DAG_BINCODE,
        }
    }
}

impl FromStr for CodecName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dag-json" => Ok(Self::DagJson),
            "dag-bincode" => Ok(Self::DagBincode),
            other => Err(format!(
                "unknown codec '{other}', expected 'dag-json' or 'dag-bincode'"
            )),
        }
    }
}

impl fmt::Display for CodecName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.multicodec(), f)
    }
}

/// Selects the output format of the log subscriber.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            )),
        }
    }
}

/// Settings for the `dagsel` binary, loaded from a TOML file.
///
/// Command-line flags and environment variables take precedence over every
/// field here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Directory of the filesystem block store.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Codec used by `dagsel import`.
    #[serde(default)]
    pub import_codec: CodecName,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parses a TOML configuration document.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}
