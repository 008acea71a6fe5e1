//! Runtime configuration for the command-line front end.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `CODEX_*` environment variables.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{AnyDecoder, AnyEncoder, JsonCodec, YamlCodec};
use crate::date_format::PatternDateFormatter;
use crate::error::CodexError;
use crate::key_path::DEFAULT_SEPARATOR;

/// Serialized document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Parse bytes in this format into the document model.
    pub fn decode_document(&self, data: &[u8]) -> Result<Value, CodexError> {
        match self {
            Format::Json => JsonCodec::new().decode_document(data),
            Format::Yaml => YamlCodec.decode_document(data),
        }
    }

    /// Serialize a document in this format.
    pub fn encode_document(&self, value: &Value, pretty: bool) -> Result<Vec<u8>, CodexError> {
        match self {
            Format::Json if pretty => JsonCodec::pretty().encode(value),
            Format::Json => JsonCodec::new().encode(value),
            Format::Yaml => YamlCodec.encode(value),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("Unknown format '{}', expected json or yaml", other)),
        }
    }
}

/// Settings shared by the `codex` subcommands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodexConfig {
    /// Separator for delimited key paths
    pub separator: String,

    /// Input format when none is given on the command line
    pub format: Format,

    /// Indent JSON output
    pub pretty: bool,

    /// strftime pattern for date values; RFC 3339 when unset
    pub date_format: Option<String>,
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            format: Format::Json,
            pretty: false,
            date_format: None,
        }
    }
}

impl CodexConfig {
    /// Load configuration from a YAML file; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns error if the file can't be read or isn't valid YAML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;

        tracing::debug!(path = %path.display(), "loaded codex config");
        Ok(config)
    }

    /// Defaults overlaid with `CODEX_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::default().with_env_overrides()
    }

    /// Overlay `CODEX_SEPARATOR`, `CODEX_FORMAT`, `CODEX_PRETTY` and
    /// `CODEX_DATE_FORMAT` onto this configuration.
    pub fn with_env_overrides(self) -> Result<Self, String> {
        self.with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(separator) = lookup("CODEX_SEPARATOR") {
            self.separator = separator;
        }
        if let Some(format) = lookup("CODEX_FORMAT") {
            self.format = format.parse()?;
        }
        if let Some(pretty) = lookup("CODEX_PRETTY") {
            self.pretty = parse_flag(&pretty)
                .ok_or_else(|| format!("Invalid CODEX_PRETTY value '{}'", pretty))?;
        }
        if let Some(date_format) = lookup("CODEX_DATE_FORMAT") {
            self.date_format = Some(date_format).filter(|pattern| !pattern.is_empty());
        }
        Ok(self)
    }

    /// Pattern formatter for the configured date format, if any.
    ///
    /// # Errors
    /// Returns [`CodexError::InvalidDatePattern`] for a malformed pattern
    pub fn date_formatter(&self) -> Result<Option<PatternDateFormatter>, CodexError> {
        self.date_format
            .as_deref()
            .map(PatternDateFormatter::new)
            .transpose()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CodexConfig::default();

        assert_eq!(config.separator, ".");
        assert_eq!(config.format, Format::Json);
        assert!(!config.pretty);
        assert!(config.date_formatter().unwrap().is_none());
    }

    #[test]
    fn test_load_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "separator: \"/\"\nformat: yaml\ndate_format: \"%Y-%m-%d\"").unwrap();

        let config = CodexConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.separator, "/");
        assert_eq!(config.format, Format::Yaml);
        assert!(!config.pretty);
        assert_eq!(config.date_formatter().unwrap().unwrap().pattern(), "%Y-%m-%d");
    }

    #[test]
    fn test_load_missing_file() {
        let err = CodexConfig::load_from_file("/nonexistent/codex.yaml").unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CODEX_SEPARATOR", "::"),
            ("CODEX_FORMAT", "YML"),
            ("CODEX_PRETTY", "yes"),
        ]
        .into_iter()
        .collect();

        let config = CodexConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.separator, "::");
        assert_eq!(config.format, Format::Yaml);
        assert!(config.pretty);
    }

    #[test]
    fn test_invalid_override() {
        let err = CodexConfig::default()
            .with_overrides(|name| (name == "CODEX_FORMAT").then(|| "xml".to_string()))
            .unwrap_err();
        assert!(err.contains("Unknown format 'xml'"));
    }

    #[test]
    fn test_date_format_override() {
        let config = CodexConfig::default()
            .with_overrides(|name| (name == "CODEX_DATE_FORMAT").then(|| "%d/%m/%Y".to_string()))
            .unwrap();
        assert_eq!(config.date_formatter().unwrap().unwrap().pattern(), "%d/%m/%Y");

        let broken = CodexConfig {
            date_format: Some("%Y-%Q".to_string()),
            ..CodexConfig::default()
        };
        let err = broken.date_formatter().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidDatePattern);
    }

    #[test]
    fn test_format_documents() {
        let doc = Format::Yaml.decode_document(b"title: Good book\n").unwrap();
        let json = Format::Json.encode_document(&doc, false).unwrap();
        assert_eq!(json, br#"{"title":"Good book"}"#.to_vec());
    }
}
