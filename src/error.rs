//! Error taxonomy for the decode and encode facades.

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

/// Coarse classification of a [`CodexError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    EmptyKeyPath,
    UnderlyingDecodeFailed,
    TransformationFailed,
    DateFormattingFailed,
    UnderlyingEncodeFailed,
    InvalidDatePattern,
}

/// Failure reported by a keyed container or a byte codec while decoding.
#[derive(Debug)]
pub enum DecodeCause {
    /// The key does not exist in the container.
    KeyNotFound,
    /// The key exists but holds null where a value was required.
    ValueNotFound,
    /// The value was expected to be a keyed container.
    NotAKeyedContainer { found: &'static str },
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl DecodeCause {
    /// True when the data was present but had the wrong shape for the target type.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            DecodeCause::NotAKeyedContainer { .. } => true,
            DecodeCause::Json(err) => err.is_data(),
            _ => false,
        }
    }
}

impl fmt::Display for DecodeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeCause::KeyNotFound => write!(f, "key not found"),
            DecodeCause::ValueNotFound => write!(f, "value is null"),
            DecodeCause::NotAKeyedContainer { found } => {
                write!(f, "expected a keyed container, found {}", found)
            }
            DecodeCause::Json(e) => write!(f, "JSON error: {}", e),
            DecodeCause::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl StdError for DecodeCause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DecodeCause::Json(e) => Some(e),
            DecodeCause::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DecodeCause {
    fn from(err: serde_json::Error) -> Self {
        DecodeCause::Json(err)
    }
}

impl From<serde_yaml::Error> for DecodeCause {
    fn from(err: serde_yaml::Error) -> Self {
        DecodeCause::Yaml(err)
    }
}

/// Failure reported by a keyed container or a byte codec while encoding.
#[derive(Debug)]
pub enum EncodeCause {
    /// An existing value on the path is not a keyed container.
    NotAKeyedContainer { found: &'static str },
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for EncodeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeCause::NotAKeyedContainer { found } => {
                write!(f, "expected a keyed container, found {}", found)
            }
            EncodeCause::Json(e) => write!(f, "JSON error: {}", e),
            EncodeCause::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl StdError for EncodeCause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EncodeCause::Json(e) => Some(e),
            EncodeCause::Yaml(e) => Some(e),
            EncodeCause::NotAKeyedContainer { .. } => None,
        }
    }
}

impl From<serde_json::Error> for EncodeCause {
    fn from(err: serde_json::Error) -> Self {
        EncodeCause::Json(err)
    }
}

impl From<serde_yaml::Error> for EncodeCause {
    fn from(err: serde_yaml::Error) -> Self {
        EncodeCause::Yaml(err)
    }
}

/// Error returned by every facade operation.
///
/// `path` fields hold the dotted coding path of the offending key; an empty path
/// means the root value.
#[derive(Debug)]
pub enum CodexError {
    /// A path-based operation was given zero keys.
    EmptyKeyPath,
    UnderlyingDecodeFailed {
        path: String,
        expected: &'static str,
        cause: DecodeCause,
    },
    /// A transformer declined to produce an object from present data.
    TransformationFailed {
        path: String,
        transformer: &'static str,
    },
    /// A date formatter could not parse a present string.
    DateFormattingFailed { path: String, input: String },
    UnderlyingEncodeFailed { path: String, cause: EncodeCause },
    /// A date pattern contains a specifier that cannot be formatted.
    InvalidDatePattern { pattern: String },
}

impl CodexError {
    /// Coarse classification, for matching without destructuring.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodexError::EmptyKeyPath => ErrorKind::EmptyKeyPath,
            CodexError::UnderlyingDecodeFailed { .. } => ErrorKind::UnderlyingDecodeFailed,
            CodexError::TransformationFailed { .. } => ErrorKind::TransformationFailed,
            CodexError::DateFormattingFailed { .. } => ErrorKind::DateFormattingFailed,
            CodexError::UnderlyingEncodeFailed { .. } => ErrorKind::UnderlyingEncodeFailed,
            CodexError::InvalidDatePattern { .. } => ErrorKind::InvalidDatePattern,
        }
    }

    /// Dotted path of the key that failed, if the error is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            CodexError::EmptyKeyPath | CodexError::InvalidDatePattern { .. } => None,
            CodexError::UnderlyingDecodeFailed { path, .. }
            | CodexError::TransformationFailed { path, .. }
            | CodexError::DateFormattingFailed { path, .. }
            | CodexError::UnderlyingEncodeFailed { path, .. } => Some(path),
        }
    }

    /// The container's own decode failure, if this error wraps one.
    pub fn decode_cause(&self) -> Option<&DecodeCause> {
        match self {
            CodexError::UnderlyingDecodeFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }

    pub(crate) fn decode_failed(
        path: impl Into<String>,
        expected: &'static str,
        cause: DecodeCause,
    ) -> Self {
        CodexError::UnderlyingDecodeFailed {
            path: path.into(),
            expected,
            cause,
        }
    }

    pub(crate) fn encode_failed(path: impl Into<String>, cause: EncodeCause) -> Self {
        CodexError::UnderlyingEncodeFailed {
            path: path.into(),
            cause,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

impl fmt::Display for CodexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodexError::EmptyKeyPath => write!(f, "Coding key path was empty"),
            CodexError::UnderlyingDecodeFailed {
                path,
                expected,
                cause,
            } => write!(
                f,
                "Failed to decode {} at '{}': {}",
                expected,
                display_path(path),
                cause
            ),
            CodexError::TransformationFailed { path, transformer } => write!(
                f,
                "Transformer {} could not transform value at '{}'",
                transformer,
                display_path(path)
            ),
            CodexError::DateFormattingFailed { path, input } => write!(
                f,
                "Unable to format date string '{}' at '{}'",
                input,
                display_path(path)
            ),
            CodexError::UnderlyingEncodeFailed { path, cause } => {
                write!(f, "Failed to encode value at '{}': {}", display_path(path), cause)
            }
            CodexError::InvalidDatePattern { pattern } => {
                write!(f, "Invalid date pattern '{}'", pattern)
            }
        }
    }
}

impl StdError for CodexError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CodexError::UnderlyingDecodeFailed { cause, .. } => Some(cause),
            CodexError::UnderlyingEncodeFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Human-readable name of a JSON value's kind, used in container mismatch errors.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
