//! Key and key-path abstractions for keyed containers.
//!
//! A [`KeyPath`] is the canonical form every facade operation resolves its keys
//! into: a non-empty, ordered list of [`AtomicKey`]s where later keys address
//! deeper nesting.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::CodexError;

/// Separator used by [`KeyPath::from_dotted`] and the `FromStr` impl.
pub const DEFAULT_SEPARATOR: &str = ".";

/// A typed key that can address a value inside a keyed container.
///
/// Implement this for field enums to get compile-checked keys:
///
/// ```
/// use codex::CodingKey;
///
/// enum BookKey {
///     Title,
///     Year,
/// }
///
/// impl CodingKey for BookKey {
///     fn string_value(&self) -> &str {
///         match self {
///             BookKey::Title => "title",
///             BookKey::Year => "year",
///         }
///     }
/// }
///
/// assert_eq!(BookKey::Year.string_value(), "year");
/// ```
pub trait CodingKey {
    /// The string form used to look the key up.
    fn string_value(&self) -> &str;

    /// Integer alias of the key, if it has one.
    fn int_value(&self) -> Option<i64> {
        None
    }
}

impl CodingKey for str {
    fn string_value(&self) -> &str {
        self
    }
}

impl CodingKey for String {
    fn string_value(&self) -> &str {
        self.as_str()
    }
}

impl<K: CodingKey + ?Sized> CodingKey for &K {
    fn string_value(&self) -> &str {
        (**self).string_value()
    }

    fn int_value(&self) -> Option<i64> {
        (**self).int_value()
    }
}

/// A single key segment.
///
/// Equality and hashing only look at the string value; the integer alias is
/// carried along for diagnostics.
#[derive(Debug, Clone)]
pub struct AtomicKey {
    string_value: String,
    int_value: Option<i64>,
}

impl AtomicKey {
    /// Key with a string value and no integer alias.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            string_value: key.into(),
            int_value: None,
        }
    }

    /// Key addressed by an integer, stored under its decimal string form.
    pub fn from_int(index: i64) -> Self {
        Self {
            string_value: index.to_string(),
            int_value: Some(index),
        }
    }

    /// Capture any typed key without losing its string form.
    pub fn from_key<K: CodingKey + ?Sized>(key: &K) -> Self {
        Self {
            string_value: key.string_value().to_string(),
            int_value: key.int_value(),
        }
    }

    /// The string value used for lookups.
    pub fn as_str(&self) -> &str {
        &self.string_value
    }
}

impl CodingKey for AtomicKey {
    fn string_value(&self) -> &str {
        &self.string_value
    }

    fn int_value(&self) -> Option<i64> {
        self.int_value
    }
}

impl PartialEq for AtomicKey {
    fn eq(&self, other: &Self) -> bool {
        self.string_value == other.string_value
    }
}

impl Eq for AtomicKey {}

impl Hash for AtomicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string_value.hash(state);
    }
}

impl fmt::Display for AtomicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string_value)
    }
}

impl From<&str> for AtomicKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AtomicKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Ordered, non-empty sequence of keys addressing a possibly nested value.
///
/// # Examples
///
/// ```
/// use codex::KeyPath;
///
/// let path = KeyPath::parse("data/nested/title", "/");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "data.nested.title");
///
/// assert!(KeyPath::new(Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    keys: Vec<AtomicKey>,
}

impl KeyPath {
    /// Build a path from an ordered sequence of keys.
    ///
    /// Fails with [`CodexError::EmptyKeyPath`] when the sequence is empty.
    pub fn new<I>(keys: I) -> Result<Self, CodexError>
    where
        I: IntoIterator,
        I::Item: CodingKey,
    {
        let keys: Vec<AtomicKey> = keys
            .into_iter()
            .map(|key| AtomicKey::from_key(&key))
            .collect();

        if keys.is_empty() {
            return Err(CodexError::EmptyKeyPath);
        }

        Ok(Self { keys })
    }

    /// Path with exactly one key.
    pub fn single<K: CodingKey>(key: K) -> Self {
        Self {
            keys: vec![AtomicKey::from_key(&key)],
        }
    }

    /// Split a delimited string into a path.
    ///
    /// Segments are kept verbatim, so `"a..b"` has an empty middle key. An empty
    /// separator leaves the whole string as one key.
    pub fn parse(path: &str, separator: &str) -> Self {
        let keys = if separator.is_empty() {
            vec![AtomicKey::new(path)]
        } else {
            path.split(separator).map(AtomicKey::new).collect()
        };

        Self { keys }
    }

    /// Split a `.`-delimited string into a path.
    pub fn from_dotted(path: &str) -> Self {
        Self::parse(path, DEFAULT_SEPARATOR)
    }

    /// All keys, outermost first.
    pub fn keys(&self) -> &[AtomicKey] {
        &self.keys
    }

    /// Number of keys in the path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The outermost key.
    pub fn first(&self) -> &AtomicKey {
        &self.keys[0]
    }

    /// The terminal key, the one the value itself lives under.
    pub fn last(&self) -> &AtomicKey {
        &self.keys[self.keys.len() - 1]
    }

    /// Every key but the last: the containers walked before the terminal lookup.
    pub fn parents(&self) -> &[AtomicKey] {
        &self.keys[..self.keys.len() - 1]
    }

    /// This path extended by one deeper key.
    pub fn child<K: CodingKey>(&self, key: K) -> Self {
        let mut keys = self.keys.clone();
        keys.push(AtomicKey::from_key(&key));
        Self { keys }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join_keys(&self.keys))
    }
}

impl FromStr for KeyPath {
    type Err = CodexError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_dotted(path))
    }
}

impl From<AtomicKey> for KeyPath {
    fn from(key: AtomicKey) -> Self {
        Self { keys: vec![key] }
    }
}

/// Render keys the way error messages show coding paths.
pub(crate) fn join_keys(keys: &[AtomicKey]) -> String {
    keys.iter()
        .map(AtomicKey::as_str)
        .collect::<Vec<_>>()
        .join(DEFAULT_SEPARATOR)
}
