//! Key-path-aware wrappers around one level of a keyed container.
//!
//! The accessors remember the coding path that led to their container, so every
//! failure they report names the full dotted path of the offending key.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::container::{KeyedDecodingContainer, KeyedEncodingContainer};
use crate::error::{CodexError, DecodeCause, EncodeCause};
use crate::key_path::{join_keys, AtomicKey};

/// Read access to one level of a keyed container.
#[derive(Debug, Clone)]
pub struct KeyedAccessor<C> {
    container: C,
    coding_path: Vec<AtomicKey>,
}

impl<C: KeyedDecodingContainer> KeyedAccessor<C> {
    /// Accessor over a root container.
    pub fn new(container: C) -> Self {
        Self {
            container,
            coding_path: Vec::new(),
        }
    }

    /// Keys walked to reach this container.
    pub fn coding_path(&self) -> &[AtomicKey] {
        &self.coding_path
    }

    /// Dotted path of `key` inside this container.
    pub fn path_to(&self, key: &AtomicKey) -> String {
        let mut keys = self.coding_path.clone();
        keys.push(key.clone());
        join_keys(&keys)
    }

    fn failure(&self, key: &AtomicKey, expected: &'static str, cause: DecodeCause) -> CodexError {
        CodexError::decode_failed(self.path_to(key), expected, cause)
    }

    /// Whether `key` exists at this level, null or not.
    pub fn contains(&self, key: &AtomicKey) -> bool {
        self.container.contains(key)
    }

    /// Keys present at this level.
    pub fn keys(&self) -> Vec<AtomicKey> {
        self.container.keys()
    }

    /// Decode the value under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &AtomicKey) -> Result<T, CodexError> {
        self.container
            .decode(key)
            .map_err(|cause| self.failure(key, type_name::<T>(), cause))
    }

    /// Decode the value under `key`, or `None` when the key is missing or null.
    pub fn get_if_present<T: DeserializeOwned>(
        &self,
        key: &AtomicKey,
    ) -> Result<Option<T>, CodexError> {
        self.container
            .decode_if_present(key)
            .map_err(|cause| self.failure(key, type_name::<T>(), cause))
    }

    /// Decode the value under `key`, falling back to `default` only when absent.
    pub fn get_with_default<T: DeserializeOwned>(
        &self,
        key: &AtomicKey,
        default: T,
    ) -> Result<T, CodexError> {
        Ok(self.get_if_present(key)?.unwrap_or(default))
    }

    /// Accessor for the keyed container stored under `key`.
    pub fn nested(&self, key: &AtomicKey) -> Result<Self, CodexError> {
        let container = self
            .container
            .nested_container(key)
            .map_err(|cause| self.failure(key, "keyed container", cause))?;

        let mut coding_path = self.coding_path.clone();
        coding_path.push(key.clone());

        Ok(Self {
            container,
            coding_path,
        })
    }
}

/// Write access to one level of a keyed container.
#[derive(Debug)]
pub struct KeyedWriter<C> {
    container: C,
    coding_path: Vec<AtomicKey>,
}

impl<C: KeyedEncodingContainer> KeyedWriter<C> {
    /// Writer over a root container.
    pub fn new(container: C) -> Self {
        Self {
            container,
            coding_path: Vec::new(),
        }
    }

    /// Keys walked to reach this container.
    pub fn coding_path(&self) -> &[AtomicKey] {
        &self.coding_path
    }

    /// Dotted path of `key` inside this container.
    pub fn path_to(&self, key: &AtomicKey) -> String {
        let mut keys = self.coding_path.clone();
        keys.push(key.clone());
        join_keys(&keys)
    }

    fn failure(&self, key: &AtomicKey, cause: EncodeCause) -> CodexError {
        CodexError::encode_failed(self.path_to(key), cause)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &AtomicKey, value: &T) -> Result<(), CodexError> {
        self.container
            .encode(key, value)
            .map_err(|cause| self.failure(key, cause))
    }

    /// Writer for the keyed container under `key`, created when absent.
    pub fn set_nested(self, key: &AtomicKey) -> Result<Self, CodexError> {
        let path = self.path_to(key);
        let mut coding_path = self.coding_path;

        let container = self
            .container
            .nested_container(key)
            .map_err(|cause| CodexError::encode_failed(path, cause))?;
        coding_path.push(key.clone());

        Ok(Self {
            container,
            coding_path,
        })
    }
}
