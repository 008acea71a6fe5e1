//! Contract for the structured encoder/decoder the facades drive.
//!
//! These traits are the only thing the facades know about a document format.
//! Implementations report failures with their native [`DecodeCause`] /
//! [`EncodeCause`]; the accessors add key-path context on top.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeCause, EncodeCause};
use crate::key_path::AtomicKey;

/// One level of a keyed document being read.
pub trait KeyedDecodingContainer: Sized {
    /// Whether the key exists at this level (null values count as existing).
    fn contains(&self, key: &AtomicKey) -> bool;

    /// Whether the key exists and holds null.
    fn is_null(&self, key: &AtomicKey) -> bool;

    /// Decode the value stored under `key` as `T`.
    fn decode<T: DeserializeOwned>(&self, key: &AtomicKey) -> Result<T, DecodeCause>;

    /// Decode the value under `key`, or `None` when the key is missing or null.
    ///
    /// A present value that does not convert to `T` is still an error.
    fn decode_if_present<T: DeserializeOwned>(
        &self,
        key: &AtomicKey,
    ) -> Result<Option<T>, DecodeCause> {
        if !self.contains(key) || self.is_null(key) {
            return Ok(None);
        }
        self.decode(key).map(Some)
    }

    /// The keyed container stored under `key`.
    fn nested_container(&self, key: &AtomicKey) -> Result<Self, DecodeCause>;

    /// Keys present at this level.
    fn keys(&self) -> Vec<AtomicKey>;
}

/// Entry point of a document being read.
pub trait Decoder {
    type Keyed: KeyedDecodingContainer;

    /// View the root as a keyed container.
    fn keyed_container(&self) -> Result<Self::Keyed, DecodeCause>;

    /// Decode the root as a single unkeyed value.
    fn decode_single<T: DeserializeOwned>(&self) -> Result<T, DecodeCause>;
}

/// One level of a keyed document being written.
///
/// Nested containers are obtained by value so a caller can walk a whole path
/// by rebinding one variable.
pub trait KeyedEncodingContainer: Sized {
    fn encode<T: Serialize + ?Sized>(&mut self, key: &AtomicKey, value: &T)
        -> Result<(), EncodeCause>;

    /// Descend into the container under `key`, creating it when absent.
    fn nested_container(self, key: &AtomicKey) -> Result<Self, EncodeCause>;
}

/// Entry point of a document being written.
pub trait Encoder {
    type Keyed<'a>: KeyedEncodingContainer
    where
        Self: 'a;

    /// View the root as a keyed container, turning an empty root into one.
    fn keyed_container(&mut self) -> Result<Self::Keyed<'_>, EncodeCause>;

    /// Replace the root with a single unkeyed value.
    fn encode_single<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeCause>;
}
