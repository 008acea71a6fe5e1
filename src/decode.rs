//! Decode helpers available on every [`Decoder`].
//!
//! Keys may be given as `&str`, `String`, [`AtomicKey`] or any [`CodingKey`]
//! enum. Path variants walk nested keyed containers and decode the last key.

use std::any::type_name;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::accessor::KeyedAccessor;
use crate::container::Decoder;
use crate::date_format::DateFormatter;
use crate::error::{CodexError, DecodeCause};
use crate::key_path::{AtomicKey, CodingKey, KeyPath};
use crate::transformer::Transformer;

/// Decode operations layered over a [`Decoder`].
///
/// # Example
///
/// ```
/// use codex::{DecodeExt, JsonDecoder};
/// use serde_json::json;
///
/// let doc = json!({"data": {"nested": {"title": "Good book"}}, "year": 2014});
/// let decoder = JsonDecoder::new(&doc);
///
/// let year: i64 = decoder.decode("year").unwrap();
/// let title: String = decoder.decode_nested_by("data.nested.title", ".").unwrap();
/// let publisher = decoder.decode_or("publisher", String::from("MIF")).unwrap();
///
/// assert_eq!((year, title.as_str(), publisher.as_str()), (2014, "Good book", "MIF"));
/// ```
pub trait DecodeExt: Decoder {
    /// Root keyed container, wrapped for path-aware errors.
    fn keyed(&self) -> Result<KeyedAccessor<Self::Keyed>, CodexError> {
        let container = self
            .keyed_container()
            .map_err(|cause| CodexError::decode_failed("", "keyed container", cause))?;
        Ok(KeyedAccessor::new(container))
    }

    /// Decode the whole value as one unkeyed item.
    fn decode_single_value<T: DeserializeOwned>(&self) -> Result<T, CodexError> {
        self.decode_single()
            .map_err(|cause| CodexError::decode_failed("", type_name::<T>(), cause))
    }

    /// Decode the value for a top-level key.
    fn decode<T: DeserializeOwned>(&self, key: impl CodingKey) -> Result<T, CodexError> {
        self.keyed()?.get(&AtomicKey::from_key(&key))
    }

    /// Decode the value for a top-level key, `None` when missing or null.
    ///
    /// A present value of the wrong type is an error, not `None`.
    fn decode_if_present<T: DeserializeOwned>(
        &self,
        key: impl CodingKey,
    ) -> Result<Option<T>, CodexError> {
        self.keyed()?.get_if_present(&AtomicKey::from_key(&key))
    }

    /// Decode the value for a top-level key, using `default` when it is absent.
    ///
    /// Only a missing or null key falls back; a malformed value still fails.
    fn decode_or<T: DeserializeOwned>(
        &self,
        key: impl CodingKey,
        default: T,
    ) -> Result<T, CodexError> {
        self.keyed()?
            .get_with_default(&AtomicKey::from_key(&key), default)
    }

    fn decode_or_default<T: DeserializeOwned + Default>(
        &self,
        key: impl CodingKey,
    ) -> Result<T, CodexError> {
        self.decode_or(key, T::default())
    }

    /// Decode the raw value for a key and run it through `transformer`.
    ///
    /// A null value is a missing value, not something the transformer sees.
    fn decode_transformed<Tr: Transformer>(
        &self,
        key: impl CodingKey,
        transformer: &Tr,
    ) -> Result<Tr::Object, CodexError> {
        let accessor = self.keyed()?;
        let key = AtomicKey::from_key(&key);
        let raw: Value = accessor.get(&key)?;
        if raw.is_null() {
            return Err(CodexError::decode_failed(
                accessor.path_to(&key),
                type_name::<Tr::Object>(),
                DecodeCause::ValueNotFound,
            ));
        }

        transformer
            .to_object(&raw)
            .ok_or_else(|| CodexError::TransformationFailed {
                path: accessor.path_to(&key),
                transformer: type_name::<Tr>(),
            })
    }

    /// Decode a date stored as a string, parsed by `formatter`.
    fn decode_date<F: DateFormatter + ?Sized>(
        &self,
        key: impl CodingKey,
        formatter: &F,
    ) -> Result<DateTime<Utc>, CodexError> {
        let accessor = self.keyed()?;
        let key = AtomicKey::from_key(&key);
        let raw: String = accessor.get(&key)?;

        match formatter.date_from(&raw) {
            Some(date) => Ok(date),
            None => Err(CodexError::DateFormattingFailed {
                path: accessor.path_to(&key),
                input: raw,
            }),
        }
    }

    /// Decode the value at a nested key path.
    fn decode_path<T: DeserializeOwned>(&self, path: &KeyPath) -> Result<T, CodexError> {
        tracing::trace!(path = %path, "decoding nested value");

        let mut accessor = self.keyed()?;
        for key in path.parents() {
            accessor = accessor.nested(key)?;
        }
        accessor.get(path.last())
    }

    /// Decode the value at the path formed by `keys`.
    ///
    /// Fails with [`CodexError::EmptyKeyPath`] when `keys` is empty.
    fn decode_nested<T, I>(&self, keys: I) -> Result<T, CodexError>
    where
        T: DeserializeOwned,
        I: IntoIterator,
        I::Item: CodingKey,
    {
        let path = KeyPath::new(keys)?;
        self.decode_path(&path)
    }

    /// Decode the value at a delimited path such as `"data.nested.title"`.
    fn decode_nested_by<T: DeserializeOwned>(
        &self,
        path: &str,
        separator: &str,
    ) -> Result<T, CodexError> {
        self.decode_path(&KeyPath::parse(path, separator))
    }
}

impl<D: Decoder + ?Sized> DecodeExt for D {}
