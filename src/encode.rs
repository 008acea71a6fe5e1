//! Encode helpers available on every [`Encoder`].

use std::any::type_name;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::accessor::KeyedWriter;
use crate::container::Encoder;
use crate::date_format::DateFormatter;
use crate::error::CodexError;
use crate::key_path::{AtomicKey, CodingKey, KeyPath};
use crate::transformer::Transformer;

/// Encode operations layered over an [`Encoder`].
///
/// Repeated keyed calls on the same encoder write into the same root object.
///
/// # Example
///
/// ```
/// use codex::{EncodeExt, JsonEncoder};
/// use serde_json::json;
///
/// let mut encoder = JsonEncoder::new();
/// encoder.encode("Good book", "title").unwrap();
/// encoder.encode_nested(&2014, ["meta", "year"]).unwrap();
///
/// assert_eq!(encoder.into_value(), json!({"title": "Good book", "meta": {"year": 2014}}));
/// ```
pub trait EncodeExt: Encoder {
    /// Root keyed container, wrapped for path-aware errors.
    fn keyed_writer(&mut self) -> Result<KeyedWriter<Self::Keyed<'_>>, CodexError> {
        let container = self
            .keyed_container()
            .map_err(|cause| CodexError::encode_failed("", cause))?;
        Ok(KeyedWriter::new(container))
    }

    /// Encode `value` as the whole, unkeyed content.
    fn encode_single_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CodexError> {
        self.encode_single(value)
            .map_err(|cause| CodexError::encode_failed("", cause))
    }

    /// Encode `value` under a top-level key.
    fn encode<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        key: impl CodingKey,
    ) -> Result<(), CodexError> {
        self.keyed_writer()?.set(&AtomicKey::from_key(&key), value)
    }

    /// Encode `value` under a top-level key, writing nothing for `None`.
    fn encode_if_present<T: Serialize + ?Sized>(
        &mut self,
        value: Option<&T>,
        key: impl CodingKey,
    ) -> Result<(), CodexError> {
        match value {
            Some(value) => self.encode(value, key),
            None => Ok(()),
        }
    }

    /// Encode a date as the string `formatter` produces for it.
    fn encode_date<F: DateFormatter + ?Sized>(
        &mut self,
        date: &DateTime<Utc>,
        key: impl CodingKey,
        formatter: &F,
    ) -> Result<(), CodexError> {
        let string = formatter.string_from(date);
        self.encode(string.as_str(), key)
    }

    /// Encode `object` through `transformer`.
    ///
    /// When the transformer yields nothing the key is left out entirely.
    fn encode_transformed<Tr: Transformer>(
        &mut self,
        object: &Tr::Object,
        key: impl CodingKey,
        transformer: &Tr,
    ) -> Result<(), CodexError> {
        match transformer.to_json(object) {
            Some(json) => self.encode(&json, key),
            None => {
                tracing::debug!(
                    key = key.string_value(),
                    transformer = type_name::<Tr>(),
                    "transformer produced no value; omitting key"
                );
                Ok(())
            }
        }
    }

    /// Encode `value` at a nested key path, creating intermediate objects.
    fn encode_path<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
        path: &KeyPath,
    ) -> Result<(), CodexError> {
        tracing::trace!(path = %path, "encoding nested value");

        let mut writer = self.keyed_writer()?;
        for key in path.parents() {
            writer = writer.set_nested(key)?;
        }
        writer.set(path.last(), value)
    }

    /// Encode `value` at the path formed by `keys`.
    ///
    /// Fails with [`CodexError::EmptyKeyPath`] when `keys` is empty.
    fn encode_nested<T, I>(&mut self, value: &T, keys: I) -> Result<(), CodexError>
    where
        T: Serialize + ?Sized,
        I: IntoIterator,
        I::Item: CodingKey,
    {
        let path = KeyPath::new(keys)?;
        self.encode_path(value, &path)
    }
}

impl<E: Encoder + ?Sized> EncodeExt for E {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_format::PatternDateFormatter;
    use crate::decode::DecodeExt;
    use crate::error::ErrorKind;
    use crate::json::{JsonDecoder, JsonEncoder};
    use crate::transformer::{FnTransformer, UnixTransformer};
    use chrono::TimeZone;
    use serde_json::{json, Value};

    #[test]
    fn test_encode_merges_keys() {
        let mut encoder = JsonEncoder::new();
        encoder.encode("The Swift Programming Language", "title").unwrap();
        encoder.encode(&2014, String::from("year")).unwrap();

        assert_eq!(
            encoder.into_value(),
            json!({"title": "The Swift Programming Language", "year": 2014})
        );
    }

    #[test]
    fn test_encode_single_value() {
        let mut encoder = JsonEncoder::new();
        encoder.encode_single_value("Good book").unwrap();
        assert_eq!(encoder.value(), &json!("Good book"));

        let err = encoder.encode(&1, "title").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnderlyingEncodeFailed);
    }

    #[test]
    fn test_encode_if_present_skips_none() {
        let mut encoder = JsonEncoder::new();
        encoder.encode_if_present(Some("MIF"), "publisher").unwrap();
        encoder.encode_if_present::<str>(None, "edition").unwrap();

        assert_eq!(encoder.into_value(), json!({"publisher": "MIF"}));
    }

    #[test]
    fn test_encode_date_round_trip() {
        let formatter = PatternDateFormatter::new("%Y-%m-%d").unwrap();
        let date = Utc.with_ymd_and_hms(2020, 11, 30, 17, 45, 0).unwrap();

        let mut encoder = JsonEncoder::new();
        encoder.encode_date(&date, "releaseDate", &formatter).unwrap();
        let doc = encoder.into_value();
        assert_eq!(doc, json!({"releaseDate": "2020-11-30"}));

        let decoded = JsonDecoder::new(&doc).decode_date("releaseDate", &formatter).unwrap();
        assert_eq!(formatter.string_from(&decoded), formatter.string_from(&date));
    }

    #[test]
    fn test_encode_transformed() {
        let date = Utc.with_ymd_and_hms(2020, 12, 1, 0, 0, 0).unwrap();
        let transformer = UnixTransformer::default();

        let mut encoder = JsonEncoder::new();
        encoder.encode_transformed(&date, "createdAt", &transformer).unwrap();
        let doc = encoder.into_value();
        assert_eq!(doc, json!({"createdAt": 1_606_780_800.0}));

        let decoded = JsonDecoder::new(&doc)
            .decode_transformed("createdAt", &transformer)
            .unwrap();
        assert_eq!(decoded, date);
    }

    #[test]
    fn test_encode_transformed_omits_declined_value() {
        let transformer = FnTransformer::new(
            |json: &Value| json.as_str().map(String::from),
            |name: &String| if name.is_empty() { None } else { Some(name.clone()) },
        );

        let mut encoder = JsonEncoder::new();
        encoder.encode_transformed(&String::new(), "nickname", &transformer).unwrap();
        encoder.encode_transformed(&"Bob".to_string(), "name", &transformer).unwrap();

        assert_eq!(encoder.into_value(), json!({"name": "Bob"}));
    }

    #[test]
    fn test_encode_path_round_trip() {
        let path = KeyPath::from_dotted("data.nested.title");

        let mut encoder = JsonEncoder::new();
        encoder.encode_path("Good book", &path).unwrap();
        encoder.encode_nested(&3, ["data", "nested", "edition"]).unwrap();
        let doc = encoder.into_value();

        assert_eq!(
            doc,
            json!({"data": {"nested": {"title": "Good book", "edition": 3}}})
        );
        let title: String = JsonDecoder::new(&doc).decode_path(&path).unwrap();
        assert_eq!(title, "Good book");
    }

    #[test]
    fn test_encode_nested_empty_keys() {
        let mut encoder = JsonEncoder::new();
        let err = encoder.encode_nested(&1, Vec::<&str>::new()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EmptyKeyPath);
        assert_eq!(encoder.value(), &Value::Null);
    }

    #[test]
    fn test_encode_path_through_scalar_fails() {
        let mut encoder = JsonEncoder::new();
        encoder.encode("flat", "data").unwrap();

        let err = encoder
            .encode_path(&1, &KeyPath::from_dotted("data.nested.edition"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnderlyingEncodeFailed);
        assert_eq!(err.path(), Some("data"));
    }
}
