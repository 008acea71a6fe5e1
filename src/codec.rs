//! Whole-value codecs converting between values and byte buffers.
//!
//! JSON is the default representation; [`YamlCodec`] is the alternative
//! backed by `serde_yaml`.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::codable::{Decodable, Encodable};
use crate::error::{CodexError, DecodeCause, EncodeCause};
use crate::json::{JsonDecoder, JsonEncoder};

/// Decodes values from serialized bytes.
pub trait AnyDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodexError>;

    /// Parse bytes into the in-memory document model.
    fn decode_document(&self, data: &[u8]) -> Result<Value, CodexError> {
        self.decode(data)
    }

    /// Decode a [`Decodable`] type, keeping its own error variants intact.
    fn decode_decodable<T: Decodable>(&self, data: &[u8]) -> Result<T, CodexError> {
        let document = self.decode_document(data)?;
        T::decode_from(&JsonDecoder::new(&document))
    }
}

/// Encodes values into serialized bytes.
pub trait AnyEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodexError>;

    /// Encode an [`Encodable`] type through the document model.
    fn encode_encodable<T: Encodable + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodexError> {
        let mut encoder = JsonEncoder::new();
        value.encode_to(&mut encoder)?;
        self.encode(encoder.value())
    }
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Compact JSON codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that indents its output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Whether output is indented.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl AnyDecoder for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodexError> {
        serde_json::from_slice(data)
            .map_err(|err| CodexError::decode_failed("", type_name::<T>(), DecodeCause::Json(err)))
    }
}

impl AnyEncoder for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodexError> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        result.map_err(|err| CodexError::encode_failed("", EncodeCause::Json(err)))
    }
}

/// YAML codec backed by `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl AnyDecoder for YamlCodec {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodexError> {
        serde_yaml::from_slice(data)
            .map_err(|err| CodexError::decode_failed("", type_name::<T>(), DecodeCause::Yaml(err)))
    }
}

impl AnyEncoder for YamlCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodexError> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|err| CodexError::encode_failed("", EncodeCause::Yaml(err)))
    }
}

/// Decode JSON bytes into a value.
///
/// ```
/// let year: Vec<i64> = codex::decoded(b"[2014, 2020]").unwrap();
/// assert_eq!(year, vec![2014, 2020]);
/// ```
pub fn decoded<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodexError> {
    JsonCodec::default().decode(data)
}

/// Decode bytes with a specific codec.
pub fn decoded_using<T, D>(data: &[u8], decoder: &D) -> Result<T, CodexError>
where
    T: DeserializeOwned,
    D: AnyDecoder + ?Sized,
{
    decoder.decode(data)
}

/// Encode a value as compact JSON bytes.
pub fn encoded<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodexError> {
    JsonCodec::default().encode(value)
}

/// Encode a value with a specific codec.
pub fn encoded_using<T, E>(value: &T, encoder: &E) -> Result<Vec<u8>, CodexError>
where
    T: Serialize + ?Sized,
    E: AnyEncoder + ?Sized,
{
    encoder.encode(value)
}
