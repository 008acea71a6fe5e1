//! Hand-written decoding and encoding for user types.
//!
//! [`Decodable`] and [`Encodable`] are where a type spells out its own layout
//! with the [`DecodeExt`](crate::DecodeExt) and [`EncodeExt`](crate::EncodeExt)
//! helpers. The serde bridge below lets such types sit anywhere serde expects a
//! `Deserialize`/`Serialize` type, including inside `Vec`s and other codecs.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_json::Value;

use crate::container::{Decoder, Encoder};
use crate::error::CodexError;
use crate::json::{JsonDecoder, JsonEncoder};

/// A type that decodes itself from a [`Decoder`].
///
/// ```
/// use codex::{Decodable, DecodeExt, Decoder, CodexError};
///
/// struct Book {
///     title: String,
/// }
///
/// impl Decodable for Book {
///     fn decode_from<D: Decoder>(decoder: &D) -> Result<Self, CodexError> {
///         Ok(Book { title: decoder.decode_nested_by("data.title", ".")? })
///     }
/// }
///
/// let book: Book = codex::from_value(&serde_json::json!({"data": {"title": "Good book"}})).unwrap();
/// assert_eq!(book.title, "Good book");
/// ```
pub trait Decodable: Sized {
    fn decode_from<D: Decoder>(decoder: &D) -> Result<Self, CodexError>;
}

/// A type that encodes itself into an [`Encoder`].
pub trait Encodable {
    fn encode_to<E: Encoder>(&self, encoder: &mut E) -> Result<(), CodexError>;
}

/// Run a [`Decodable`] against an in-memory JSON document.
pub fn from_value<T: Decodable>(value: &Value) -> Result<T, CodexError> {
    T::decode_from(&JsonDecoder::new(value))
}

/// Run an [`Encodable`] into a fresh JSON document.
pub fn to_value<T: Encodable + ?Sized>(value: &T) -> Result<Value, CodexError> {
    let mut encoder = JsonEncoder::new();
    value.encode_to(&mut encoder)?;
    Ok(encoder.into_value())
}

/// `Deserialize` implementation body for a [`Decodable`] type.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Decodable,
{
    let document = Value::deserialize(deserializer)?;
    from_value(&document).map_err(de::Error::custom)
}

/// `Serialize` implementation body for an [`Encodable`] type.
pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Encodable + ?Sized,
{
    to_value(value)
        .map_err(<S::Error as ser::Error>::custom)?
        .serialize(serializer)
}

/// Implement `serde::Deserialize` for a [`Decodable`] type.
#[macro_export]
macro_rules! impl_deserialize_via_decodable {
    ($ty:ty) => {
        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::codable::deserialize(deserializer)
            }
        }
    };
}

/// Implement `serde::Serialize` for an [`Encodable`] type.
#[macro_export]
macro_rules! impl_serialize_via_encodable {
    ($ty:ty) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                $crate::codable::serialize(self, serializer)
            }
        }
    };
}
