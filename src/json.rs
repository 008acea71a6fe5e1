//! Container adapter over the `serde_json::Value` document model.
//!
//! Every codec decodes into (and encodes from) this model, so these are the
//! decoder and encoder handed to hand-written [`Decodable`](crate::Decodable)
//! and [`Encodable`](crate::Encodable) impls.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::container::{Decoder, Encoder, KeyedDecodingContainer, KeyedEncodingContainer};
use crate::error::{value_kind, DecodeCause, EncodeCause};
use crate::key_path::AtomicKey;

/// Decode `value` as `T`, reporting null as a missing value.
fn decode_value<T: DeserializeOwned>(value: &Value) -> Result<T, DecodeCause> {
    T::deserialize(value).map_err(|err| {
        if value.is_null() {
            DecodeCause::ValueNotFound
        } else {
            DecodeCause::Json(err)
        }
    })
}

/// Reads from a borrowed JSON document.
#[derive(Debug, Clone, Copy)]
pub struct JsonDecoder<'a> {
    value: &'a Value,
}

impl<'a> JsonDecoder<'a> {
    /// Decoder over a parsed document.
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// The document being read.
    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl<'a> Decoder for JsonDecoder<'a> {
    type Keyed = JsonKeyedDecoder<'a>;

    fn keyed_container(&self) -> Result<JsonKeyedDecoder<'a>, DecodeCause> {
        match self.value {
            Value::Object(map) => Ok(JsonKeyedDecoder { map }),
            other => Err(DecodeCause::NotAKeyedContainer {
                found: value_kind(other),
            }),
        }
    }

    fn decode_single<T: DeserializeOwned>(&self) -> Result<T, DecodeCause> {
        decode_value(self.value)
    }
}

/// One object level of a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct JsonKeyedDecoder<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> JsonKeyedDecoder<'a> {
    fn lookup(&self, key: &AtomicKey) -> Result<&'a Value, DecodeCause> {
        self.map.get(key.as_str()).ok_or(DecodeCause::KeyNotFound)
    }
}

impl<'a> KeyedDecodingContainer for JsonKeyedDecoder<'a> {
    fn contains(&self, key: &AtomicKey) -> bool {
        self.map.contains_key(key.as_str())
    }

    fn is_null(&self, key: &AtomicKey) -> bool {
        matches!(self.map.get(key.as_str()), Some(Value::Null))
    }

    fn decode<T: DeserializeOwned>(&self, key: &AtomicKey) -> Result<T, DecodeCause> {
        decode_value(self.lookup(key)?)
    }

    fn nested_container(&self, key: &AtomicKey) -> Result<Self, DecodeCause> {
        match self.lookup(key)? {
            Value::Object(map) => Ok(Self { map }),
            other => Err(DecodeCause::NotAKeyedContainer {
                found: value_kind(other),
            }),
        }
    }

    fn keys(&self) -> Vec<AtomicKey> {
        self.map.keys().map(|key| AtomicKey::new(key.as_str())).collect()
    }
}

/// Builds a JSON document in memory.
///
/// The root starts out as null and becomes an object the first time a keyed
/// container is requested.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    value: Value,
}

impl JsonEncoder {
    /// Create an encoder with an empty (null) root.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document built so far.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take the finished document.
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl Encoder for JsonEncoder {
    type Keyed<'a> = JsonKeyedEncoder<'a>;

    fn keyed_container(&mut self) -> Result<JsonKeyedEncoder<'_>, EncodeCause> {
        if self.value.is_null() {
            self.value = Value::Object(Map::new());
        }
        if !self.value.is_object() {
            return Err(EncodeCause::NotAKeyedContainer {
                found: value_kind(&self.value),
            });
        }

        Ok(JsonKeyedEncoder {
            root: &mut self.value,
            path: Vec::new(),
        })
    }

    fn encode_single<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeCause> {
        self.value = serde_json::to_value(value)?;
        Ok(())
    }
}

/// One object level of a JSON document under construction.
///
/// Holds the document root plus the path of this level so nested containers can
/// be handed out by value.
#[derive(Debug)]
pub struct JsonKeyedEncoder<'a> {
    root: &'a mut Value,
    path: Vec<AtomicKey>,
}

impl<'a> JsonKeyedEncoder<'a> {
    fn target(&mut self) -> Result<&mut Map<String, Value>, EncodeCause> {
        let mut current = &mut *self.root;
        for key in &self.path {
            current = match current {
                Value::Object(map) => map
                    .entry(key.as_str().to_string())
                    .or_insert_with(|| Value::Object(Map::new())),
                other => {
                    return Err(EncodeCause::NotAKeyedContainer {
                        found: value_kind(other),
                    })
                }
            };
        }

        match current {
            Value::Object(map) => Ok(map),
            other => Err(EncodeCause::NotAKeyedContainer {
                found: value_kind(other),
            }),
        }
    }
}

impl<'a> KeyedEncodingContainer for JsonKeyedEncoder<'a> {
    fn encode<T: Serialize + ?Sized>(
        &mut self,
        key: &AtomicKey,
        value: &T,
    ) -> Result<(), EncodeCause> {
        let value = serde_json::to_value(value)?;
        self.target()?.insert(key.as_str().to_string(), value);
        Ok(())
    }

    fn nested_container(mut self, key: &AtomicKey) -> Result<Self, EncodeCause> {
        let map = self.target()?;
        let slot = map
            .entry(key.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        if !slot.is_object() {
            return Err(EncodeCause::NotAKeyedContainer {
                found: value_kind(slot),
            });
        }

        self.path.push(key.clone());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keyed_decoder_lookup() {
        let doc = json!({"title": "Good book", "publisher": null});
        let keyed = JsonDecoder::new(&doc).keyed_container().unwrap();

        let title: String = keyed.decode(&AtomicKey::new("title")).unwrap();
        assert_eq!(title, "Good book");
        assert!(keyed.contains(&AtomicKey::new("publisher")));
        assert!(keyed.is_null(&AtomicKey::new("publisher")));
        assert!(!keyed.is_null(&AtomicKey::new("missing")));
    }

    #[test]
    fn test_keyed_decoder_causes() {
        let doc = json!({"year": "2014", "publisher": null, "tags": []});
        let keyed = JsonDecoder::new(&doc).keyed_container().unwrap();

        let missing = keyed.decode::<String>(&AtomicKey::new("author")).unwrap_err();
        assert!(matches!(missing, DecodeCause::KeyNotFound));

        let null = keyed.decode::<String>(&AtomicKey::new("publisher")).unwrap_err();
        assert!(matches!(null, DecodeCause::ValueNotFound));

        let mismatch = keyed.decode::<i64>(&AtomicKey::new("year")).unwrap_err();
        assert!(mismatch.is_type_mismatch());

        let nested = keyed.nested_container(&AtomicKey::new("tags")).unwrap_err();
        assert!(matches!(nested, DecodeCause::NotAKeyedContainer { found: "array" }));
    }

    #[test]
    fn test_decode_if_present_primitive() {
        let doc = json!({"a": 1, "b": null, "c": "x"});
        let keyed = JsonDecoder::new(&doc).keyed_container().unwrap();

        assert_eq!(keyed.decode_if_present::<i64>(&AtomicKey::new("a")).unwrap(), Some(1));
        assert_eq!(keyed.decode_if_present::<i64>(&AtomicKey::new("b")).unwrap(), None);
        assert_eq!(keyed.decode_if_present::<i64>(&AtomicKey::new("z")).unwrap(), None);
        assert!(keyed.decode_if_present::<i64>(&AtomicKey::new("c")).is_err());
    }

    #[test]
    fn test_root_that_is_not_an_object() {
        let doc = json!(["a", "b"]);
        let decoder = JsonDecoder::new(&doc);

        assert!(decoder.keyed_container().is_err());
        let items: Vec<String> = decoder.decode_single().unwrap();
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn test_encoder_builds_nested_objects() {
        let mut encoder = JsonEncoder::new();
        {
            let mut keyed = encoder.keyed_container().unwrap();
            keyed.encode(&AtomicKey::new("id"), &7).unwrap();
            let mut nested = keyed
                .nested_container(&AtomicKey::new("data"))
                .unwrap()
                .nested_container(&AtomicKey::new("nested"))
                .unwrap();
            nested.encode(&AtomicKey::new("title"), "Good book").unwrap();
        }

        assert_eq!(
            encoder.into_value(),
            json!({"id": 7, "data": {"nested": {"title": "Good book"}}})
        );
    }

    #[test]
    fn test_encoder_rejects_non_object_intermediate() {
        let mut encoder = JsonEncoder::new();
        let mut keyed = encoder.keyed_container().unwrap();
        keyed.encode(&AtomicKey::new("data"), "flat").unwrap();

        let err = keyed.nested_container(&AtomicKey::new("data")).unwrap_err();
        assert!(matches!(err, EncodeCause::NotAKeyedContainer { found: "string" }));
    }

    #[test]
    fn test_single_value_then_keyed_fails() {
        let mut encoder = JsonEncoder::new();
        encoder.encode_single("title").unwrap();

        assert!(encoder.keyed_container().is_err());
        assert_eq!(encoder.value(), &json!("title"));
    }
}
