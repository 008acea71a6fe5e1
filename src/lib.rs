//! # Codex: key-path helpers for serde encoding and decoding
//!
//! Codex layers ergonomic operations over a keyed document model:
//!
//! - **Keyed and path decoding**: read values by string key, typed key, key
//!   sequence or delimited path (`"data.nested.title"`)
//! - **Optional and default values**: absence is distinct from a malformed value
//! - **Transformers**: pluggable mappings between domain objects and stored values
//! - **Date formatters**: decode and encode dates through a chosen string format
//! - **Codecs**: whole-value JSON (default) and YAML encoding
//!
//! ## Example
//!
//! ```
//! use codex::{AnyDecoder, CodexError, Decodable, DecodeExt, Decoder, PatternDateFormatter};
//! use chrono::{DateTime, Utc};
//!
//! struct Book {
//!     title: String,
//!     publisher: String,
//!     released: DateTime<Utc>,
//! }
//!
//! impl Decodable for Book {
//!     fn decode_from<D: Decoder>(decoder: &D) -> Result<Self, CodexError> {
//!         let formatter = PatternDateFormatter::new("%Y-%m-%d")?;
//!         Ok(Book {
//!             title: decoder.decode_nested(["data", "title"])?,
//!             publisher: decoder.decode_or("publisher", "MIF".to_string())?,
//!             released: decoder.decode_date("released", &formatter)?,
//!         })
//!     }
//! }
//!
//! let data = br#"{"data": {"title": "Good book"}, "released": "2014-06-02"}"#;
//! let book: Book = codex::JsonCodec::new().decode_decodable(data).unwrap();
//! assert_eq!(book.title, "Good book");
//! assert_eq!(book.publisher, "MIF");
//! assert_eq!(book.released.to_rfc3339(), "2014-06-02T00:00:00+00:00");
//! ```

// Core modules
pub mod key_path;
pub mod error;
pub mod container;
pub mod accessor;

// Leaf transforms
pub mod transformer;
pub mod date_format;

// Facades
pub mod decode;
pub mod encode;

// Document model, codecs and user-type bridge
pub mod json;
pub mod codable;
pub mod codec;

pub mod config;

// Re-export key types
pub use key_path::{AtomicKey, CodingKey, KeyPath, DEFAULT_SEPARATOR};
pub use error::{CodexError, DecodeCause, EncodeCause, ErrorKind};
pub use container::{Decoder, Encoder, KeyedDecodingContainer, KeyedEncodingContainer};
pub use accessor::{KeyedAccessor, KeyedWriter};
pub use transformer::{FnTransformer, Transformer, UnixTransformer, UnixUnit};
pub use date_format::{DateFormatter, Iso8601DateFormatter, PatternDateFormatter};
pub use decode::DecodeExt;
pub use encode::EncodeExt;
pub use json::{JsonDecoder, JsonEncoder, JsonKeyedDecoder, JsonKeyedEncoder};
pub use codable::{from_value, to_value, Decodable, Encodable};
pub use codec::{decoded, decoded_using, encoded, encoded_using, AnyDecoder, AnyEncoder, JsonCodec, YamlCodec};
pub use config::{CodexConfig, Format};
