//! Pluggable value transforms applied at a key's leaf.
//!
//! A transformer maps between a domain object and a serialization-friendly
//! intermediate value. Declining in each direction means different things:
//! `to_object` returning `None` is a decode failure, `to_json` returning `None`
//! asks the encoder to omit the field.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Bidirectional mapping between a domain object and its stored representation.
pub trait Transformer {
    type Object;
    type Json: Serialize;

    /// Build an object from the raw stored value; `None` if it cannot.
    fn to_object(&self, json: &Value) -> Option<Self::Object>;

    /// Produce the stored value for an object; `None` to omit the field.
    fn to_json(&self, object: &Self::Object) -> Option<Self::Json>;
}

/// Scale applied to Unix timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnixUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl UnixUnit {
    fn per_second(self) -> f64 {
        match self {
            UnixUnit::Seconds => 1.0,
            UnixUnit::Milliseconds => 1_000.0,
        }
    }
}

/// Dates stored as Unix timestamps.
///
/// Reads a JSON number or a numeric string; writes a float in the configured
/// unit.
///
/// ```
/// use codex::{Transformer, UnixTransformer, UnixUnit};
/// use serde_json::json;
///
/// let transformer = UnixTransformer::new(UnixUnit::Milliseconds);
/// let date = transformer.to_object(&json!(1_500)).unwrap();
/// assert_eq!(date.timestamp_millis(), 1_500);
/// assert_eq!(transformer.to_json(&date), Some(1_500.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixTransformer {
    unit: UnixUnit,
}

impl UnixTransformer {
    /// Transformer reading and writing timestamps in `unit`.
    pub fn new(unit: UnixUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> UnixUnit {
        self.unit
    }
}

impl Transformer for UnixTransformer {
    type Object = DateTime<Utc>;
    type Json = f64;

    fn to_object(&self, json: &Value) -> Option<DateTime<Utc>> {
        let raw = match json {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !raw.is_finite() {
            return None;
        }

        let seconds = raw / self.unit.per_second();
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round() as u32;
        // Rounding can carry a full second.
        let (whole, nanos) = if nanos >= 1_000_000_000 {
            (whole + 1.0, 0)
        } else {
            (whole, nanos)
        };

        DateTime::from_timestamp(whole as i64, nanos)
    }

    fn to_json(&self, date: &DateTime<Utc>) -> Option<f64> {
        let seconds =
            date.timestamp() as f64 + f64::from(date.timestamp_subsec_nanos()) / 1e9;
        Some(seconds * self.unit.per_second())
    }
}

/// Transformer assembled from a pair of closures.
///
/// ```
/// use codex::{FnTransformer, Transformer};
/// use serde_json::{json, Value};
///
/// let upper = FnTransformer::new(
///     |json: &Value| json.as_str().map(str::to_uppercase),
///     |object: &String| Some(object.to_lowercase()),
/// );
/// assert_eq!(upper.to_object(&json!("abc")), Some("ABC".to_string()));
/// ```
pub struct FnTransformer<O, J, F, G> {
    to_object: F,
    to_json: G,
    _marker: PhantomData<fn(&O) -> J>,
}

impl<O, J, F, G> FnTransformer<O, J, F, G>
where
    F: Fn(&Value) -> Option<O>,
    G: Fn(&O) -> Option<J>,
{
    pub fn new(to_object: F, to_json: G) -> Self {
        Self {
            to_object,
            to_json,
            _marker: PhantomData,
        }
    }
}

impl<O, J, F, G> Transformer for FnTransformer<O, J, F, G>
where
    J: Serialize,
    F: Fn(&Value) -> Option<O>,
    G: Fn(&O) -> Option<J>,
{
    type Object = O;
    type Json = J;

    fn to_object(&self, json: &Value) -> Option<O> {
        (self.to_object)(json)
    }

    fn to_json(&self, object: &O) -> Option<J> {
        (self.to_json)(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_unix_transformer_seconds() {
        let transformer = UnixTransformer::default();
        let date = transformer.to_object(&json!(1_606_780_800)).unwrap();

        assert_eq!(date, Utc.with_ymd_and_hms(2020, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(transformer.to_json(&date), Some(1_606_780_800.0));
    }

    #[test]
    fn test_unix_transformer_fractional_and_string_input() {
        let transformer = UnixTransformer::new(UnixUnit::Seconds);

        let date = transformer.to_object(&json!("12.5")).unwrap();
        assert_eq!(date.timestamp(), 12);
        assert_eq!(date.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_unix_transformer_milliseconds() {
        let transformer = UnixTransformer::new(UnixUnit::Milliseconds);
        let date = transformer.to_object(&json!(1_606_780_800_250i64)).unwrap();

        assert_eq!(date.timestamp_millis(), 1_606_780_800_250);
        assert_eq!(transformer.to_json(&date), Some(1_606_780_800_250.0));
    }

    #[test]
    fn test_unix_transformer_declines_garbage() {
        let transformer = UnixTransformer::default();

        assert!(transformer.to_object(&json!("yesterday")).is_none());
        assert!(transformer.to_object(&json!(true)).is_none());
        assert!(transformer.to_object(&Value::Null).is_none());
    }

    #[test]
    fn test_fn_transformer_can_omit() {
        let transformer = FnTransformer::new(
            |json: &Value| json.as_str().map(|s| s.split(',').map(String::from).collect::<Vec<_>>()),
            |tags: &Vec<String>| {
                if tags.is_empty() {
                    None
                } else {
                    Some(tags.join(","))
                }
            },
        );

        assert_eq!(
            transformer.to_object(&json!("a,b")),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(transformer.to_json(&Vec::new()), None);
    }
}
