//! Firestore REST value encoding.
//!
//! Firestore documents carry typed values (`{"stringValue": "x"}`,
//! `{"integerValue": "42"}`, ...). Orders are plain JSON on our side, these
//! conversions map one onto the other.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    NullValue(()),
    BooleanValue(bool),
    // int64 travels as a decimal string
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: Fields,
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::NullValue(()),
            Value::Bool(b) => FieldValue::BooleanValue(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::IntegerValue(i.to_string()),
                None => FieldValue::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::StringValue(s.clone()),
            Value::Array(items) => FieldValue::ArrayValue(ArrayValue {
                values: items.iter().map(FieldValue::from).collect(),
            }),
            Value::Object(map) => FieldValue::MapValue(MapValue {
                fields: encode_fields(map),
            }),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::NullValue(()) => Value::Null,
            FieldValue::BooleanValue(b) => Value::Bool(b),
            FieldValue::IntegerValue(s) => s
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(s)),
            FieldValue::DoubleValue(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            FieldValue::TimestampValue(s)
            | FieldValue::StringValue(s)
            | FieldValue::BytesValue(s)
            | FieldValue::ReferenceValue(s) => Value::String(s),
            FieldValue::GeoPointValue(p) => {
                serde_json::json!({ "latitude": p.latitude, "longitude": p.longitude })
            }
            FieldValue::ArrayValue(a) => Value::Array(a.values.into_iter().map(Value::from).collect()),
            FieldValue::MapValue(m) => Value::Object(decode_fields(m.fields)),
        }
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Fields {
    map.iter()
        .map(|(k, v)| (k.clone(), FieldValue::from(v)))
        .collect()
}

pub fn decode_fields(fields: Fields) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, Value::from(v)))
        .collect()
}
