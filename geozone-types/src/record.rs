//! Geolocated records with an open-ended attribute bag.

use crate::position::Position;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field name the longitude is read from in a JSON record.
pub const LONGITUDE_FIELD: &str = "longitude";
/// Field name the latitude is read from in a JSON record.
pub const LATITUDE_FIELD: &str = "latitude";

/// Named attributes carried by a record.
pub type Attributes = FxHashMap<String, AttributeValue>;

/// Errors raised while turning raw input into a [`Record`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing coordinate field '{0}'")]
    MissingCoordinate(&'static str),

    #[error("coordinate field '{field}' is not a number: {value}")]
    InvalidCoordinate { field: &'static str, value: String },
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
        }
    }

    /// Scalar JSON values only. `null` is an absent attribute; arrays and
    /// objects are dropped with a warning.
    fn from_json(name: &str, value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s)),
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Null => None,
            Value::Array(_) | Value::Object(_) => {
                log::warn!("Dropping non-scalar attribute '{}'", name);
                None
            }
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// An entity located on the globe with arbitrary named attributes.
///
/// # Examples
///
/// ```
/// use geozone_types::position::Position;
/// use geozone_types::record::Record;
///
/// let record = Record::new(Position::new(0.5, 0.5))
///     .with_attribute("score", 10.0)
///     .with_attribute("name", "alice");
///
/// assert_eq!(record.numeric_attribute("score"), Some(10.0));
/// assert_eq!(record.numeric_attribute("name"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub position: Position,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Record {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            attributes: Attributes::default(),
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// The named attribute if present and numeric.
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(AttributeValue::as_number)
    }

    /// Build a record from a flat JSON object.
    ///
    /// `longitude` and `latitude` are removed to form the position; every other
    /// scalar field becomes an attribute. Only the coordinates can fail the
    /// decode: `null` fields are treated as absent and nested values are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use geozone_types::record::Record;
    ///
    /// let value = serde_json::json!({
    ///     "longitude": 2.35,
    ///     "latitude": 48.85,
    ///     "agreeableness": 0.7,
    ///     "country_tld": "fr",
    /// });
    /// let record = Record::from_json_value(value).unwrap();
    ///
    /// assert_eq!(record.position.longitude_degrees(), 2.35);
    /// assert_eq!(record.attributes().len(), 2);
    /// assert!(record.attribute("longitude").is_none());
    /// ```
    pub fn from_json_object(mut object: Map<String, Value>) -> Result<Self, RecordError> {
        let longitude = take_coordinate(&mut object, LONGITUDE_FIELD)?;
        let latitude = take_coordinate(&mut object, LATITUDE_FIELD)?;

        let mut attributes = Attributes::default();
        attributes.reserve(object.len());
        for (name, value) in object {
            if let Some(value) = AttributeValue::from_json(&name, value) {
                attributes.insert(name, value);
            }
        }

        Ok(Self {
            position: Position::new(longitude, latitude),
            attributes,
        })
    }

    /// Like [`Record::from_json_object`], accepting any JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(object) => Self::from_json_object(object),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

fn take_coordinate(
    object: &mut Map<String, Value>,
    field: &'static str,
) -> Result<f64, RecordError> {
    let value = object
        .remove(field)
        .ok_or(RecordError::MissingCoordinate(field))?;

    value.as_f64().ok_or_else(|| RecordError::InvalidCoordinate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_attributes() {
        let record = Record::new(Position::new(1.0, 2.0))
            .with_attribute("age", 31_i64)
            .with_attribute("verified", true)
            .with_attribute("language", "fr");

        assert_eq!(record.numeric_attribute("age"), Some(31.0));
        assert_eq!(record.attribute("verified").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(record.attribute("language").and_then(|v| v.as_str()), Some("fr"));
        assert!(record.attribute("missing").is_none());
    }

    #[test]
    fn test_from_json_splits_position_and_attributes() {
        let record = Record::from_json_value(json!({
            "id": 7,
            "longitude": -3.5,
            "latitude": 40.25,
            "agreeableness": 0.25,
            "religion": "none",
            "pro": false,
        }))
        .unwrap();

        assert_eq!(record.position, Position::new(-3.5, 40.25));
        assert_eq!(record.attributes().len(), 4);
        assert_eq!(record.numeric_attribute("id"), Some(7.0));
        assert_eq!(record.numeric_attribute("agreeableness"), Some(0.25));
        assert_eq!(record.attribute("pro"), Some(&AttributeValue::Bool(false)));
    }

    #[test]
    fn test_from_json_empty_attributes() {
        let record = Record::from_json_value(json!({"longitude": 0, "latitude": 0})).unwrap();
        assert!(record.attributes().is_empty());
    }

    #[test]
    fn test_from_json_missing_coordinate() {
        let err = Record::from_json_value(json!({"longitude": 1.0})).unwrap_err();
        assert_eq!(err, RecordError::MissingCoordinate("latitude"));
    }

    #[test]
    fn test_from_json_invalid_coordinate() {
        let err =
            Record::from_json_value(json!({"longitude": "east", "latitude": 1.0})).unwrap_err();
        assert!(matches!(
            err,
            RecordError::InvalidCoordinate { field: "longitude", .. }
        ));
    }

    #[test]
    fn test_from_json_keeps_record_with_odd_attributes() {
        let record = Record::from_json_value(json!({
            "longitude": 0.5,
            "latitude": 0.5,
            "score": 10,
            "nickname": null,
        }))
        .unwrap();
        assert_eq!(record.numeric_attribute("score"), Some(10.0));
        assert!(record.attribute("nickname").is_none());

        let record = Record::from_json_value(json!({
            "longitude": 0.6,
            "latitude": 0.6,
            "score": 20,
            "tags": ["x"],
            "address": {"city": "Lyon"},
        }))
        .unwrap();
        assert_eq!(record.attributes().len(), 1);
        assert!(record.attribute("tags").is_none());
        assert!(record.attribute("address").is_none());
    }

    #[test]
    fn test_from_json_not_an_object() {
        assert_eq!(
            Record::from_json_value(json!([1, 2])).unwrap_err(),
            RecordError::NotAnObject
        );
    }

    #[test]
    fn test_attribute_value_untagged_serde() {
        let values: Vec<AttributeValue> = serde_json::from_str(r#"[1.5, "x", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AttributeValue::Number(1.5),
                AttributeValue::Text("x".to_string()),
                AttributeValue::Bool(true),
            ]
        );
        assert_eq!(values[1].type_name(), "text");
    }
}
