//! Core value types that flow between nodes.
//!
//! Hosts hand nodes loosely typed values ("any" ports). Here they are a
//! closed enum: a port either accepts one concrete kind or `Any`, and nodes
//! match on the variant they actually handle.

use crate::core::buffer::RgbBuffer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Values that can be passed into and out of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// RGB float image
    Image(ImageValue),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Ordered list of values
    Array(Vec<Value>),
    /// Key-value map (sorted by key)
    Map(BTreeMap<String, Value>),
    /// Represents absence of value (an unconnected slot)
    None,
}

/// Image wrapper with metadata.
///
/// Pixel data sits behind an `Arc` so handing the same image to several
/// ports does not copy it. Only the metadata is serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageValue {
    /// Image dimensions
    pub metadata: ImageMetadata,
    #[serde(skip)]
    data: Option<Arc<RgbBuffer>>,
}

impl PartialEq for ImageValue {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata && self.data == other.data
    }
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Port types for checking values handed to a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "inner")]
pub enum PortType {
    Image,
    Integer,
    Float,
    String,
    Boolean,
    /// Array of a specific type
    Array(Box<PortType>),
    /// Map with string keys and values of a specific type
    Map(Box<PortType>),
    /// Accepts any type
    Any,
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the port type of this value.
    pub fn get_type(&self) -> PortType {
        match self {
            Value::Image(_) => PortType::Image,
            Value::Integer(_) => PortType::Integer,
            Value::Float(_) => PortType::Float,
            Value::String(_) => PortType::String,
            Value::Boolean(_) => PortType::Boolean,
            Value::Array(arr) => match arr.first() {
                Some(first) => PortType::Array(Box::new(first.get_type())),
                None => PortType::Array(Box::new(PortType::Any)),
            },
            Value::Map(map) => match map.values().next() {
                Some(first) => PortType::Map(Box::new(first.get_type())),
                None => PortType::Map(Box::new(PortType::Any)),
            },
            Value::None => PortType::Any,
        }
    }

    /// Try to get this value as an image reference.
    pub fn as_image(&self) -> Option<&ImageValue> {
        if let Value::Image(img) = self {
            Some(img)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Check if this value is None.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Convert to a JSON value for display.
    ///
    /// Images have no JSON form and are rendered as their `Display` text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Image(_) => serde_json::Value::String(self.to_string()),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Array(arr) => serde_json::Value::Array(arr.iter().map(Value::to_json).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::None => serde_json::Value::Null,
        }
    }
}

impl From<RgbBuffer> for Value {
    fn from(buffer: RgbBuffer) -> Self {
        Value::Image(ImageValue::new(buffer))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Image(img) => write!(f, "Image({}x{})", img.metadata.width, img.metadata.height),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:.4}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Array(arr) => write!(f, "Array[{}]", arr.len()),
            Value::Map(map) => write!(f, "Map{{{} entries}}", map.len()),
            Value::None => write!(f, "None"),
        }
    }
}

// ============================================================================
// PortType Implementation
// ============================================================================

impl PortType {
    /// Check if a value matches this port type.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (PortType::Any, _) => true,
            (PortType::Image, Value::Image(_)) => true,
            (PortType::Integer, Value::Integer(_)) => true,
            (PortType::Float, Value::Float(_)) => true,
            // Integer can be used where float is expected (implicit conversion)
            (PortType::Float, Value::Integer(_)) => true,
            (PortType::String, Value::String(_)) => true,
            (PortType::Boolean, Value::Boolean(_)) => true,
            (PortType::Array(inner), Value::Array(arr)) => arr.iter().all(|v| inner.matches(v)),
            (PortType::Map(inner), Value::Map(map)) => map.values().all(|v| inner.matches(v)),
            _ => false,
        }
    }

    /// Get a human-readable name for this type.
    pub fn display_name(&self) -> String {
        match self {
            PortType::Image => "Image".to_string(),
            PortType::Integer => "Integer".to_string(),
            PortType::Float => "Float".to_string(),
            PortType::String => "String".to_string(),
            PortType::Boolean => "Boolean".to_string(),
            PortType::Array(inner) => format!("Array<{}>", inner.display_name()),
            PortType::Map(inner) => format!("Map<String, {}>", inner.display_name()),
            PortType::Any => "Any".to_string(),
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// ImageValue Implementation
// ============================================================================

impl ImageValue {
    /// Create a new ImageValue from an RGB buffer.
    pub fn new(buffer: RgbBuffer) -> Self {
        Self {
            metadata: ImageMetadata {
                width: buffer.width(),
                height: buffer.height(),
            },
            data: Some(Arc::new(buffer)),
        }
    }

    /// Get a shared reference to the pixel buffer.
    ///
    /// Returns None for values rebuilt from serialized metadata.
    pub fn get_image(&self) -> Option<&RgbBuffer> {
        self.data.as_deref()
    }

    /// Take ownership of the pixel buffer, cloning it if it is shared.
    pub fn into_image(self) -> Option<RgbBuffer> {
        self.data
            .map(|arc| Arc::try_unwrap(arc).unwrap_or_else(|arc| (*arc).clone()))
    }

    /// Check if the pixel data is present.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}
