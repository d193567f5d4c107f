//! OpenAPI v3 schema fragments as found inside CRD documents
//!
//! A CRD field is either an object (with nested properties), an array (with an
//! item schema) or a primitive. Decoding never fails: fragments are read from
//! a `serde_json::Value` and anything unrecognised degrades to an untyped
//! primitive, so a malformed field can still be displayed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata shared by every schema variant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMeta {
    /// Human-readable description
    pub description: Option<String>,
    /// Default value (an explicit `null` is treated as absent)
    pub default: Option<Value>,
    /// Format hint (e.g., "int32", "date-time")
    pub format: Option<String>,
    /// Allowed values, in document order
    pub enum_values: Option<Vec<Value>>,
    /// Minimum value for numbers
    pub minimum: Option<f64>,
    /// Maximum value for numbers
    pub maximum: Option<f64>,
}

/// Primitive JSON types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    /// No (or an unrecognised) `type`, e.g. `x-kubernetes-int-or-string`
    #[default]
    Untyped,
}

impl PrimitiveType {
    /// Parse a primitive type name
    pub fn parse(s: &str) -> Self {
        match s {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::Untyped,
        }
    }

    /// Type name as written in the schema, empty for untyped fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Untyped => "",
        }
    }
}

/// The discriminated part of a schema
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object {
        /// Nested properties, in document order
        properties: IndexMap<String, Schema>,
        /// Names of required properties
        required: Vec<String>,
    },
    Array {
        /// Element schema (may itself be an array)
        items: Box<Schema>,
    },
    Primitive(PrimitiveType),
}

/// A single schema fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Schema {
    pub meta: SchemaMeta,
    pub kind: SchemaKind,
}

impl Default for Schema {
    fn default() -> Self {
        Self::primitive(PrimitiveType::Untyped)
    }
}

impl Schema {
    /// Create a primitive schema
    pub fn primitive(type_: PrimitiveType) -> Self {
        Self {
            meta: SchemaMeta::default(),
            kind: SchemaKind::Primitive(type_),
        }
    }

    /// Create an object schema
    pub fn object(properties: IndexMap<String, Schema>, required: Vec<String>) -> Self {
        Self {
            meta: SchemaMeta::default(),
            kind: SchemaKind::Object {
                properties,
                required,
            },
        }
    }

    /// Create an array schema
    pub fn array(items: Schema) -> Self {
        Self {
            meta: SchemaMeta::default(),
            kind: SchemaKind::Array {
                items: Box::new(items),
            },
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// Type name as written in the schema (`"object"`, `"array"`, `"string"`, ...)
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Primitive(p) => p.as_str(),
        }
    }

    /// Element schema for arrays
    pub fn items(&self) -> Option<&Schema> {
        match &self.kind {
            SchemaKind::Array { items } => Some(items),
            _ => None,
        }
    }

    /// Nested properties for objects
    pub fn properties(&self) -> Option<&IndexMap<String, Schema>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Check if a nested property is required
    pub fn is_required(&self, name: &str) -> bool {
        match &self.kind {
            SchemaKind::Object { required, .. } => required.iter().any(|r| r == name),
            _ => false,
        }
    }

    /// Decode a schema fragment (recursive, total)
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let meta = SchemaMeta {
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            default: obj.get("default").filter(|v| !v.is_null()).cloned(),
            format: obj.get("format").and_then(Value::as_str).map(String::from),
            enum_values: obj.get("enum").and_then(Value::as_array).cloned(),
            minimum: obj.get("minimum").and_then(Value::as_f64),
            maximum: obj.get("maximum").and_then(Value::as_f64),
        };

        let type_name = obj.get("type").and_then(Value::as_str);
        let properties = obj.get("properties").and_then(Value::as_object);
        let items = obj.get("items");

        let kind = match type_name {
            Some("object") => Self::object_kind(obj, properties),
            Some("array") => SchemaKind::Array {
                items: Box::new(items.map(Self::from_value).unwrap_or_default()),
            },
            Some(other) => SchemaKind::Primitive(PrimitiveType::parse(other)),
            None if properties.is_some() => Self::object_kind(obj, properties),
            None if items.is_some() => SchemaKind::Array {
                items: Box::new(items.map(Self::from_value).unwrap_or_default()),
            },
            None => SchemaKind::Primitive(PrimitiveType::Untyped),
        };

        Self { meta, kind }
    }

    fn object_kind(obj: &Map<String, Value>, properties: Option<&Map<String, Value>>) -> SchemaKind {
        let properties = properties
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        let required = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        SchemaKind::Object {
            properties,
            required,
        }
    }

    /// Encode back into a schema fragment
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();

        let type_name = self.type_name();
        if !type_name.is_empty() {
            obj.insert("type".to_string(), Value::from(type_name));
        }
        if let Some(description) = &self.meta.description {
            obj.insert("description".to_string(), Value::from(description.as_str()));
        }
        if let Some(default) = &self.meta.default {
            obj.insert("default".to_string(), default.clone());
        }
        if let Some(format) = &self.meta.format {
            obj.insert("format".to_string(), Value::from(format.as_str()));
        }
        if let Some(values) = &self.meta.enum_values {
            obj.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(minimum) = self.meta.minimum {
            obj.insert("minimum".to_string(), Value::from(minimum));
        }
        if let Some(maximum) = self.meta.maximum {
            obj.insert("maximum".to_string(), Value::from(maximum));
        }

        match &self.kind {
            SchemaKind::Object {
                properties,
                required,
            } => {
                if !properties.is_empty() {
                    let props = properties
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_value()))
                        .collect();
                    obj.insert("properties".to_string(), Value::Object(props));
                }
                if !required.is_empty() {
                    obj.insert("required".to_string(), Value::from(required.clone()));
                }
            }
            SchemaKind::Array { items } => {
                obj.insert("items".to_string(), items.to_value());
            }
            SchemaKind::Primitive(_) => {}
        }

        Value::Object(obj)
    }
}

impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<Schema> for Value {
    fn from(schema: Schema) -> Self {
        schema.to_value()
    }
}
