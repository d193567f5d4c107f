//! Uniform display attributes for schema fields
//!
//! A field's description, default, enum, format and bounds may live on the
//! field itself or, for arrays, on its element schema. The functions here look
//! at the field first and then one level inside `items`, so a renderer can treat
//! `string` and `[]string` fields the same way.
//!
//! Every function is total: absent or unrenderable values come back as an
//! empty string (or `None` for numeric bounds).

use serde::Serialize;
use serde_json::Value;

use crate::schema::Schema;

/// Domain suffix of the product's API groups
pub const DOMAIN_SUFFIX: &str = ".eda.nokia.com";

/// The schema nested rendering should descend into: the element schema for
/// arrays, the field itself otherwise.
pub fn scope(schema: &Schema) -> &Schema {
    schema.items().unwrap_or(schema)
}

/// Field description.
///
/// Arrays without a description of their own fall back to the element's
/// description and then to the element's type name, so `[]string` fields
/// still read as "string".
pub fn description(schema: &Schema) -> String {
    if let Some(d) = non_empty(schema.meta.description.as_deref()) {
        return d.to_string();
    }
    match schema.items() {
        Some(items) => non_empty(items.meta.description.as_deref())
            .unwrap_or(items.type_name())
            .to_string(),
        None => String::new(),
    }
}

/// Default value rendered as text
pub fn default_value(schema: &Schema) -> String {
    schema
        .meta
        .default
        .as_ref()
        .or_else(|| schema.items().and_then(|i| i.meta.default.as_ref()))
        .map(render_value)
        .unwrap_or_default()
}

/// Allowed values rendered as `[a, b, c]`
pub fn enum_values(schema: &Schema) -> String {
    let values = non_empty_enum(schema)
        .or_else(|| schema.items().and_then(non_empty_enum));

    match values {
        Some(values) => {
            let rendered: Vec<String> = values.iter().map(render_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        None => String::new(),
    }
}

/// Format hint (e.g., "int32", "date-time")
pub fn format(schema: &Schema) -> String {
    non_empty(schema.meta.format.as_deref())
        .or_else(|| {
            schema
                .items()
                .and_then(|i| non_empty(i.meta.format.as_deref()))
        })
        .unwrap_or_default()
        .to_string()
}

/// Minimum constraint
pub fn minimum(schema: &Schema) -> Option<f64> {
    schema
        .meta
        .minimum
        .or_else(|| schema.items().and_then(|i| i.meta.minimum))
}

/// Maximum constraint
pub fn maximum(schema: &Schema) -> Option<f64> {
    schema
        .meta
        .maximum
        .or_else(|| schema.items().and_then(|i| i.meta.maximum))
}

/// Drop the first label of a product FQDN:
/// `ntpclients.timing.eda.nokia.com` -> `timing.eda.nokia.com`
pub fn strip_domain_prefix(fqdn: &str) -> String {
    strip_domain_prefix_with(fqdn, DOMAIN_SUFFIX)
}

/// Same as [`strip_domain_prefix`] with an explicit suffix
pub fn strip_domain_prefix_with(fqdn: &str, suffix: &str) -> String {
    if fqdn.is_empty() {
        return fqdn.to_string();
    }
    let trimmed = fqdn.trim();
    if !trimmed.ends_with(suffix) {
        return trimmed.to_string();
    }
    match trimmed.split_once('.') {
        Some((_, rest)) if trimmed.split('.').count() >= 3 => rest.to_string(),
        _ => trimmed.to_string(),
    }
}

/// All display attributes of one property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: String,
    pub type_name: String,
    pub required: bool,
    pub description: String,
    pub default: String,
    pub enum_values: String,
    pub format: String,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Whether the field has nested properties worth expanding
    pub has_children: bool,
}

impl FieldView {
    /// Build the view of a named property
    pub fn of(name: impl Into<String>, schema: &Schema, required: bool) -> Self {
        let type_name = match schema.items() {
            Some(items) if !items.type_name().is_empty() => format!("[]{}", items.type_name()),
            _ => schema.type_name().to_string(),
        };

        Self {
            name: name.into(),
            type_name,
            required,
            description: description(schema),
            default: default_value(schema),
            enum_values: enum_values(schema),
            format: format(schema),
            minimum: minimum(schema),
            maximum: maximum(schema),
            has_children: scope(schema).properties().is_some_and(|p| !p.is_empty()),
        }
    }
}

/// Views of the properties under `scope(schema)`, in document order
pub fn field_views(schema: &Schema) -> Vec<FieldView> {
    let scoped = scope(schema);
    scoped
        .properties()
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| FieldView::of(name, prop, scoped.is_required(name)))
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn non_empty_enum(schema: &Schema) -> Option<&[Value]> {
    schema
        .meta
        .enum_values
        .as_deref()
        .filter(|values| !values.is_empty())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
