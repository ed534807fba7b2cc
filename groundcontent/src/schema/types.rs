use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in record schema, usually parsed from YAML.
///
/// ```yaml
/// fields:
///   id: { type: string, required: true }
///   status: { type: string, enum: [draft, published], default: draft }
///   tags: { type: list, items: string }
/// additional_properties: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDefinition>,
    #[serde(default = "default_true")]
    pub additional_properties: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RecordSchema {
    fn default() -> Self {
        RecordSchema {
            fields: BTreeMap::new(),
            additional_properties: true,
        }
    }
}

/// Definition of a single field in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "enum", default)]
    pub enum_values: Option<Vec<String>>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Element definition for `list` fields
    #[serde(default)]
    pub items: Option<ItemType>,
    /// Nested definitions for `object` fields
    #[serde(default)]
    pub fields: Option<BTreeMap<String, FieldDefinition>>,
}

impl FieldDefinition {
    pub fn of_type(field_type: FieldType) -> Self {
        FieldDefinition {
            field_type,
            required: false,
            enum_values: None,
            default: None,
            items: None,
            fields: None,
        }
    }
}

/// Field type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Datetime,
    List,
    Object,
    Any,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::List => "list",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }
}

/// Item type for lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemType {
    Simple(FieldType),
    Complex(Box<FieldDefinition>),
}

impl ItemType {
    pub fn definition(&self) -> FieldDefinition {
        match self {
            ItemType::Simple(field_type) => FieldDefinition::of_type(*field_type),
            ItemType::Complex(def) => (**def).clone(),
        }
    }
}
