//! # Attribute Definitions
//!
//! A schema's `attributes` arrive over the wire as a JSON mapping from field name to a loose
//! definition object:
//!
//! ```text
//! { "type": "string" | "number" | "boolean" | "date" | "array" | "object",
//!   "isArray": bool?, "isObject": bool?, "properties": { <name>: <definition>, ... }? }
//! ```
//!
//! Structural validation runs over that raw mapping (see [`crate::validate_schema_structure`]),
//! because it must report on exactly what the client sent. Data validation instead runs over an
//! [`AttributeMap`] compiled from it, where each field has one of three shapes:
//!
//! - [`AttributeDefinition::ArrayOf`] when `isArray` is true,
//! - otherwise [`AttributeDefinition::ObjectWith`] when `isObject` is true,
//! - otherwise [`AttributeDefinition::Scalar`].
//!
//! Compilation is total. A definition the structural check would never accept still compiles,
//! and the shapes it produces simply reject every value.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::{Map, Value};

pub(crate) const TYPE_KEY: &str = "type";
pub(crate) const IS_ARRAY_KEY: &str = "isArray";
pub(crate) const IS_OBJECT_KEY: &str = "isObject";
pub(crate) const PROPERTIES_KEY: &str = "properties";

/// Rendering used for a `type` that is missing altogether.
pub(crate) const UNDEFINED_TYPE: &str = "undefined";

//////////////////////////////////////////// AttributeType ////////////////////////////////////////////

/// The type tag carried by an attribute definition.
///
/// The six recognized tags are listed in [`AttributeType::VALID`]. Anything else is kept as
/// [`AttributeType::Unknown`] holding the tag as it should appear in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Text.
    String,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A string holding a parseable date.
    Date,
    /// Only meaningful through the `isArray` flag.
    Array,
    /// Only meaningful through the `isObject` flag.
    Object,
    /// An unrecognized tag.
    Unknown(String),
}

impl AttributeType {
    /// Every recognized tag, in the order used by error messages.
    pub const VALID: [AttributeType; 6] = [
        AttributeType::String,
        AttributeType::Number,
        AttributeType::Boolean,
        AttributeType::Date,
        AttributeType::Array,
        AttributeType::Object,
    ];

    /// Reads the tag from the `type` member of a raw definition.
    ///
    /// Missing tags become `Unknown("undefined")`; non-string tags become `Unknown` holding their
    /// JSON text.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None => AttributeType::Unknown(UNDEFINED_TYPE.to_string()),
            Some(Value::String(tag)) => AttributeType::from_tag(tag),
            Some(other) => AttributeType::Unknown(other.to_string()),
        }
    }

    /// Maps a tag string onto the enum.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => AttributeType::String,
            "number" => AttributeType::Number,
            "boolean" => AttributeType::Boolean,
            "date" => AttributeType::Date,
            "array" => AttributeType::Array,
            "object" => AttributeType::Object,
            other => AttributeType::Unknown(other.to_string()),
        }
    }

    /// The tag as it appears on the wire and in error messages.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::Array => "array",
            AttributeType::Object => "object",
            AttributeType::Unknown(tag) => tag,
        }
    }

    /// Whether this is one of the six recognized tags.
    pub fn is_valid(&self) -> bool {
        !matches!(self, AttributeType::Unknown(_))
    }

    /// The comma separated list of valid tags.
    pub fn valid_type_list() -> String {
        Self::VALID
            .iter()
            .map(AttributeType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for AttributeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

///////////////////////////////////////// AttributeDefinition /////////////////////////////////////////

/// The compiled shape of one schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDefinition {
    /// A bare value checked against its type tag.
    Scalar(AttributeType),
    /// An array whose elements are each checked against the type tag.
    ///
    /// Elements never receive property validation, even for `type: "object"`.
    ArrayOf(AttributeType),
    /// A non-null object, optionally with typed properties.
    ///
    /// `None` is an opaque object: any non-null object passes.
    ObjectWith(Option<AttributeMap>),
}

impl AttributeDefinition {
    /// Compiles one raw definition.
    ///
    /// Only a literal `true` sets a flag. A `properties` member that is not a mapping is
    /// treated as absent.
    pub fn compile(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return AttributeDefinition::Scalar(AttributeType::from_value(None));
        };
        let ty = AttributeType::from_value(object.get(TYPE_KEY));
        if flag(object, IS_ARRAY_KEY) {
            AttributeDefinition::ArrayOf(ty)
        } else if flag(object, IS_OBJECT_KEY) {
            let properties = object
                .get(PROPERTIES_KEY)
                .and_then(Value::as_object)
                .map(AttributeMap::compile);
            AttributeDefinition::ObjectWith(properties)
        } else {
            AttributeDefinition::Scalar(ty)
        }
    }
}

pub(crate) fn flag(object: &Map<String, Value>, key: &str) -> bool {
    matches!(object.get(key), Some(Value::Bool(true)))
}

///////////////////////////////////////////// AttributeMap ////////////////////////////////////////////

/// Compiled field definitions, kept in the order the client supplied them.
///
/// Field names are unique because the map is always compiled from a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    fields: Vec<(String, AttributeDefinition)>,
}

impl AttributeMap {
    /// Compiles a raw attribute mapping.
    pub fn compile(raw: &Map<String, Value>) -> Self {
        let fields = raw
            .iter()
            .map(|(name, definition)| (name.clone(), AttributeDefinition::compile(definition)))
            .collect();
        Self { fields }
    }

    /// Compiles the `attributes` value stored on a schema.
    ///
    /// Anything other than a JSON object compiles to an empty map.
    pub fn from_value(raw: &Value) -> Self {
        raw.as_object().map(Self::compile).unwrap_or_default()
    }

    /// Iterates over `(name, definition)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeDefinition)> {
        self.fields
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, definition)| definition)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_from_value() {
        assert_eq!(
            AttributeType::from_value(Some(&json!("date"))),
            AttributeType::Date
        );
        assert_eq!(
            AttributeType::from_value(None),
            AttributeType::Unknown("undefined".to_string())
        );
        assert_eq!(
            AttributeType::from_value(Some(&json!(5))),
            AttributeType::Unknown("5".to_string())
        );
        assert_eq!(
            AttributeType::from_value(Some(&json!("String"))),
            AttributeType::Unknown("String".to_string())
        );
    }

    #[test]
    fn valid_type_list_order() {
        assert_eq!(
            AttributeType::valid_type_list(),
            "string, number, boolean, date, array, object"
        );
    }

    #[test]
    fn unknown_tags_are_invalid() {
        assert!(AttributeType::Date.is_valid());
        assert!(!AttributeType::Unknown("x".to_string()).is_valid());
    }

    #[test]
    fn is_array_wins_over_is_object() {
        let definition = AttributeDefinition::compile(&json!({
            "type": "number",
            "isArray": true,
            "isObject": true,
            "properties": {"x": {"type": "string"}}
        }));
        assert_eq!(
            definition,
            AttributeDefinition::ArrayOf(AttributeType::Number)
        );
    }

    #[test]
    fn is_object_compiles_properties() {
        let definition = AttributeDefinition::compile(&json!({
            "type": "object",
            "isObject": true,
            "properties": {"zip": {"type": "string"}}
        }));
        let AttributeDefinition::ObjectWith(Some(properties)) = definition else {
            panic!("expected object with properties");
        };
        assert_eq!(
            properties.get("zip"),
            Some(&AttributeDefinition::Scalar(AttributeType::String))
        );
    }

    #[test]
    fn opaque_object_without_properties() {
        let definition = AttributeDefinition::compile(&json!({"type": "object", "isObject": true}));
        assert_eq!(definition, AttributeDefinition::ObjectWith(None));
    }

    #[test]
    fn bare_object_type_is_scalar() {
        let definition = AttributeDefinition::compile(&json!({
            "type": "object",
            "properties": {"zip": {"type": "string"}}
        }));
        assert_eq!(definition, AttributeDefinition::Scalar(AttributeType::Object));
    }

    #[test]
    fn only_literal_true_sets_flags() {
        let definition = AttributeDefinition::compile(&json!({"type": "string", "isArray": "yes"}));
        assert_eq!(definition, AttributeDefinition::Scalar(AttributeType::String));
    }

    #[test]
    fn non_object_definition_compiles_to_unknown() {
        assert_eq!(
            AttributeDefinition::compile(&json!("string")),
            AttributeDefinition::Scalar(AttributeType::Unknown("undefined".to_string()))
        );
    }

    #[test]
    fn map_keeps_client_order() {
        let map = AttributeMap::from_value(&json!({
            "zeta": {"type": "string"},
            "alpha": {"type": "number"},
            "mid": {"type": "boolean"}
        }));
        let names: Vec<_> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn non_object_attributes_compile_empty() {
        assert!(AttributeMap::from_value(&json!([1, 2])).is_empty());
    }
}
