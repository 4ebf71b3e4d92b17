//! # Schema Validation
//!
//! Two pure checks sit at the heart of dynaschema:
//!
//! - [`validate_schema_structure`] decides whether a submitted attribute mapping is well-formed.
//! - [`validate_data_against_schema`] decides whether a payload conforms to a compiled
//!   [`AttributeMap`].
//!
//! Neither stops at the first problem. Every violation found in one pass lands in the returned
//! [`ValidationResult`], in the order the fields were supplied.
//!
//! ## Usage Examples
//!
//! ```rust
//! use dynaschema::{AttributeMap, validate_data_against_schema, validate_schema_structure};
//! use serde_json::json;
//!
//! let attributes = json!({
//!     "firstName": {"type": "string"},
//!     "age": {"type": "number"}
//! });
//! let raw = attributes.as_object().unwrap();
//! assert!(validate_schema_structure(raw).is_valid);
//!
//! let schema = AttributeMap::compile(raw);
//! let result = validate_data_against_schema(&json!({"age": "thirty"}), &schema);
//! assert_eq!(
//!     result.errors(),
//!     ["Invalid value for field: firstName", "Invalid value for field: age"]
//! );
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::attribute::{
    AttributeDefinition, AttributeMap, AttributeType, IS_ARRAY_KEY, IS_OBJECT_KEY, PROPERTIES_KEY,
    TYPE_KEY, flag,
};

/// Default bound on how many attribute maps may nest inside one another.
pub const DEFAULT_MAX_DEPTH: usize = 32;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

////////////////////////////////////////////// Results //////////////////////////////////////////////

/// Outcome of either validation pass.
///
/// `errors` is `None` exactly when `is_valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether no violations were found.
    pub is_valid: bool,
    /// Every violation, in discovery order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ValidationResult {
    /// A passing result.
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: None,
        }
    }

    fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::valid()
        } else {
            Self {
                is_valid: false,
                errors: Some(errors),
            }
        }
    }

    /// The violations, empty for a passing result.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Treats a failure as a malformed schema definition.
    pub fn into_structural(self) -> Result<(), ValidationError> {
        if self.is_valid {
            return Ok(());
        }
        Err(ValidationError::Structural {
            errors: self.errors.unwrap_or_default(),
        })
    }

    /// Treats a failure as a payload that does not conform to its schema.
    pub fn into_data_mismatch(self) -> Result<(), ValidationError> {
        if self.is_valid {
            return Ok(());
        }
        Err(ValidationError::DataMismatch {
            errors: self.errors.unwrap_or_default(),
        })
    }
}

/// A failed validation, classified by what was being validated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The schema definition itself is malformed.
    #[error("Invalid schema structure")]
    Structural {
        /// Violations reported by [`validate_schema_structure`].
        errors: Vec<String>,
    },
    /// A payload does not conform to an already-valid schema.
    #[error("Invalid data format")]
    DataMismatch {
        /// Violations reported by [`validate_data_against_schema`].
        errors: Vec<String>,
    },
}

impl ValidationError {
    /// The individual violations.
    pub fn errors(&self) -> &[String] {
        match self {
            ValidationError::Structural { errors } | ValidationError::DataMismatch { errors } => {
                errors
            }
        }
    }
}

/// Bounds applied while checking schema structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum number of nested attribute maps, counting the top level as one.
    pub max_depth: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

//////////////////////////////////////// Structural validation ////////////////////////////////////////

/// Checks that an attribute mapping is well-formed, using [`ValidationLimits::default`].
///
/// Every field must carry one of the six type tags. Fields typed `object` that also carry
/// `properties` have those checked recursively, and nested messages are prefixed with the
/// field name and a dot. `isArray` and `isObject` are not cross-checked against `type`.
///
/// `properties` under any other type are not checked, but when `isObject` makes data validation
/// walk them they still count towards [`ValidationLimits::max_depth`].
///
/// ```rust
/// use dynaschema::validate_schema_structure;
/// use serde_json::json;
///
/// let attributes = json!({"x": {"type": "bogus"}});
/// let result = validate_schema_structure(attributes.as_object().unwrap());
/// assert_eq!(
///     result.errors(),
///     [r#"Invalid type "bogus" for field "x". Valid types are: string, number, boolean, date, array, object"#]
/// );
/// ```
pub fn validate_schema_structure(attributes: &Map<String, Value>) -> ValidationResult {
    validate_schema_structure_with_limits(attributes, &ValidationLimits::default())
}

/// Checks that an attribute mapping is well-formed under explicit limits.
pub fn validate_schema_structure_with_limits(
    attributes: &Map<String, Value>,
    limits: &ValidationLimits,
) -> ValidationResult {
    ValidationResult::from_errors(structure_errors(attributes, 1, limits))
}

fn structure_errors(
    attributes: &Map<String, Value>,
    depth: usize,
    limits: &ValidationLimits,
) -> Vec<String> {
    let mut errors = Vec::new();

    for (name, attribute) in attributes {
        let definition = attribute.as_object();
        let ty = AttributeType::from_value(definition.and_then(|d| d.get(TYPE_KEY)));
        if !ty.is_valid() {
            errors.push(format!(
                "Invalid type \"{}\" for field \"{}\". Valid types are: {}",
                ty,
                name,
                AttributeType::valid_type_list()
            ));
        }

        if ty != AttributeType::Object {
            // Data validation still walks these through `isObject`, so their depth counts.
            if let Some(properties) = definition.and_then(walked_properties) {
                if depth >= limits.max_depth || exceeds_depth(properties, depth + 1, limits) {
                    errors.push(depth_error(limits, name));
                }
            }
            continue;
        }
        match definition.and_then(|d| d.get(PROPERTIES_KEY)) {
            None => {}
            Some(properties) if is_falsy(properties) => {}
            Some(Value::Object(properties)) => {
                if depth >= limits.max_depth {
                    errors.push(depth_error(limits, name));
                    continue;
                }
                errors.extend(
                    structure_errors(properties, depth + 1, limits)
                        .into_iter()
                        .map(|nested| format!("{}.{}", name, nested)),
                );
            }
            Some(_) => errors.push(format!(
                "Invalid properties for field \"{}\". Properties must map field names to attribute definitions",
                name
            )),
        }
    }

    errors
}

fn depth_error(limits: &ValidationLimits, name: &str) -> String {
    format!(
        "Nesting depth exceeds the maximum of {} for field \"{}\"",
        limits.max_depth, name
    )
}

/// `null`, `false`, `0` and `""` all count as no properties at all.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// The properties that [`AttributeDefinition::compile`] would turn into a nested map.
fn walked_properties(definition: &Map<String, Value>) -> Option<&Map<String, Value>> {
    if flag(definition, IS_ARRAY_KEY) || !flag(definition, IS_OBJECT_KEY) {
        return None;
    }
    definition.get(PROPERTIES_KEY).and_then(Value::as_object)
}

/// Whether any map reachable from `attributes`, itself at `depth`, nests past the limit.
fn exceeds_depth(attributes: &Map<String, Value>, depth: usize, limits: &ValidationLimits) -> bool {
    attributes.values().filter_map(Value::as_object).any(|definition| {
        let nested = match walked_properties(definition) {
            Some(properties) => Some(properties),
            None if definition.get(TYPE_KEY) == Some(&Value::from("object")) => {
                definition.get(PROPERTIES_KEY).and_then(Value::as_object)
            }
            None => None,
        };
        nested.is_some_and(|properties| {
            depth >= limits.max_depth || exceeds_depth(properties, depth + 1, limits)
        })
    })
}

/////////////////////////////////////////// Data validation ///////////////////////////////////////////

/// Checks a payload against a compiled schema.
///
/// Each schema field is looked up in `data` (absent when missing, or when `data` is not an
/// object) and checked with [`validate_field`]. A failing field contributes
/// `Invalid value for field: <name>`. Fields in `data` that the schema does not mention are
/// ignored, and no field is ever required to be present beyond what its type demands.
pub fn validate_data_against_schema(data: &Value, schema: &AttributeMap) -> ValidationResult {
    let object = data.as_object();
    let errors = schema
        .iter()
        .filter(|(name, definition)| {
            !validate_field(object.and_then(|o| o.get(*name)), definition)
        })
        .map(|(name, _)| format!("Invalid value for field: {}", name))
        .collect();
    ValidationResult::from_errors(errors)
}

/// Checks one value against one compiled field definition.
///
/// `None` stands for a missing value, which no shape accepts.
pub fn validate_field(value: Option<&Value>, definition: &AttributeDefinition) -> bool {
    match definition {
        AttributeDefinition::ArrayOf(ty) => match value {
            Some(Value::Array(items)) => items.iter().all(|item| validate_type(Some(item), ty)),
            _ => false,
        },
        AttributeDefinition::ObjectWith(properties) => match (value, properties) {
            (Some(Value::Object(_)), None) => true,
            (Some(Value::Object(object)), Some(properties)) => properties
                .iter()
                .all(|(key, nested)| validate_field(object.get(key), nested)),
            _ => false,
        },
        AttributeDefinition::Scalar(ty) => validate_type(value, ty),
    }
}

/// Checks one value against a bare type tag.
///
/// `array` and `object` never pass here; they are only reachable through the `isArray` and
/// `isObject` flags.
pub fn validate_type(value: Option<&Value>, ty: &AttributeType) -> bool {
    let Some(value) = value else {
        return false;
    };
    match ty {
        AttributeType::String => value.is_string(),
        AttributeType::Number => value.as_f64().is_some_and(|n| !n.is_nan()),
        AttributeType::Boolean => value.is_boolean(),
        AttributeType::Date => value.as_str().is_some_and(parses_as_date),
        AttributeType::Array | AttributeType::Object | AttributeType::Unknown(_) => false,
    }
}

/// Whether `text` names a valid calendar date or instant.
///
/// Accepts RFC 3339 and RFC 2822 timestamps, ISO-8601 local date-times, calendar dates, and the
/// reduced `YYYY-MM` and `YYYY` forms.
pub fn parses_as_date(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_rfc2822(text).is_ok()
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || is_year_month(text)
        || is_year(text)
}

fn is_year_month(text: &str) -> bool {
    match text.split_once('-') {
        Some((year, month)) if is_year(year) && month.len() == 2 => {
            NaiveDate::parse_from_str(&format!("{}-{}-01", year, month), "%Y-%m-%d").is_ok()
        }
        _ => false,
    }
}

fn is_year(text: &str) -> bool {
    text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_TYPES: &str = "Valid types are: string, number, boolean, date, array, object";

    fn structure(attributes: Value) -> ValidationResult {
        validate_schema_structure(attributes.as_object().unwrap())
    }

    fn data(data: Value, attributes: Value) -> ValidationResult {
        validate_data_against_schema(&data, &AttributeMap::from_value(&attributes))
    }

    fn field(value: Value, definition: Value) -> bool {
        validate_field(Some(&value), &AttributeDefinition::compile(&definition))
    }

    fn nested_schema(levels: usize) -> Value {
        let mut schema = json!({"leaf": {"type": "string"}});
        for _ in 1..levels {
            schema = json!({"n": {"type": "object", "properties": schema}});
        }
        schema
    }

    #[test]
    fn structure_accepts_all_valid_types() {
        let result = structure(json!({
            "a": {"type": "string"},
            "b": {"type": "number"},
            "c": {"type": "boolean"},
            "d": {"type": "date"},
            "e": {"type": "array", "isArray": true},
            "f": {"type": "object", "isObject": true}
        }));
        assert_eq!(result, ValidationResult::valid());
        assert!(result.errors.is_none());
    }

    #[test]
    fn structure_rejects_unknown_type() {
        let result = structure(json!({"x": {"type": "bogus"}}));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            Some(vec![format!(
                "Invalid type \"bogus\" for field \"x\". {}",
                VALID_TYPES
            )])
        );
    }

    #[test]
    fn structure_prefixes_nested_errors() {
        let result = structure(json!({
            "addr": {"type": "object", "properties": {"zip": {"type": "bogus"}}}
        }));
        assert_eq!(
            result.errors(),
            [format!(
                "addr.Invalid type \"bogus\" for field \"zip\". {}",
                VALID_TYPES
            )]
        );
    }

    #[test]
    fn structure_prefixes_every_level() {
        let result = structure(json!({
            "a": {"type": "object", "properties": {
                "b": {"type": "object", "properties": {"c": {"type": "nope"}}}
            }}
        }));
        assert_eq!(
            result.errors(),
            [format!("a.b.Invalid type \"nope\" for field \"c\". {}", VALID_TYPES)]
        );
    }

    #[test]
    fn structure_accumulates_all_errors_in_order() {
        let result = structure(json!({
            "first": {"type": "text"},
            "ok": {"type": "string"},
            "second": {"type": "int"}
        }));
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].contains("\"first\""));
        assert!(result.errors()[1].contains("\"second\""));
    }

    #[test]
    fn structure_accepts_object_without_properties() {
        assert!(structure(json!({"blob": {"type": "object"}})).is_valid);
    }

    #[test]
    fn structure_ignores_flag_consistency() {
        assert!(structure(json!({"tags": {"type": "string", "isArray": true}})).is_valid);
        assert!(structure(json!({"meta": {"type": "number", "isObject": true}})).is_valid);
    }

    #[test]
    fn structure_skips_properties_of_non_object_types() {
        let result = structure(json!({
            "odd": {"type": "string", "isObject": true, "properties": {"z": {"type": "bogus"}}}
        }));
        assert!(result.is_valid);
    }

    #[test]
    fn structure_reports_missing_and_non_string_types() {
        let result = structure(json!({"a": {}, "b": {"type": 5}, "c": "string"}));
        assert_eq!(
            result.errors(),
            [
                format!("Invalid type \"undefined\" for field \"a\". {}", VALID_TYPES),
                format!("Invalid type \"5\" for field \"b\". {}", VALID_TYPES),
                format!("Invalid type \"undefined\" for field \"c\". {}", VALID_TYPES),
            ]
        );
    }

    #[test]
    fn structure_rejects_non_mapping_properties() {
        let result = structure(json!({"addr": {"type": "object", "properties": ["zip"]}}));
        assert_eq!(
            result.errors(),
            ["Invalid properties for field \"addr\". Properties must map field names to attribute definitions"]
        );
        assert!(structure(json!({"addr": {"type": "object", "properties": null}})).is_valid);
    }

    #[test]
    fn structure_is_idempotent() {
        let attributes = json!({
            "x": {"type": "bogus"},
            "addr": {"type": "object", "properties": {"zip": {"type": "bogus"}}}
        });
        assert_eq!(structure(attributes.clone()), structure(attributes));
    }

    #[test]
    fn structure_depth_cap() {
        let limits = ValidationLimits { max_depth: 3 };
        let at_limit = nested_schema(3);
        assert!(validate_schema_structure_with_limits(at_limit.as_object().unwrap(), &limits).is_valid);

        let too_deep = nested_schema(4);
        let result = validate_schema_structure_with_limits(too_deep.as_object().unwrap(), &limits);
        assert_eq!(
            result.errors(),
            ["n.n.Nesting depth exceeds the maximum of 3 for field \"n\""]
        );
    }

    fn flagged_chain(levels: usize) -> Value {
        let mut schema = json!({"leaf": {"type": "string"}});
        for _ in 1..levels {
            schema = json!({"n": {"type": "string", "isObject": true, "properties": schema}});
        }
        schema
    }

    #[test]
    fn structure_depth_cap_counts_is_object_branches() {
        let limits = ValidationLimits { max_depth: 3 };
        let at_limit = flagged_chain(3);
        assert!(validate_schema_structure_with_limits(at_limit.as_object().unwrap(), &limits).is_valid);

        for levels in [4, 20] {
            let too_deep = flagged_chain(levels);
            let result =
                validate_schema_structure_with_limits(too_deep.as_object().unwrap(), &limits);
            assert_eq!(
                result.errors(),
                ["Nesting depth exceeds the maximum of 3 for field \"n\""]
            );
        }
    }

    #[test]
    fn structure_depth_cap_through_object_then_flagged_branch() {
        let limits = ValidationLimits { max_depth: 2 };
        let attributes = json!({
            "a": {"type": "object", "properties": {
                "b": {"type": "number", "isObject": true, "properties": {
                    "c": {"type": "string"}
                }}
            }}
        });
        let result = validate_schema_structure_with_limits(attributes.as_object().unwrap(), &limits);
        assert_eq!(
            result.errors(),
            ["a.Nesting depth exceeds the maximum of 2 for field \"b\""]
        );
    }

    #[test]
    fn structure_depth_ignores_properties_that_are_never_walked() {
        let limits = ValidationLimits { max_depth: 1 };
        let attributes = json!({
            "tags": {"type": "string", "isArray": true, "isObject": true, "properties": {"x": {}}},
            "note": {"type": "string", "properties": {"x": {}}}
        });
        assert!(validate_schema_structure_with_limits(attributes.as_object().unwrap(), &limits).is_valid);
    }

    #[test]
    fn structure_treats_falsy_properties_as_absent() {
        for properties in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            let result = structure(json!({"addr": {"type": "object", "properties": properties}}));
            assert!(result.is_valid, "{properties} should count as absent");
        }
        for properties in [json!(true), json!(1), json!("zip"), json!([{"type": "string"}])] {
            let result = structure(json!({"addr": {"type": "object", "properties": properties}}));
            assert_eq!(
                result.errors(),
                ["Invalid properties for field \"addr\". Properties must map field names to attribute definitions"],
                "{properties} should be rejected"
            );
        }
    }

    #[test]
    fn structure_default_depth_allows_reasonable_nesting() {
        assert!(structure(nested_schema(DEFAULT_MAX_DEPTH)).is_valid);
        assert!(!structure(nested_schema(DEFAULT_MAX_DEPTH + 1)).is_valid);
    }

    #[test]
    fn data_valid_payload() {
        let result = data(
            json!({"firstName": "John", "age": 30}),
            json!({"firstName": {"type": "string"}, "age": {"type": "number"}}),
        );
        assert!(result.is_valid);
        assert!(result.errors.is_none());
    }

    #[test]
    fn data_type_mismatch() {
        let result = data(json!({"age": "thirty"}), json!({"age": {"type": "number"}}));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            Some(vec!["Invalid value for field: age".to_string()])
        );
    }

    #[test]
    fn data_missing_field_fails_its_type_check() {
        let result = data(
            json!({"firstName": "John"}),
            json!({"firstName": {"type": "string"}, "email": {"type": "string", "required": false}}),
        );
        assert_eq!(result.errors(), ["Invalid value for field: email"]);
    }

    #[test]
    fn data_extra_fields_are_ignored() {
        let result = data(
            json!({"name": "x", "extra": [1, 2, 3]}),
            json!({"name": {"type": "string"}}),
        );
        assert!(result.is_valid);
    }

    #[test]
    fn data_non_object_payload_treats_fields_as_missing() {
        let result = data(json!([1, 2]), json!({"a": {"type": "string"}}));
        assert_eq!(result.errors(), ["Invalid value for field: a"]);
        assert!(data(json!(null), json!({})).is_valid);
    }

    #[test]
    fn data_errors_follow_schema_order() {
        let result = data(
            json!({}),
            json!({"zeta": {"type": "string"}, "alpha": {"type": "number"}}),
        );
        assert_eq!(
            result.errors(),
            ["Invalid value for field: zeta", "Invalid value for field: alpha"]
        );
    }

    #[test]
    fn array_field_rejects_mixed_elements() {
        assert!(!field(json!([1, 2, "x"]), json!({"isArray": true, "type": "number"})));
        assert!(field(json!([1, 2.5, -3]), json!({"isArray": true, "type": "number"})));
        assert!(field(json!([]), json!({"isArray": true, "type": "number"})));
        assert!(!field(json!("1,2"), json!({"isArray": true, "type": "number"})));
    }

    #[test]
    fn array_elements_never_get_property_validation() {
        let definition = json!({
            "isArray": true,
            "type": "object",
            "properties": {"id": {"type": "number"}}
        });
        assert!(!field(json!([{"id": 1}]), definition.clone()));
        assert!(field(json!([]), definition));
    }

    #[test]
    fn array_of_dates() {
        let definition = json!({"isArray": true, "type": "date"});
        assert!(field(json!(["2024-01-01", "2024-02-29T10:00:00Z"]), definition.clone()));
        assert!(!field(json!(["2024-01-01", "later"]), definition));
    }

    #[test]
    fn opaque_object_accepts_any_object() {
        assert!(field(json!({"anything": 123}), json!({"isObject": true})));
        assert!(field(json!({}), json!({"isObject": true, "type": "object"})));
        assert!(!field(json!(null), json!({"isObject": true})));
        assert!(!field(json!([1]), json!({"isObject": true})));
    }

    #[test]
    fn object_properties_validated_recursively() {
        let definition = json!({
            "isObject": true,
            "type": "object",
            "properties": {
                "street": {"type": "string"},
                "geo": {"isObject": true, "type": "object", "properties": {
                    "lat": {"type": "number"},
                    "lng": {"type": "number"}
                }}
            }
        });
        assert!(field(
            json!({"street": "Main", "geo": {"lat": 1.5, "lng": 2}}),
            definition.clone()
        ));
        assert!(!field(
            json!({"street": "Main", "geo": {"lat": "north", "lng": 2}}),
            definition.clone()
        ));
        assert!(!field(json!({"street": "Main"}), definition));
    }

    #[test]
    fn bare_object_type_rejects_everything() {
        let definition = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        assert!(!field(json!({"a": "x"}), definition));
        assert!(!field(json!([]), json!({"type": "array"})));
    }

    #[test]
    fn missing_value_fails_every_shape() {
        for definition in [
            AttributeDefinition::Scalar(AttributeType::String),
            AttributeDefinition::ArrayOf(AttributeType::Number),
            AttributeDefinition::ObjectWith(None),
        ] {
            assert!(!validate_field(None, &definition));
        }
    }

    #[test]
    fn scalar_types() {
        assert!(validate_type(Some(&json!("hi")), &AttributeType::String));
        assert!(!validate_type(Some(&json!(1)), &AttributeType::String));
        assert!(validate_type(Some(&json!(0)), &AttributeType::Number));
        assert!(validate_type(Some(&json!(-2.5)), &AttributeType::Number));
        assert!(!validate_type(Some(&json!("30")), &AttributeType::Number));
        assert!(validate_type(Some(&json!(false)), &AttributeType::Boolean));
        assert!(!validate_type(Some(&json!("true")), &AttributeType::Boolean));
        assert!(!validate_type(Some(&json!(null)), &AttributeType::Boolean));
        assert!(!validate_type(
            Some(&json!("x")),
            &AttributeType::Unknown("bogus".to_string())
        ));
    }

    #[test]
    fn date_acceptance() {
        assert!(validate_type(
            Some(&json!("2024-01-01T00:00:00Z")),
            &AttributeType::Date
        ));
        assert!(!validate_type(Some(&json!("not-a-date")), &AttributeType::Date));
        assert!(!validate_type(Some(&json!(1704067200000_u64)), &AttributeType::Date));
    }

    #[test]
    fn date_formats() {
        for text in [
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00.123+02:00",
            "2024-01-01",
            "2024-01-01T08:30:00",
            "2024-01-01 08:30:00",
            "2024-01-01T08:30",
            "Mon, 01 Jan 2024 00:00:00 +0000",
            "2024-06",
            "2024",
        ] {
            assert!(parses_as_date(text), "{text} should parse");
        }
        for text in ["", "   ", "2024-13-01", "2024-02-30", "yesterday", "24", "2024-1x"] {
            assert!(!parses_as_date(text), "{text} should not parse");
        }
    }

    #[test]
    fn result_serializes_camel_case_without_empty_errors() {
        assert_eq!(
            serde_json::to_value(ValidationResult::valid()).unwrap(),
            json!({"isValid": true})
        );
        let failed = data(json!({"age": "x"}), json!({"age": {"type": "number"}}));
        assert_eq!(
            serde_json::to_value(failed).unwrap(),
            json!({"isValid": false, "errors": ["Invalid value for field: age"]})
        );
    }

    #[test]
    fn result_classification() {
        let failed = structure(json!({"x": {"type": "bogus"}}));
        let error = failed.into_structural().unwrap_err();
        assert_eq!(error.to_string(), "Invalid schema structure");
        assert_eq!(error.errors().len(), 1);

        let failed = data(json!({}), json!({"x": {"type": "string"}}));
        let error = failed.into_data_mismatch().unwrap_err();
        assert_eq!(error.to_string(), "Invalid data format");

        assert!(ValidationResult::valid().into_structural().is_ok());
    }
}
