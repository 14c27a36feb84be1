//! Declarative validation of untyped JSON
//!
//! A [`Schema`] describes the shape a request body (or any other JSON payload)
//! must have. [`validate`] walks the whole value and collects every violation
//! instead of stopping at the first one, so callers get a single report of the
//! form `"<path>: <reason>; <path>: <reason>"`. On success the value is
//! normalised (unknown object keys dropped, coerced numbers converted) and
//! [`parse`] hands it to serde to build the typed value.
//!
//! # Examples
//!
//! ```rust
//! use swimlog_common::schema::{validate, Field, Schema};
//!
//! let shape = Schema::object(vec![
//!     Field::required("name", Schema::non_empty_string()),
//!     Field::required("location", Schema::non_empty_string()),
//!     Field::required("date", Schema::Integer),
//! ]);
//!
//! let err = validate(&shape, &serde_json::json!({ "name": "", "date": "x" })).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "name: String must contain at least 1 character(s); location: Required; \
//!      date: Expected number, received string"
//! );
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[allow(clippy::unwrap_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A declared JSON shape
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Object with a fixed set of fields; undeclared keys are dropped
    Object(Vec<Field>),
    /// Homogeneous array with length bounds
    Array {
        items: Box<Schema>,
        min_len: usize,
        max_len: Option<usize>,
    },
    /// String, optionally required to be non-empty
    String { non_empty: bool },
    /// String shaped like an email address
    Email,
    /// String drawn from a fixed vocabulary
    OneOf(&'static [&'static str]),
    /// Whole number (floats with no fractional part are accepted)
    Integer,
    /// Finite number strictly greater than zero
    PositiveNumber,
    /// Number, or a string holding a number
    CoercedNumber,
}

/// A named member of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
        }
    }
}

impl Schema {
    pub fn object(fields: Vec<Field>) -> Self {
        Schema::Object(fields)
    }

    /// Array that must hold at least one element
    pub fn non_empty_array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_len: 1,
            max_len: None,
        }
    }

    /// Array holding between `min_len` and `max_len` elements
    pub fn bounded_array(items: Schema, min_len: usize, max_len: usize) -> Self {
        Schema::Array {
            items: Box::new(items),
            min_len,
            max_len: Some(max_len),
        }
    }

    pub fn string() -> Self {
        Schema::String { non_empty: false }
    }

    pub fn non_empty_string() -> Self {
        Schema::String { non_empty: true }
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Schema::OneOf(values)
    }
}

/// One step in the path to a violating value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    pub reason: String,
}

impl Violation {
    /// Dotted path to the offending value, `<root>` for the value itself
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".to_string();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.reason)
    }
}

/// Errors produced while checking a value against a schema
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("{}", render(.0))]
    Invalid(Vec<Violation>),

    /// The value passed the schema but serde could not build the target type.
    #[error("Validated value does not fit target type: {0}")]
    Shape(String),
}

impl SchemaError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            SchemaError::Invalid(violations) => violations,
            SchemaError::Shape(_) => &[],
        }
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check `value` against `schema`, returning the normalised value
pub fn validate(schema: &Schema, value: &Value) -> Result<Value, SchemaError> {
    let mut path = Vec::new();
    let mut violations = Vec::new();
    let normalised = check(schema, value, &mut path, &mut violations);

    match normalised {
        Some(value) if violations.is_empty() => Ok(value),
        _ => Err(SchemaError::Invalid(violations)),
    }
}

/// Check `value` against `schema` and deserialize the result into `T`
pub fn parse<T: DeserializeOwned>(schema: &Schema, value: &Value) -> Result<T, SchemaError> {
    let normalised = validate(schema, value)?;
    serde_json::from_value(normalised).map_err(|e| SchemaError::Shape(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("Expected {}, received {}", expected, kind_of(value))
}

fn reject(out: &mut Vec<Violation>, path: &[PathSegment], reason: String) -> Option<Value> {
    out.push(Violation {
        path: path.to_vec(),
        reason,
    });
    None
}

fn check(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    match schema {
        Schema::Object(fields) => {
            let Value::Object(members) = value else {
                return reject(out, path, mismatch("object", value));
            };
            check_object(fields, members, path, out)
        },
        Schema::Array {
            items,
            min_len,
            max_len,
        } => {
            let Value::Array(elements) = value else {
                return reject(out, path, mismatch("array", value));
            };
            check_array(items, *min_len, *max_len, elements, path, out)
        },
        Schema::String { non_empty } => match value {
            Value::String(s) if *non_empty && s.is_empty() => reject(
                out,
                path,
                "String must contain at least 1 character(s)".to_string(),
            ),
            Value::String(_) => Some(value.clone()),
            _ => reject(out, path, mismatch("string", value)),
        },
        Schema::Email => match value {
            Value::String(s) if EMAIL_PATTERN.is_match(s) => Some(value.clone()),
            Value::String(_) => reject(out, path, "Invalid email".to_string()),
            _ => reject(out, path, mismatch("string", value)),
        },
        Schema::OneOf(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => Some(value.clone()),
            Value::String(s) => {
                let expected = allowed
                    .iter()
                    .map(|a| format!("'{}'", a))
                    .collect::<Vec<_>>()
                    .join(" | ");
                reject(
                    out,
                    path,
                    format!("Invalid enum value. Expected {}, received '{}'", expected, s),
                )
            },
            _ => reject(out, path, mismatch("string", value)),
        },
        Schema::Integer => match value {
            Value::Number(n) => match as_whole(n) {
                Some(i) => Some(Value::from(i)),
                None => reject(out, path, "Expected integer, received float".to_string()),
            },
            _ => reject(out, path, mismatch("number", value)),
        },
        Schema::PositiveNumber => match value.as_f64() {
            Some(n) if n.is_finite() && n > 0.0 => Some(value.clone()),
            Some(_) => reject(out, path, "Number must be greater than 0".to_string()),
            None => reject(out, path, mismatch("number", value)),
        },
        Schema::CoercedNumber => match value {
            Value::Number(_) => Some(value.clone()),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(number_value(n)),
                _ => reject(out, path, mismatch("number", value)),
            },
            _ => reject(out, path, mismatch("number", value)),
        },
    }
}

fn check_object(
    fields: &[Field],
    members: &Map<String, Value>,
    path: &mut Vec<PathSegment>,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let mut normalised = Map::new();
    let mut valid = true;

    for field in fields {
        path.push(PathSegment::Key(field.name));
        match members.get(field.name) {
            Some(member) => match check(&field.schema, member, path, out) {
                Some(v) => {
                    normalised.insert(field.name.to_string(), v);
                },
                None => valid = false,
            },
            None if field.required => {
                out.push(Violation {
                    path: path.clone(),
                    reason: "Required".to_string(),
                });
                valid = false;
            },
            None => {},
        }
        path.pop();
    }

    valid.then_some(Value::Object(normalised))
}

fn check_array(
    items: &Schema,
    min_len: usize,
    max_len: Option<usize>,
    elements: &[Value],
    path: &mut Vec<PathSegment>,
    out: &mut Vec<Violation>,
) -> Option<Value> {
    let mut valid = true;

    if elements.len() < min_len {
        out.push(Violation {
            path: path.clone(),
            reason: format!("Array must contain at least {} element(s)", min_len),
        });
        valid = false;
    }

    if let Some(max_len) = max_len.filter(|max| elements.len() > *max) {
        out.push(Violation {
            path: path.clone(),
            reason: format!("Array must contain at most {} element(s)", max_len),
        });
        valid = false;
    }

    let mut normalised = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        path.push(PathSegment::Index(index));
        match check(items, element, path, out) {
            Some(v) => normalised.push(v),
            None => valid = false,
        }
        path.pop();
    }

    valid.then_some(Value::Array(normalised))
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn as_whole(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER {
        Some(f as i64)
    } else {
        None
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    fn meet_schema() -> Schema {
        Schema::object(vec![
            Field::required("name", Schema::non_empty_string()),
            Field::required("location", Schema::non_empty_string()),
            Field::required("date", Schema::Integer),
        ])
    }

    #[test]
    fn test_empty_name_is_reported_by_path() {
        let err = validate(
            &meet_schema(),
            &json!({ "name": "", "location": "Pool", "date": 20240101 }),
        )
        .unwrap_err();

        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path_string(), "name");
        assert!(err.to_string().starts_with("name: "));
    }

    #[test]
    fn test_every_violation_is_collected() {
        let err = validate(&meet_schema(), &json!({ "name": 3, "date": 1.5 })).unwrap_err();

        assert_eq!(
            err.to_string(),
            "name: Expected string, received number; location: Required; \
             date: Expected integer, received float"
        );
    }

    #[test]
    fn test_array_paths_use_indices() {
        let shape = Schema::non_empty_array(Schema::object(vec![Field::required(
            "time",
            Schema::PositiveNumber,
        )]));

        let err = validate(&shape, &json!([{ "time": 12.5 }, { "time": -1 }])).unwrap_err();
        assert_eq!(err.to_string(), "1.time: Number must be greater than 0");

        let err = validate(&shape, &json!([])).unwrap_err();
        assert_eq!(err.to_string(), "<root>: Array must contain at least 1 element(s)");

        let err = validate(&shape, &json!({ "time": 1 })).unwrap_err();
        assert_eq!(err.to_string(), "<root>: Expected array, received object");
    }

    #[test]
    fn test_array_upper_bound() {
        let shape = Schema::bounded_array(Schema::Integer, 1, 2);

        assert_eq!(validate(&shape, &json!([1, 2])).unwrap(), json!([1, 2]));

        let err = validate(&shape, &json!([1, 2, 3.5])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<root>: Array must contain at most 2 element(s); 2: Expected integer, received float"
        );
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let value = validate(
            &meet_schema(),
            &json!({ "name": "Dual", "location": "Pool", "date": 20240101, "extra": true }),
        )
        .unwrap();

        assert_eq!(value, json!({ "name": "Dual", "location": "Pool", "date": 20240101 }));
    }

    #[test]
    fn test_optional_fields_may_be_absent_but_not_wrong() {
        let shape = Schema::object(vec![
            Field::optional("email", Schema::Email),
            Field::optional("email_verified", Schema::one_of(&["true", "false"])),
        ]);

        assert_eq!(validate(&shape, &json!({})).unwrap(), json!({}));

        let err = validate(&shape, &json!({ "email": "nope", "email_verified": true }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "email: Invalid email; email_verified: Expected string, received boolean"
        );
    }

    #[test]
    fn test_enum_reports_allowed_values() {
        let err = validate(&Schema::one_of(&["flat", "relay"]), &json!("dive")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<root>: Invalid enum value. Expected 'flat' | 'relay', received 'dive'"
        );
    }

    #[test]
    fn test_coerced_numbers_accept_numeric_strings() {
        assert_eq!(
            validate(&Schema::CoercedNumber, &json!("1700000000")).unwrap(),
            json!(1700000000)
        );
        assert_eq!(validate(&Schema::CoercedNumber, &json!("2.5")).unwrap(), json!(2.5));
        assert_eq!(validate(&Schema::CoercedNumber, &json!(7)).unwrap(), json!(7));
        assert!(validate(&Schema::CoercedNumber, &json!("soon")).is_err());
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        assert_eq!(validate(&Schema::Integer, &json!(2027.0)).unwrap(), json!(2027));
    }

    #[test]
    fn test_parse_builds_typed_value() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Meet {
            name: String,
            location: String,
            date: i64,
        }

        let meet: Meet = parse(
            &meet_schema(),
            &json!({ "name": "Dual", "location": "Pool", "date": 20240101 }),
        )
        .unwrap();

        assert_eq!(
            meet,
            Meet {
                name: "Dual".to_string(),
                location: "Pool".to_string(),
                date: 20240101,
            }
        );
    }

    proptest! {
        #[test]
        fn prop_positive_numbers_pass(n in 1e-9f64..1e9) {
            prop_assert!(validate(&Schema::PositiveNumber, &json!(n)).is_ok());
        }

        #[test]
        fn prop_non_positive_numbers_fail(n in -1e9f64..=0.0) {
            prop_assert!(validate(&Schema::PositiveNumber, &json!(n)).is_err());
        }
    }
}
