//! Declarative validation specs for provider trigger configurations.
//!
//! Trigger providers accept dynamic JSON configs. Each provider publishes a
//! [`SchemaSpec`] value describing the shape it accepts; the runtime validates
//! configs at write time and again before matching events, so a malformed
//! config becomes a `skipped` event rather than a crash.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// The JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    Object,
    Array,
    /// Accept any JSON value.
    Any,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
            FieldKind::Any => true,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Any => "any",
        }
    }
}

/// One field in a [`SchemaSpec`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    kind: FieldKind,
    required: bool,
    /// For string fields, the closed set of accepted values (empty = open).
    one_of: Vec<String>,
}

/// A declarative object schema with a non-panicking parse.
///
/// `safe_parse` never raises; it returns either the accepted config (unknown
/// keys stripped) or a [`SchemaError`] listing every violation.
#[derive(Debug, Clone, Default)]
pub struct SchemaSpec {
    fields: BTreeMap<String, FieldSpec>,
}

impl SchemaSpec {
    /// Creates an empty object schema.
    pub fn object() -> Self {
        Self::default()
    }

    /// Adds a required field.
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                kind,
                required: true,
                one_of: Vec::new(),
            },
        );
        self
    }

    /// Adds an optional field.
    pub fn optional(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                kind,
                required: false,
                one_of: Vec::new(),
            },
        );
        self
    }

    /// Restricts a previously added string field to a closed value set.
    pub fn one_of<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(field) = self.fields.get_mut(name) {
            field.one_of = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Validates a JSON value against this schema.
    ///
    /// Returns the accepted config with unknown keys stripped, or an error
    /// listing every violation found.
    pub fn safe_parse(&self, value: &Value) -> Result<Value, SchemaError> {
        let Some(object) = value.as_object() else {
            return Err(SchemaError::single("$", "expected an object"));
        };

        let mut violations = Vec::new();
        let mut accepted = serde_json::Map::new();

        for (name, spec) in &self.fields {
            match object.get(name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        violations.push(Violation {
                            path: name.clone(),
                            message: "missing required field".to_owned(),
                        });
                    }
                }
                Some(value) => {
                    if !spec.kind.matches(value) {
                        violations.push(Violation {
                            path: name.clone(),
                            message: format!("expected {}", spec.kind.name()),
                        });
                    } else if !spec.one_of.is_empty() {
                        let matches_enum = value
                            .as_str()
                            .is_some_and(|s| spec.one_of.iter().any(|v| v == s));
                        if matches_enum {
                            accepted.insert(name.clone(), value.clone());
                        } else {
                            violations.push(Violation {
                                path: name.clone(),
                                message: format!("expected one of {:?}", spec.one_of),
                            });
                        }
                    } else {
                        accepted.insert(name.clone(), value.clone());
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(accepted))
        } else {
            Err(SchemaError { violations })
        }
    }

    /// Renders this spec as a JSON-Schema-shaped document for API listings.
    pub fn to_document(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for (name, spec) in &self.fields {
            let mut property = serde_json::Map::new();
            property.insert("type".to_owned(), Value::String(spec.kind.name().into()));
            if !spec.one_of.is_empty() {
                property.insert(
                    "enum".to_owned(),
                    Value::Array(
                        spec.one_of
                            .iter()
                            .map(|v| Value::String(v.clone()))
                            .collect(),
                    ),
                );
            }
            if spec.required {
                required.push(Value::String(name.clone()));
            }
            properties.insert(name.clone(), Value::Object(property));
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// One schema violation.
#[derive(Debug, Clone)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Validation failure listing every violation found.
#[derive(Debug, Clone)]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl std::error::Error for SchemaError {}

impl SchemaError {
    fn single(path: &str, message: &str) -> Self {
        Self {
            violations: vec![Violation {
                path: path.to_owned(),
                message: message.to_owned(),
            }],
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.path, violation.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn team_schema() -> SchemaSpec {
        SchemaSpec::object()
            .required("team", FieldKind::String)
            .optional("labels", FieldKind::Array)
            .optional("action", FieldKind::String)
            .one_of("action", ["create", "update"])
    }

    #[test]
    fn accepts_valid_config() {
        let parsed = team_schema()
            .safe_parse(&json!({"team": "ENG", "action": "create"}))
            .unwrap();
        assert_eq!(parsed, json!({"team": "ENG", "action": "create"}));
    }

    #[test]
    fn strips_unknown_keys() {
        let parsed = team_schema()
            .safe_parse(&json!({"team": "ENG", "bogus": 1}))
            .unwrap();
        assert_eq!(parsed, json!({"team": "ENG"}));
    }

    #[test]
    fn rejects_missing_required() {
        let err = team_schema().safe_parse(&json!({})).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "team");
    }

    #[test]
    fn rejects_wrong_type_and_bad_enum() {
        let err = team_schema()
            .safe_parse(&json!({"team": 42, "action": "delete"}))
            .unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn rejects_non_object() {
        assert!(team_schema().safe_parse(&json!("nope")).is_err());
    }

    #[test]
    fn document_lists_required_fields() {
        let doc = team_schema().to_document();
        assert_eq!(doc["required"], json!(["team"]));
        assert_eq!(doc["properties"]["action"]["enum"], json!(["create", "update"]));
    }
}
