//! JSON schema validation of request input
//!
//! A route may declare one schema per request part (body, query, path
//! params). Each declared schema becomes a validation stage that rejects
//! non-conforming input with `INVALID_INPUT`, carrying a
//! [`ValidationReport`] as details.
//!
//! Validation bans unknown properties: an object schema that lists
//! `properties` or `patternProperties` rejects any other property unless it
//! declares `additionalProperties` itself. Properties split across `allOf`
//! branches are therefore each rejected by the other branches; declare them
//! in one schema instead.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::{errors::ConfigurationError, route::InputPart};

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

/// Compiled schema for one request part.
pub struct InputValidator {
    part: InputPart,
    schema: Value,
    validator: jsonschema::Validator,
}

impl InputValidator {
    /// Compile `schema` for `part`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSchema` if the schema is not a
    /// JSON object or is not a valid JSON schema.
    pub fn compile(part: InputPart, schema: Value) -> Result<Self, ConfigurationError> {
        if !schema.is_object() {
            return Err(ConfigurationError::InvalidSchema {
                part: part.to_string(),
                reason: "Schema must be a JSON object".to_string(),
            });
        }

        let mut strict = schema.clone();
        ban_unknown_properties(&mut strict);

        let validator =
            jsonschema::validator_for(&strict).map_err(|e| ConfigurationError::InvalidSchema {
                part: part.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            part,
            schema,
            validator,
        })
    }

    pub fn part(&self) -> InputPart {
        self.part
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate `data`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns the client-facing report when `data` does not conform.
    pub fn validate(&self, data: &Value) -> Result<(), ValidationReport> {
        let errors: Vec<ValidationFailure> = self
            .validator
            .iter_errors(data)
            .map(|e| ValidationFailure {
                message: e.to_string(),
                code: e.kind().keyword().to_string(),
                instance_path: e.instance_path().to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport::failed(self.part, errors))
        }
    }
}

impl fmt::Debug for InputValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputValidator")
            .field("part", &self.part)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Validation outcome sent to clients.
///
/// Only client-facing fields are included. Internal diagnostics of the
/// validator, such as schema locations, never appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,

    /// Request part that failed validation
    pub part: InputPart,

    /// First violation found
    pub error: Option<ValidationFailure>,

    /// All violations found
    pub errors: Vec<ValidationFailure>,
}

impl ValidationReport {
    fn failed(part: InputPart, errors: Vec<ValidationFailure>) -> Self {
        Self {
            valid: false,
            part,
            error: errors.first().cloned(),
            errors,
        }
    }
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    pub message: String,

    /// Schema keyword that failed, e.g. `required` or `type`
    pub code: String,

    /// JSON pointer to the offending value in the request data; empty for
    /// the root
    pub instance_path: String,
}

/// Add `additionalProperties: false` to every object schema listing
/// properties without declaring `additionalProperties`.
fn ban_unknown_properties(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    let lists_properties =
        map.contains_key("properties") || map.contains_key("patternProperties");
    if lists_properties && !map.contains_key("additionalProperties") {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    for (keyword, value) in map.iter_mut() {
        match keyword.as_str() {
            // maps of name to subschema
            "properties" | "patternProperties" | "definitions" | "$defs"
            | "dependentSchemas" => {
                if let Value::Object(subschemas) = value {
                    subschemas.values_mut().for_each(ban_unknown_properties);
                }
            }
            // a subschema or a list of subschemas
            "items" | "additionalItems" | "prefixItems" | "allOf" | "anyOf" | "oneOf" => {
                match value {
                    Value::Array(subschemas) => {
                        subschemas.iter_mut().for_each(ban_unknown_properties)
                    }
                    subschema => ban_unknown_properties(subschema),
                }
            }
            "not" | "if" | "then" | "else" | "contains" | "propertyNames"
            | "additionalProperties" => ban_unknown_properties(value),
            _ => {}
        }
    }
}
