use serde_json::Value;
use verbena_pipeline::RequestContext;

use crate::error::ResolveError;

/// Capability of populating a typed record from a structured payload value
/// plus resolution context.
///
/// Implementations must tolerate missing optional sub-keys (substitute a
/// default) but fail with [`ResolveError::MalformedRecord`] when required
/// structure is absent or carries the wrong scalar type. The field helpers
/// in this module implement that rule.
pub trait Record: Sized + Send {
  fn populate(value: &Value, context: &RequestContext) -> Result<Self, ResolveError>;
}

/// Read a required string field at a dotted path; absent or non-string
/// fails with `MalformedRecord`.
pub fn required_str(value: &Value, path: &str) -> Result<String, ResolveError> {
  match verbena_pipeline::lookup_path(value, path) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(other) => Err(ResolveError::malformed(format!(
      "field '{}' is not a string (found {})",
      path,
      type_name(other)
    ))),
    None => Err(ResolveError::malformed(format!(
      "required field '{}' is missing",
      path
    ))),
  }
}

/// Read an optional string field at a dotted path; absent yields the empty
/// string, a present non-string still fails.
pub fn optional_str(value: &Value, path: &str) -> Result<String, ResolveError> {
  match verbena_pipeline::lookup_path(value, path) {
    Some(Value::String(s)) => Ok(s.clone()),
    Some(Value::Null) | None => Ok(String::new()),
    Some(other) => Err(ResolveError::malformed(format!(
      "field '{}' is not a string (found {})",
      path,
      type_name(other)
    ))),
  }
}

/// Read an optional array of strings at a dotted path; absent yields an
/// empty list, non-array or non-string elements fail.
pub fn string_list(value: &Value, path: &str) -> Result<Vec<String>, ResolveError> {
  match verbena_pipeline::lookup_path(value, path) {
    Some(Value::Array(items)) => items
      .iter()
      .map(|item| match item {
        Value::String(s) => Ok(s.clone()),
        other => Err(ResolveError::malformed(format!(
          "element of '{}' is not a string (found {})",
          path,
          type_name(other)
        ))),
      })
      .collect(),
    Some(Value::Null) | None => Ok(Vec::new()),
    Some(other) => Err(ResolveError::malformed(format!(
      "field '{}' is not an array (found {})",
      path,
      type_name(other)
    ))),
  }
}

fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
