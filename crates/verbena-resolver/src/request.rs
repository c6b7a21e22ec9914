use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use verbena_pipeline::RequestContext;

/// One field-resolution invocation: the named operation, its argument map
/// and the caller/transport context.
///
/// Created per incoming query field and consumed by the resolver; argument
/// values are scalars and pass through to the pipeline's `gql` namespace
/// untransformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRequest {
  pub operation: String,
  pub arguments: BTreeMap<String, Value>,
  pub context: RequestContext,
}

impl ResolutionRequest {
  /// Create a request for the named operation with no arguments.
  pub fn new(operation: impl Into<String>, context: RequestContext) -> Self {
    Self {
      operation: operation.into(),
      arguments: BTreeMap::new(),
      context,
    }
  }

  /// Attach an argument.
  pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.arguments.insert(name.into(), value.into());
    self
  }
}
