use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Caller/transport context attached to a unit of work.
///
/// Captured once per incoming query field from the surrounding
/// request-handling layer and carried unchanged through the pipeline so
/// actions and record population can see request metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
  /// Identifier of the originating client request, if the transport
  /// assigned one.
  pub request_id: Option<String>,

  /// Transport-level metadata (header subset, locale, peer info).
  pub metadata: HashMap<String, String>,
}

impl RequestContext {
  /// Create a context for the given client request id.
  pub fn new(request_id: impl Into<String>) -> Self {
    Self {
      request_id: Some(request_id.into()),
      metadata: HashMap::new(),
    }
  }

  /// Attach a metadata entry.
  pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.metadata.insert(key.into(), value.into());
    self
  }
}
