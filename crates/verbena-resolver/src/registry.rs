use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::ResolveError;
use crate::extract::Extract;
use crate::request::ResolutionRequest;
use crate::resolver::TaskResolver;

/// Type-erased resolver surface for operation wiring.
///
/// The external query executor calls through this trait and receives the
/// resolved value as JSON for response assembly; any [`TaskResolver`] whose
/// output serializes implements it.
#[async_trait]
pub trait OperationResolver: Send + Sync {
  async fn resolve_value(&self, request: ResolutionRequest) -> Result<Value, ResolveError>;
}

#[async_trait]
impl<X> OperationResolver for TaskResolver<X>
where
  X: Extract,
  X::Output: Serialize,
{
  async fn resolve_value(&self, request: ResolutionRequest) -> Result<Value, ResolveError> {
    let output = self.resolve(request).await?;
    serde_json::to_value(output).map_err(|e| ResolveError::Configuration {
      message: format!("resolved value does not serialize: {}", e),
    })
  }
}

/// Static binding of named query operations to resolver instances.
///
/// Populated once at setup time; each operation maps to exactly one
/// resolver.
#[derive(Default)]
pub struct ResolverRegistry {
  operations: HashMap<String, Arc<dyn OperationResolver>>,
}

impl ResolverRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bind an operation name to a resolver. Rebinding an operation is a
  /// wiring mistake and fails with [`ResolveError::Configuration`].
  pub fn bind(
    &mut self,
    operation: impl Into<String>,
    resolver: Arc<dyn OperationResolver>,
  ) -> Result<(), ResolveError> {
    let operation = operation.into();
    if self.operations.contains_key(&operation) {
      return Err(ResolveError::Configuration {
        message: format!("operation '{}' is already bound", operation),
      });
    }
    self.operations.insert(operation, resolver);
    Ok(())
  }

  /// Look up the resolver bound to an operation.
  pub fn get(&self, operation: &str) -> Option<&Arc<dyn OperationResolver>> {
    self.operations.get(operation)
  }

  /// Names of all bound operations, sorted.
  pub fn operations(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  /// Resolve a request through the resolver bound to its operation.
  pub async fn resolve(&self, request: ResolutionRequest) -> Result<Value, ResolveError> {
    let resolver = self
      .get(&request.operation)
      .ok_or_else(|| ResolveError::Configuration {
        message: format!("no resolver bound for operation '{}'", request.operation),
      })?
      .clone();
    resolver.resolve_value(request).await
  }
}

impl std::fmt::Debug for ResolverRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ResolverRegistry")
      .field("operations", &self.operations())
      .finish()
  }
}
