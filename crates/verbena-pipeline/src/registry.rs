use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{Action, ActionError};
use crate::actions::{EXPOSE_DATA_KIND, ExposeData, HTTP_FETCH_KIND, HttpFetch};

/// Builds an action instance from its configured name and config block.
pub type ActionFactory =
  Arc<dyn Fn(&str, &Value) -> Result<Arc<dyn Action>, ActionError> + Send + Sync>;

/// Explicit registry mapping action-kind names to factories.
///
/// Populated at process startup from static configuration and passed into
/// the engine; unknown kinds fail at engine construction, never at request
/// time.
#[derive(Clone, Default)]
pub struct ActionRegistry {
  factories: HashMap<String, ActionFactory>,
}

impl ActionRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a registry with the built-in actions registered.
  pub fn with_builtin() -> Self {
    let mut registry = Self::new();
    registry.register_fn(EXPOSE_DATA_KIND, |name, config| {
      Ok(Arc::new(ExposeData::from_config(name, config)?) as Arc<dyn Action>)
    });
    registry.register_fn(HTTP_FETCH_KIND, |name, config| {
      Ok(Arc::new(HttpFetch::from_config(name, config)?) as Arc<dyn Action>)
    });
    registry
  }

  /// Register a factory under the given kind, replacing any previous one.
  pub fn register(&mut self, kind: impl Into<String>, factory: ActionFactory) {
    self.factories.insert(kind.into(), factory);
  }

  /// Register a plain function or closure as a factory.
  pub fn register_fn<F>(&mut self, kind: impl Into<String>, factory: F)
  where
    F: Fn(&str, &Value) -> Result<Arc<dyn Action>, ActionError> + Send + Sync + 'static,
  {
    self.register(kind, Arc::new(factory));
  }

  /// Whether a factory is registered for the kind.
  pub fn contains(&self, kind: &str) -> bool {
    self.factories.contains_key(kind)
  }

  /// Build an action of the given kind.
  pub fn build(
    &self,
    kind: &str,
    name: &str,
    config: &Value,
  ) -> Result<Arc<dyn Action>, ActionError> {
    let factory = self
      .factories
      .get(kind)
      .ok_or_else(|| ActionError::UnknownKind {
        kind: kind.to_string(),
      })?;
    factory(name, config)
  }
}

impl std::fmt::Debug for ActionRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
    kinds.sort_unstable();
    f.debug_struct("ActionRegistry").field("kinds", &kinds).finish()
  }
}
