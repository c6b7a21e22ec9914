use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Static definition of one task graph: an ordered list of actions.
///
/// These types are plain serde shapes; a host typically loads them from
/// configuration and hands them to [`crate::LocalEngine::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
  /// Name units use as their discriminant.
  pub name: String,
  /// Actions, executed in this order.
  pub actions: Vec<ActionDef>,
}

impl GraphDef {
  pub fn new(name: impl Into<String>, actions: Vec<ActionDef>) -> Self {
    Self {
      name: name.into(),
      actions,
    }
  }
}

/// One action within a graph definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
  /// Name this action instance runs under; the action's natural output
  /// lands at `payload[<name>]["_result"]`.
  pub name: String,
  /// Registered action kind (e.g. `http_fetch`, `expose_data`).
  #[serde(rename = "type")]
  pub kind: String,
  /// Kind-specific configuration block.
  #[serde(default)]
  pub config: Value,
}

impl ActionDef {
  pub fn new(name: impl Into<String>, kind: impl Into<String>, config: Value) -> Self {
    Self {
      name: name.into(),
      kind: kind.into(),
      config,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_graph_def_from_json() {
    let def: GraphDef = serde_json::from_value(json!({
      "name": "get-book",
      "actions": [
        {
          "name": "getBook",
          "type": "http_fetch",
          "config": { "url": "https://example.test/books/{config.gql.id}" }
        },
        {
          "name": "expose",
          "type": "expose_data",
          "config": { "key": "getBook", "exposeAs": "fetchedData" }
        }
      ]
    }))
    .unwrap();

    assert_eq!(def.name, "get-book");
    assert_eq!(def.actions.len(), 2);
    assert_eq!(def.actions[0].kind, "http_fetch");
    assert_eq!(def.actions[1].name, "expose");
  }

  #[test]
  fn test_action_def_config_defaults_to_null() {
    let def: ActionDef =
      serde_json::from_value(json!({ "name": "noop", "type": "noop" })).unwrap();
    assert!(def.config.is_null());
  }
}
