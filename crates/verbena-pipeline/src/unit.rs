use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::ActionError;
use crate::context::RequestContext;

/// Reserved top-level key of the configuration block under which resolution
/// arguments are written. Task-graph configuration references them through
/// the `{config.gql.<argName>}` templating convention.
pub const GQL_NAMESPACE: &str = "gql";

/// Fixed payload key the resolver layer reads its input from. Written by the
/// [`crate::ExposeData`] action.
pub const FETCHED_DATA_KEY: &str = "fetchedData";

/// Sub-key under which each action writes its natural output, i.e.
/// `payload[<actionName>]["_result"]`.
pub const RESULT_KEY: &str = "_result";

/// One unit of pipeline work before execution.
///
/// The `graph` discriminant selects which task graph processes this unit;
/// it must name a graph known to the engine or submission fails
/// deterministically. The configuration block carries resolution arguments
/// under [`GQL_NAMESPACE`]; the payload area is read and written by the
/// graph's actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInput {
  pub graph: String,
  pub config: Value,
  pub payload: Map<String, Value>,
}

impl PipelineInput {
  /// Create an input for the named task graph with an empty configuration
  /// block and payload.
  pub fn new(graph: impl Into<String>) -> Self {
    Self::with_config(graph, Value::Object(Map::new()))
  }

  /// Create an input carrying a pre-built configuration block.
  pub fn with_config(graph: impl Into<String>, config: Value) -> Self {
    Self {
      graph: graph.into(),
      config,
      payload: Map::new(),
    }
  }

  /// Write a resolution argument under the reserved [`GQL_NAMESPACE`] key.
  ///
  /// A non-object configuration block or `gql` entry is replaced with an
  /// object first; inputs built by this crate's constructors always carry
  /// objects.
  pub fn insert_gql_arg(&mut self, name: impl Into<String>, value: Value) {
    if !self.config.is_object() {
      self.config = Value::Object(Map::new());
    }
    if let Value::Object(config) = &mut self.config {
      let gql = config
        .entry(GQL_NAMESPACE)
        .or_insert_with(|| Value::Object(Map::new()));
      if !gql.is_object() {
        *gql = Value::Object(Map::new());
      }
      if let Value::Object(gql) = gql {
        gql.insert(name.into(), value);
      }
    }
  }

  /// Read a resolution argument back from the `gql` namespace.
  pub fn gql_arg(&self, name: &str) -> Option<&Value> {
    self.config.get(GQL_NAMESPACE)?.get(name)
  }
}

/// Look up a dotted path (e.g. `gql.id`) inside a JSON value.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
  let mut current = value;
  for segment in path.split('.') {
    current = current.get(segment)?;
  }
  Some(current)
}

/// Classifies a recorded action failure so callers can distinguish
/// missing-data conditions from genuine execution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  /// The action could not find the payload data it relocates or reads.
  MissingData,
  /// The action itself failed (network error, bad configuration, ...).
  ActionFailed,
}

/// Record of the failure transition taken by a unit's task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitFailure {
  /// Name of the action that failed.
  pub action: String,
  pub kind: FailureKind,
  pub message: String,
}

impl UnitFailure {
  /// Build a failure record from the action name and its error.
  pub fn new(action: impl Into<String>, error: &ActionError) -> Self {
    Self {
      action: action.into(),
      kind: error.kind(),
      message: error.to_string(),
    }
  }
}

/// A [`PipelineInput`] paired with its caller context.
///
/// Owned by exactly one resolver invocation; the engine hands the same unit
/// back once its task graph reaches a terminal state, with the payload
/// mutated and, if the failure transition was taken, `failure` recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOfWork {
  pub input: PipelineInput,
  pub context: RequestContext,
  /// Set by the engine when the unit's graph took the failure transition.
  pub failure: Option<UnitFailure>,
}

impl UnitOfWork {
  pub fn new(input: PipelineInput, context: RequestContext) -> Self {
    Self {
      input,
      context,
      failure: None,
    }
  }

  /// The normalized payload slice the resolver layer consumes, if the
  /// graph routed through an exposure step.
  pub fn fetched_data(&self) -> Option<&Value> {
    self.input.payload.get(FETCHED_DATA_KEY)
  }
}
