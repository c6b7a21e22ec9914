use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};
use uuid::Uuid;

use verbena_pipeline::{
  Action, ActionError, ActionRegistry, Engine, EngineError, UnitFailure, UnitOfWork,
};

use crate::graph::GraphDef;

/// One runnable action with the name it was configured under.
struct BoundAction {
  name: String,
  action: Arc<dyn Action>,
}

/// In-process engine executing configured action graphs.
///
/// All actions are instantiated eagerly at construction, so a graph that
/// references an unknown action kind or carries malformed action config
/// fails at startup rather than on the first request. The engine holds no
/// per-request state and can be shared behind an `Arc` across concurrent
/// resolver invocations.
pub struct LocalEngine {
  graphs: HashMap<String, Vec<BoundAction>>,
  cancel: CancellationToken,
}

impl LocalEngine {
  /// Build an engine from graph definitions and an action registry.
  pub fn new(defs: Vec<GraphDef>, registry: &ActionRegistry) -> Result<Self, EngineError> {
    Self::with_cancellation(defs, registry, CancellationToken::new())
  }

  /// Build an engine that observes the given cancellation token between
  /// actions.
  pub fn with_cancellation(
    defs: Vec<GraphDef>,
    registry: &ActionRegistry,
    cancel: CancellationToken,
  ) -> Result<Self, EngineError> {
    let mut graphs: HashMap<String, Vec<BoundAction>> = HashMap::new();

    for def in defs {
      if graphs.contains_key(&def.name) {
        return Err(EngineError::DuplicateGraph { graph: def.name });
      }

      let mut actions = Vec::with_capacity(def.actions.len());
      for action_def in def.actions {
        let action = registry
          .build(&action_def.kind, &action_def.name, &action_def.config)
          .map_err(|e| match e {
            ActionError::UnknownKind { kind } => EngineError::UnknownAction {
              graph: def.name.clone(),
              kind,
            },
            other => EngineError::InvalidGraph {
              graph: def.name.clone(),
              source: other,
            },
          })?;
        actions.push(BoundAction {
          name: action_def.name,
          action,
        });
      }
      graphs.insert(def.name, actions);
    }

    Ok(Self { graphs, cancel })
  }

  /// Whether a graph with this name was configured.
  pub fn knows_graph(&self, name: &str) -> bool {
    self.graphs.contains_key(name)
  }

  /// Run one unit's graph to a terminal state.
  ///
  /// An action error takes the failure transition: it is recorded on the
  /// unit and the remaining actions are skipped. The unit itself is always
  /// handed back.
  #[instrument(
    name = "graph_execute",
    skip(self, unit),
    fields(execution_id = %execution_id, graph = %unit.input.graph)
  )]
  async fn run_unit(
    &self,
    execution_id: &str,
    mut unit: UnitOfWork,
  ) -> Result<UnitOfWork, EngineError> {
    // Presence is checked before the batch starts.
    let actions = self
      .graphs
      .get(&unit.input.graph)
      .ok_or_else(|| EngineError::UnknownGraph {
        graph: unit.input.graph.clone(),
      })?;

    info!("graph started");
    for bound in actions {
      if self.cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
      }

      if let Err(e) = bound.action.run(&mut unit).await {
        error!(action = %bound.name, error = %e, "action failed");
        unit.failure = Some(UnitFailure::new(&bound.name, &e));
        break;
      }
    }

    match &unit.failure {
      None => info!("graph completed"),
      Some(failure) => info!(failed_action = %failure.action, "graph took failure transition"),
    }
    Ok(unit)
  }
}

#[async_trait]
impl Engine for LocalEngine {
  async fn execute(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
    // Unknown discriminants fail the whole submission deterministically.
    for unit in &units {
      if !self.knows_graph(&unit.input.graph) {
        return Err(EngineError::UnknownGraph {
          graph: unit.input.graph.clone(),
        });
      }
    }

    let execution_id = Uuid::new_v4().to_string();
    let completed = join_all(
      units
        .into_iter()
        .map(|unit| self.run_unit(&execution_id, unit)),
    )
    .await;

    completed.into_iter().collect()
  }
}
