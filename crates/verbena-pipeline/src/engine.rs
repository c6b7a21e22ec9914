use async_trait::async_trait;
use thiserror::Error;

use crate::action::ActionError;
use crate::unit::UnitOfWork;

/// Execution entry point of a task-pipeline engine.
///
/// Implementations take a batch of units, run each unit's named task graph
/// to a terminal state and return the completed units. The output sequence
/// is length-preserving and index-correspondent with the input; no ordering
/// is guaranteed between the executions themselves. A graph failure is
/// recorded on its unit ([`UnitOfWork::failure`]) rather than failing the
/// batch; batch-level errors are reserved for submission problems such as
/// an unknown graph discriminant.
#[async_trait]
pub trait Engine: Send + Sync {
  async fn execute(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError>;
}

/// Errors reported by engine submission and construction.
#[derive(Debug, Error)]
pub enum EngineError {
  /// A unit named a task graph the engine does not know.
  #[error("unknown task graph '{graph}'")]
  UnknownGraph { graph: String },

  /// Two graph definitions share a name.
  #[error("duplicate task graph '{graph}'")]
  DuplicateGraph { graph: String },

  /// A graph definition referenced an action kind missing from the
  /// registry.
  #[error("unknown action kind '{kind}' in graph '{graph}'")]
  UnknownAction { graph: String, kind: String },

  /// A graph definition could not be turned into runnable actions.
  #[error("invalid graph '{graph}': {source}")]
  InvalidGraph {
    graph: String,
    #[source]
    source: ActionError,
  },

  /// Execution was cancelled.
  #[error("execution cancelled")]
  Cancelled,
}
