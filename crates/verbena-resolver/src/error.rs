use thiserror::Error;
use verbena_pipeline::EngineError;

/// Errors surfaced by a single field resolution.
///
/// Every error is localized to the operation it affects; whether a failed
/// field yields a null-with-error or aborts the whole response is the query
/// executor's policy, not this layer's. The bridge never retries.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Static misconfiguration: bad resolver construction, unknown task
  /// graph, duplicate or unknown operation binding. Fatal at startup.
  #[error("configuration error: {message}")]
  Configuration { message: String },

  /// The pipeline completed but never populated `fetchedData`: the task
  /// graph did not route through the exposure step, almost certainly a
  /// configuration error.
  #[error("task graph '{graph}' produced no 'fetchedData' payload")]
  MissingFetchedData { graph: String },

  /// Structural mismatch between the fetched payload and the typed
  /// record's required shape.
  #[error("malformed record: {message}")]
  MalformedRecord { message: String },

  /// The pipeline engine reported a task-graph failure.
  #[error("task graph '{graph}' failed: {message}")]
  Engine { graph: String, message: String },
}

impl ResolveError {
  pub(crate) fn configuration(message: impl Into<String>) -> Self {
    ResolveError::Configuration {
      message: message.into(),
    }
  }

  pub(crate) fn malformed(message: impl Into<String>) -> Self {
    ResolveError::MalformedRecord {
      message: message.into(),
    }
  }

  /// Map an engine submission error for the given graph.
  ///
  /// Unknown-graph and construction-class errors indicate static
  /// misconfiguration and keep their distinguishable kind; everything else
  /// is an execution failure.
  pub(crate) fn from_engine(graph: &str, error: EngineError) -> Self {
    match error {
      EngineError::UnknownGraph { .. }
      | EngineError::DuplicateGraph { .. }
      | EngineError::UnknownAction { .. }
      | EngineError::InvalidGraph { .. } => ResolveError::configuration(error.to_string()),
      EngineError::Cancelled => ResolveError::Engine {
        graph: graph.to_string(),
        message: error.to_string(),
      },
    }
  }
}
