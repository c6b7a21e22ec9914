use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{error, info, instrument};
use verbena_pipeline::{Engine, FailureKind, PipelineInput, UnitOfWork};

use crate::error::ResolveError;
use crate::extract::Extract;
use crate::request::ResolutionRequest;

/// Generic task-backed resolver: one query operation bound to one task
/// graph and one extraction strategy.
///
/// Immutable after construction (graph name, static configuration block,
/// strategy, optional timeout); every invocation builds its own unit of
/// work, so concurrent resolutions share nothing but the engine handle.
pub struct TaskResolver<X: Extract> {
  engine: Arc<dyn Engine>,
  graph: String,
  config: Value,
  timeout: Option<Duration>,
  extract: X,
}

impl<X: Extract> TaskResolver<X> {
  /// Create a resolver with an empty static configuration block.
  pub fn new(
    engine: Arc<dyn Engine>,
    graph: impl Into<String>,
    extract: X,
  ) -> Result<Self, ResolveError> {
    Self::with_config(engine, graph, Value::Object(Map::new()), extract)
  }

  /// Create a resolver carrying a static configuration block that is
  /// deep-cloned into every pipeline input.
  ///
  /// Fails with [`ResolveError::Configuration`] when the graph name is
  /// empty or the block is not a JSON object; this is fatal at startup and
  /// never deferred to resolve time.
  pub fn with_config(
    engine: Arc<dyn Engine>,
    graph: impl Into<String>,
    config: Value,
    extract: X,
  ) -> Result<Self, ResolveError> {
    let graph = graph.into();
    if graph.is_empty() {
      return Err(ResolveError::configuration("task graph name is empty"));
    }
    if !config.is_object() {
      return Err(ResolveError::configuration(format!(
        "static config for graph '{}' is not a JSON object",
        graph
      )));
    }

    Ok(Self {
      engine,
      graph,
      config,
      timeout: None,
      extract,
    })
  }

  /// Bound the wait on the engine; elapse surfaces as an
  /// [`ResolveError::Engine`] failure for this field only.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Name of the task graph this resolver submits to.
  pub fn graph(&self) -> &str {
    &self.graph
  }

  /// Build the pipeline input for a request: this resolver's graph as the
  /// discriminant, the static configuration block, and every request
  /// argument written untransformed under `config.gql.<name>`.
  pub fn build_input(&self, request: &ResolutionRequest) -> PipelineInput {
    let mut input = PipelineInput::with_config(&self.graph, self.config.clone());
    for (name, value) in &request.arguments {
      input.insert_gql_arg(name.clone(), value.clone());
    }
    input
  }

  /// Resolve one request to a typed result.
  #[instrument(
    name = "field_resolve",
    skip(self, request),
    fields(operation = %request.operation, graph = %self.graph)
  )]
  pub async fn resolve(&self, request: ResolutionRequest) -> Result<X::Output, ResolveError> {
    let unit = UnitOfWork::new(self.build_input(&request), request.context.clone());

    let outputs = self.submit(vec![unit]).await?;
    let output = outputs
      .into_iter()
      .next()
      .ok_or_else(|| ResolveError::Engine {
        graph: self.graph.clone(),
        message: "engine returned an empty batch".to_string(),
      })?;

    let result = self
      .fetched_data(output)
      .and_then(|fetched| self.extract.extract(&fetched, &request.context));

    match &result {
      Ok(_) => info!("field resolved"),
      Err(e) => error!(error = %e, "field resolution failed"),
    }
    result
  }

  /// Failure transitions of `MissingData` kind and an absent `fetchedData`
  /// key both mean the graph never routed its output through the exposure
  /// step; any other recorded failure is an engine-side execution failure.
  fn fetched_data(&self, output: UnitOfWork) -> Result<Value, ResolveError> {
    if let Some(failure) = &output.failure {
      if failure.kind == FailureKind::MissingData {
        return Err(ResolveError::MissingFetchedData {
          graph: self.graph.clone(),
        });
      }
      return Err(ResolveError::Engine {
        graph: self.graph.clone(),
        message: format!("action '{}' failed: {}", failure.action, failure.message),
      });
    }

    output
      .fetched_data()
      .cloned()
      .ok_or_else(|| ResolveError::MissingFetchedData {
        graph: self.graph.clone(),
      })
  }

  async fn submit(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, ResolveError> {
    let execute = self.engine.execute(units);
    let result = match self.timeout {
      Some(limit) => tokio::time::timeout(limit, execute)
        .await
        .map_err(|_| ResolveError::Engine {
          graph: self.graph.clone(),
          message: format!("timed out after {:?}", limit),
        })?,
      None => execute.await,
    };
    result.map_err(|e| ResolveError::from_engine(&self.graph, e))
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use serde_json::json;
  use verbena_pipeline::{EngineError, FETCHED_DATA_KEY, RequestContext, UnitFailure};

  use super::*;
  use crate::extract::Single;
  use crate::record::{Record, required_str};

  #[derive(Debug, PartialEq)]
  struct Title(String);

  impl Record for Title {
    fn populate(value: &Value, _context: &RequestContext) -> Result<Self, ResolveError> {
      Ok(Title(required_str(value, "title")?))
    }
  }

  /// Engine double returning every unit unchanged.
  struct EchoEngine;

  #[async_trait]
  impl Engine for EchoEngine {
    async fn execute(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
      Ok(units)
    }
  }

  /// Engine double writing canned fetched data into every unit.
  struct FetchedEngine {
    data: Value,
  }

  #[async_trait]
  impl Engine for FetchedEngine {
    async fn execute(&self, mut units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
      for unit in &mut units {
        unit
          .input
          .payload
          .insert(FETCHED_DATA_KEY.to_string(), self.data.clone());
      }
      Ok(units)
    }
  }

  /// Engine double whose graphs always take the failure transition.
  struct FailingEngine {
    error: verbena_pipeline::ActionError,
  }

  #[async_trait]
  impl Engine for FailingEngine {
    async fn execute(&self, mut units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
      for unit in &mut units {
        unit.failure = Some(UnitFailure::new("someAction", &self.error));
      }
      Ok(units)
    }
  }

  /// Engine double rejecting every submission.
  struct UnknownGraphEngine;

  #[async_trait]
  impl Engine for UnknownGraphEngine {
    async fn execute(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
      Err(EngineError::UnknownGraph {
        graph: units[0].input.graph.clone(),
      })
    }
  }

  /// Engine double that never completes in time.
  struct SlowEngine;

  #[async_trait]
  impl Engine for SlowEngine {
    async fn execute(&self, units: Vec<UnitOfWork>) -> Result<Vec<UnitOfWork>, EngineError> {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok(units)
    }
  }

  fn book_request() -> ResolutionRequest {
    ResolutionRequest::new("book", RequestContext::new("req-1")).arg("id", "abc")
  }

  #[test]
  fn test_build_input_writes_arguments_under_gql_namespace() {
    let resolver =
      TaskResolver::new(Arc::new(EchoEngine), "get-book", Single::<Title>::new()).unwrap();

    let request = book_request().arg("match", "java").arg("limit", 10);
    let input = resolver.build_input(&request);

    assert_eq!(input.graph, "get-book");
    assert_eq!(input.gql_arg("id"), Some(&json!("abc")));
    assert_eq!(input.gql_arg("match"), Some(&json!("java")));
    assert_eq!(input.gql_arg("limit"), Some(&json!(10)));
    assert!(input.payload.is_empty());
  }

  #[test]
  fn test_build_input_keeps_static_config() {
    let resolver = TaskResolver::with_config(
      Arc::new(EchoEngine),
      "get-book",
      json!({ "endpoint": "https://example.test" }),
      Single::<Title>::new(),
    )
    .unwrap();

    let input = resolver.build_input(&book_request());
    assert_eq!(input.config["endpoint"], json!("https://example.test"));
    assert_eq!(input.gql_arg("id"), Some(&json!("abc")));
  }

  #[test]
  fn test_construction_validates_configuration() {
    let empty_graph = TaskResolver::new(Arc::new(EchoEngine), "", Single::<Title>::new());
    assert!(matches!(
      empty_graph,
      Err(ResolveError::Configuration { .. })
    ));

    let bad_config = TaskResolver::with_config(
      Arc::new(EchoEngine),
      "get-book",
      json!([1, 2]),
      Single::<Title>::new(),
    );
    assert!(matches!(bad_config, Err(ResolveError::Configuration { .. })));
  }

  #[tokio::test]
  async fn test_missing_fetched_data_fails_the_field() {
    let resolver =
      TaskResolver::new(Arc::new(EchoEngine), "get-book", Single::<Title>::new()).unwrap();

    let result = resolver.resolve(book_request()).await;
    assert!(matches!(
      result,
      Err(ResolveError::MissingFetchedData { graph }) if graph == "get-book"
    ));
  }

  #[tokio::test]
  async fn test_resolves_single_record() {
    let engine = FetchedEngine {
      data: json!({ "title": "T" }),
    };
    let resolver =
      TaskResolver::new(Arc::new(engine), "get-book", Single::<Title>::new()).unwrap();

    let record = resolver.resolve(book_request()).await.unwrap();
    assert_eq!(record, Title("T".to_string()));
  }

  #[tokio::test]
  async fn test_missing_data_failure_maps_to_missing_fetched_data() {
    let engine = FailingEngine {
      error: verbena_pipeline::ActionError::MissingResult {
        key: "getBook".to_string(),
      },
    };
    let resolver =
      TaskResolver::new(Arc::new(engine), "get-book", Single::<Title>::new()).unwrap();

    let result = resolver.resolve(book_request()).await;
    assert!(matches!(result, Err(ResolveError::MissingFetchedData { .. })));
  }

  #[tokio::test]
  async fn test_action_failure_maps_to_engine_error() {
    let engine = FailingEngine {
      error: verbena_pipeline::ActionError::InvalidConfig {
        action: "getBook".to_string(),
        message: "boom".to_string(),
      },
    };
    let resolver =
      TaskResolver::new(Arc::new(engine), "get-book", Single::<Title>::new()).unwrap();

    let result = resolver.resolve(book_request()).await;
    assert!(matches!(result, Err(ResolveError::Engine { .. })));
  }

  #[tokio::test]
  async fn test_unknown_graph_maps_to_configuration() {
    let resolver = TaskResolver::new(
      Arc::new(UnknownGraphEngine),
      "get-book",
      Single::<Title>::new(),
    )
    .unwrap();

    let result = resolver.resolve(book_request()).await;
    assert!(matches!(result, Err(ResolveError::Configuration { .. })));
  }

  #[tokio::test(start_paused = true)]
  async fn test_timeout_fails_the_field() {
    let resolver = TaskResolver::new(Arc::new(SlowEngine), "get-book", Single::<Title>::new())
      .unwrap()
      .with_timeout(Duration::from_millis(50));

    let result = resolver.resolve(book_request()).await;
    assert!(matches!(
      result,
      Err(ResolveError::Engine { message, .. }) if message.contains("timed out")
    ));
  }
}
