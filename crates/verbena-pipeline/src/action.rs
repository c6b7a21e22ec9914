use async_trait::async_trait;
use thiserror::Error;

use crate::unit::{FailureKind, UnitOfWork};

/// A single pipeline step.
///
/// Actions read and write the unit's payload area. Returning `Ok(())`
/// signals the success transition; returning an error makes the engine take
/// the failure transition for this unit and skip its remaining actions.
#[async_trait]
pub trait Action: Send + Sync {
  async fn run(&self, unit: &mut UnitOfWork) -> Result<(), ActionError>;
}

/// Errors signalled by pipeline actions.
#[derive(Debug, Error)]
pub enum ActionError {
  /// Payload key expected by the action is absent.
  #[error("payload key '{key}' is missing")]
  MissingPayloadKey { key: String },

  /// Payload key exists but carries no `_result` sub-value.
  #[error("payload key '{key}' has no '_result' sub-value")]
  MissingResult { key: String },

  /// Action configuration could not be parsed.
  #[error("invalid config for action '{action}': {message}")]
  InvalidConfig { action: String, message: String },

  /// No factory registered for the requested action kind.
  #[error("no action registered for kind '{kind}'")]
  UnknownKind { kind: String },

  /// A `{config.*}` placeholder had no usable value in the unit's
  /// configuration block.
  #[error("unresolved placeholder '{placeholder}'")]
  UnresolvedPlaceholder { placeholder: String },

  /// HTTP request failed.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
}

impl ActionError {
  /// Classify this error for the unit's failure record.
  pub fn kind(&self) -> FailureKind {
    match self {
      ActionError::MissingPayloadKey { .. } | ActionError::MissingResult { .. } => {
        FailureKind::MissingData
      }
      _ => FailureKind::ActionFailed,
    }
  }
}
