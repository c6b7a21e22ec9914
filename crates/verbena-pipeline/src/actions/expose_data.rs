use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::action::{Action, ActionError};
use crate::unit::{RESULT_KEY, UnitOfWork};

/// Registry kind name for [`ExposeData`].
pub const EXPOSE_DATA_KIND: &str = "expose_data";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExposeConfig {
  key: String,
  expose_as: String,
}

/// Relocates an action's natural output to a well-known payload location.
///
/// Reads `payload[key]["_result"]` and writes the value verbatim to
/// `payload[exposeAs]`, leaving the source untouched. This decouples
/// downstream consumers (e.g. the resolver layer reading `fetchedData`)
/// from task and action naming. The source key or its `_result` sub-value
/// being absent takes the failure transition.
#[derive(Debug)]
pub struct ExposeData {
  key: String,
  expose_as: String,
}

impl ExposeData {
  pub fn new(key: impl Into<String>, expose_as: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      expose_as: expose_as.into(),
    }
  }

  /// Build the action from a `{ "key": ..., "exposeAs": ... }` config block.
  pub fn from_config(name: &str, config: &Value) -> Result<Self, ActionError> {
    let config: ExposeConfig =
      serde_json::from_value(config.clone()).map_err(|e| ActionError::InvalidConfig {
        action: name.to_string(),
        message: e.to_string(),
      })?;
    Ok(Self::new(config.key, config.expose_as))
  }
}

#[async_trait]
impl Action for ExposeData {
  async fn run(&self, unit: &mut UnitOfWork) -> Result<(), ActionError> {
    let source = unit
      .input
      .payload
      .get(&self.key)
      .ok_or_else(|| ActionError::MissingPayloadKey {
        key: self.key.clone(),
      })?;
    let result = source
      .get(RESULT_KEY)
      .ok_or_else(|| ActionError::MissingResult {
        key: self.key.clone(),
      })?
      .clone();

    unit.input.payload.insert(self.expose_as.clone(), result);
    Ok(())
  }
}
