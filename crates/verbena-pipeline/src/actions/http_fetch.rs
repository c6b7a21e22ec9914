use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::action::{Action, ActionError};
use crate::unit::{RESULT_KEY, UnitOfWork, lookup_path};

/// Registry kind name for [`HttpFetch`].
pub const HTTP_FETCH_KIND: &str = "http_fetch";

#[derive(Debug, Deserialize)]
struct FetchConfig {
  url: String,
  #[serde(default = "default_method")]
  method: String,
  #[serde(default)]
  headers: HashMap<String, String>,
  #[serde(default)]
  body: Option<Value>,
}

fn default_method() -> String {
  "GET".to_string()
}

/// Fetches a third-party API response into the unit's payload.
///
/// The url and header values may contain `{config.<path>}` placeholders,
/// resolved against the unit's configuration block; with resolution
/// arguments written under the `gql` namespace, graph configuration can
/// reference them as `{config.gql.<argName>}`. The response body (parsed as
/// JSON, string fallback) lands under `payload[<actionName>]["_result"]`,
/// the natural output location downstream exposure steps read.
#[derive(Debug)]
pub struct HttpFetch {
  name: String,
  config: FetchConfig,
  client: Client,
}

impl HttpFetch {
  /// Build the action from its configured name and config block.
  pub fn from_config(name: &str, config: &Value) -> Result<Self, ActionError> {
    let config: FetchConfig =
      serde_json::from_value(config.clone()).map_err(|e| ActionError::InvalidConfig {
        action: name.to_string(),
        message: e.to_string(),
      })?;
    // Reject bad methods at construction, not at request time.
    parse_method(name, &config.method)?;

    Ok(Self {
      name: name.to_string(),
      config,
      client: Client::new(),
    })
  }
}

#[async_trait]
impl Action for HttpFetch {
  async fn run(&self, unit: &mut UnitOfWork) -> Result<(), ActionError> {
    let url = resolve_placeholders(&self.config.url, &unit.input.config)?;
    let method = parse_method(&self.name, &self.config.method)?;

    let mut request = self.client.request(method, &url);
    for (key, value) in &self.config.headers {
      request = request.header(
        key.as_str(),
        resolve_placeholders(value, &unit.input.config)?,
      );
    }
    if let Some(body) = &self.config.body {
      request = request.json(body);
    }

    debug!(action = %self.name, url = %url, "http fetch");
    let response = request.send().await?;
    let body = response.text().await?;

    // Try to parse the body as JSON, fall back to string
    let body_value = serde_json::from_str(&body).unwrap_or(Value::String(body));

    unit
      .input
      .payload
      .insert(self.name.clone(), json!({ RESULT_KEY: body_value }));
    Ok(())
  }
}

fn parse_method(action: &str, method: &str) -> Result<Method, ActionError> {
  match method.to_uppercase().as_str() {
    "GET" => Ok(Method::GET),
    "POST" => Ok(Method::POST),
    "PUT" => Ok(Method::PUT),
    "DELETE" => Ok(Method::DELETE),
    "PATCH" => Ok(Method::PATCH),
    "HEAD" => Ok(Method::HEAD),
    _ => Err(ActionError::InvalidConfig {
      action: action.to_string(),
      message: format!("unsupported HTTP method: {}", method),
    }),
  }
}

/// Replace `{config.<path>}` placeholders with scalar values looked up in
/// the configuration block. Braces that do not open a `config.` path pass
/// through verbatim.
fn resolve_placeholders(template: &str, config: &Value) -> Result<String, ActionError> {
  const PREFIX: &str = "{config.";

  let mut out = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(start) = rest.find(PREFIX) {
    out.push_str(&rest[..start]);
    let tail = &rest[start..];
    let end = tail.find('}').ok_or_else(|| ActionError::UnresolvedPlaceholder {
      placeholder: tail.to_string(),
    })?;
    let placeholder = &tail[..=end];
    let path = &tail[PREFIX.len()..end];

    let value =
      lookup_path(config, path).ok_or_else(|| ActionError::UnresolvedPlaceholder {
        placeholder: placeholder.to_string(),
      })?;
    match value {
      Value::String(s) => out.push_str(s),
      Value::Number(n) => out.push_str(&n.to_string()),
      Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
      _ => {
        return Err(ActionError::UnresolvedPlaceholder {
          placeholder: placeholder.to_string(),
        });
      }
    }

    rest = &tail[end + 1..];
  }
  out.push_str(rest);
  Ok(out)
}
