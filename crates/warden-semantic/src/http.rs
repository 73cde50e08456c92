//! HTTP completion backend.
//!
//! Talks to any server exposing the OpenAI-style `/v1/completions` route,
//! such as a local llama.cpp server hosting a small review model.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use warden_contracts::error::{WardenError, WardenResult};

use crate::completion::{CompletionRequest, TextCompletion};
use crate::config::SemanticConfig;

/// Blocking client for an OpenAI-compatible completion server.
pub struct HttpCompletion {
    client: reqwest::blocking::Client,
    completions_url: String,
    model: Option<String>,
}

impl HttpCompletion {
    /// Build a client for `config.endpoint` and check the server answers.
    ///
    /// Any failure here means the semantic checker stays unavailable.
    pub fn connect(config: &SemanticConfig) -> WardenResult<Self> {
        let unavailable = |reason: String| WardenError::SemanticUnavailable { reason };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| unavailable(format!("failed to create HTTP client: {}", e)))?;

        let base = config.endpoint.trim_end_matches('/');
        let models_url = format!("{base}/v1/models");
        let response = client
            .get(&models_url)
            .send()
            .map_err(|e| unavailable(format!("no completion server at {}: {}", base, e)))?;
        if !response.status().is_success() {
            return Err(unavailable(format!(
                "completion server at {} answered {}",
                base,
                response.status()
            )));
        }

        debug!(endpoint = %base, "connected to completion server");
        Ok(Self {
            client,
            completions_url: format!("{base}/v1/completions"),
            model: config.model.clone(),
        })
    }
}

impl TextCompletion for HttpCompletion {
    fn complete(&self, request: &CompletionRequest) -> WardenResult<String> {
        let failed = |reason: String| WardenError::CompletionFailed { reason };

        let response = self
            .client
            .post(&self.completions_url)
            .json(&completion_body(self.model.as_deref(), request))
            .send()
            .map_err(|e| failed(format!("request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| failed(e.to_string()))?;

        let body: Value = response
            .json()
            .map_err(|e| failed(format!("failed to parse JSON: {}", e)))?;
        completion_text(&body)
    }
}

fn completion_body(model: Option<&str>, request: &CompletionRequest) -> Value {
    let mut body = json!({
        "prompt": request.prompt,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "stop": request.stop,
        "stream": false,
    });
    if let Some(model) = model {
        body["model"] = json!(model);
    }
    body
}

/// Pull `choices[0].text` out of a completion response.
fn completion_text(body: &Value) -> WardenResult<String> {
    body.pointer("/choices/0/text")
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| WardenError::CompletionFailed {
            reason: "response missing 'choices[0].text'".to_string(),
        })
}
