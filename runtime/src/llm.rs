//! Chat-completions client for model-assisted certificate parsing.
//!
//! One request per document, asking for strict JSON with four labeled
//! keys. Any transport, status, or parse problem comes back as
//! [`Unresolved`] so the caller can fall back to the pattern tier.

use serde::Serialize;
use serde_json::Value;
use signoff::{ExtractedFields, Unresolved, NOT_FOUND};
use std::time::Duration;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str =
    "You are a data extraction assistant. Extract structured data from HTML.";

/// Settings for the model service.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: 500,
            timeout: Duration::from_secs(120),
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    response_format: Value,
}

/// HTTP client for the model service.
#[derive(Clone, Debug)]
pub struct ModelClient {
    http: reqwest::Client,
    config: ModelConfig,
}

impl ModelClient {
    pub fn new(config: ModelConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    /// Build a client when a non-empty API key is configured.
    pub fn from_key(api_key: Option<String>, model: &str, endpoint: &str) -> Option<Self> {
        let key = api_key.filter(|k| !k.trim().is_empty());
        match key {
            Some(key) => Some(Self::new(ModelConfig {
                model: model.to_string(),
                endpoint: endpoint.to_string(),
                ..ModelConfig::new(key)
            })),
            None => {
                tracing::warn!(
                    "OPENAI_API_KEY not set; certificate fields will be parsed with patterns only"
                );
                None
            }
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Ask the model for the certificate fields.
    ///
    /// `sent_by` is passed along for the model to echo; the returned value is
    /// whatever the model said, and the caller decides which to keep.
    pub async fn extract(
        &self,
        certificate_html: &str,
        sent_by: &str,
    ) -> Result<ExtractedFields, Unresolved> {
        let request = Request {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: build_prompt(certificate_html, sent_by),
                },
            ],
            max_tokens: self.config.max_tokens,
            response_format: serde_json::json!({ "type": "json_object" }),
        };

        tracing::info!("Calling model service ({})...", self.config.model);
        let resp = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Unresolved(format!("request failed: {e}")))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| Unresolved(format!("unreadable response body: {e}")))?;
        if !status.is_success() {
            return Err(Unresolved(format!("API error {status}: {body}")));
        }

        let content = extract_assistant_content(&body)
            .ok_or_else(|| Unresolved("missing choices[0].message.content".to_string()))?;
        tracing::info!("Model response received");
        parse_fields(content)
    }
}

/// The user prompt for one certificate fragment.
pub fn build_prompt(certificate_html: &str, sent_by: &str) -> String {
    format!(
        r#"Extract the following fields from the signature certificate HTML of a proposal document.

1. "Signed by" - the person who signed the document
2. "Signed date" - when the document was signed
3. "IP address" - the IP address from the signature location

Certificate HTML:
{certificate_html}

Respond with a JSON object containing exactly these keys:
{{
    "Signed by": "Name of signer",
    "Signed date": "Date of signature",
    "IP address": "IP Address",
    "Sent by": "{sent_by}"
}}

The "Sent by" value is already known: "{sent_by}". Return it unchanged.
Use "{NOT_FOUND}" for any other field you cannot find."#
    )
}

fn extract_assistant_content(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

/// Parse the model's JSON reply into fields.
///
/// Scalars are kept as text. Missing, null, or nested values become
/// `Not found`; anything that is not a JSON object is unresolved.
pub fn parse_fields(content: &str) -> Result<ExtractedFields, Unresolved> {
    let parsed: Value = serde_json::from_str(content.trim()).map_err(|e| {
        tracing::error!("JSON parsing error: {e}");
        tracing::debug!("Raw response content: {content}");
        Unresolved(format!("invalid JSON: {e}"))
    })?;
    let object = parsed
        .as_object()
        .ok_or_else(|| Unresolved("response is not a JSON object".to_string()))?;

    let field = |key: &str| match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => NOT_FOUND.to_string(),
    };

    Ok(ExtractedFields {
        signed_by: field("Signed by"),
        signed_date: field("Signed date"),
        ip_address: field("IP address"),
        sent_by: field("Sent by"),
    })
}
