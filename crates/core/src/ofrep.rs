//! OFREP (OpenFeature Remote Evaluation Protocol) client.
//!
//! One POST per evaluation, no retries. Transport failures and non-2xx
//! responses are returned as [`EvaluationOutcome`]s so callers always have
//! something to report; only a successful response without a JSON body is
//! an error.

use crate::config::{self, ConfigOverrides, Credential, EndpointConfig, Environment};
use crate::error::{OfrepError, OpenFeatureResult};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

/// Header carrying the API key when no bearer token is configured.
pub const API_KEY_HEADER: &str = "X-API-Key";

const EVALUATE_FLAGS_PATH: &str = "/ofrep/v1/evaluate/flags";

const NOT_MODIFIED_MESSAGE: &str = "Bulk evaluation not modified";

/// Evaluation arguments for a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationRequest {
    /// Selects single-flag evaluation when present and non-empty.
    pub flag_key: Option<String>,
    /// Evaluation context, sent as-is. `targetingKey` is the conventional subject id.
    pub context: Option<Map<String, Value>>,
    /// Only used for bulk evaluation.
    pub etag: Option<String>,
}

impl EvaluationRequest {
    /// The flag key if this is a single-flag evaluation.
    pub fn single_flag_key(&self) -> Option<&str> {
        self.flag_key.as_deref().filter(|key| !key.is_empty())
    }

    fn body(&self) -> Value {
        serde_json::json!({
            "context": self.context.clone().unwrap_or_default(),
        })
    }
}

/// What an OFREP call produced, serialized as the tool payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationOutcome {
    /// 2xx with a JSON body. `etag` is only populated for bulk evaluation.
    Evaluated {
        status: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        etag: Option<String>,
        data: Value,
    },
    /// 304 for a conditional bulk request.
    NotModified {
        status: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        etag: Option<String>,
        message: String,
    },
    /// Non-2xx. `error` is the parsed JSON body, else the raw text.
    HttpError {
        status: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<Value>,
    },
    /// The request never produced a response.
    TransportError { error: String },
}

impl EvaluationOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Evaluated { status, .. }
            | Self::NotModified { status, .. }
            | Self::HttpError { status, .. } => Some(*status),
            Self::TransportError { .. } => None,
        }
    }

    /// JSON text for a tool result content block.
    pub fn to_json_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the evaluation endpoint for a base URL. One trailing slash on the
/// base is dropped; the flag key is percent-encoded as a single path segment.
pub fn evaluation_url(base_url: &str, flag_key: Option<&str>) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    match flag_key {
        Some(key) => format!("{}{}/{}", base, EVALUATE_FLAGS_PATH, urlencoding::encode(key)),
        None => format!("{}{}", base, EVALUATE_FLAGS_PATH),
    }
}

/// HTTP client for OFREP evaluation endpoints.
#[derive(Debug, Clone)]
pub struct OfrepClient {
    http: Client,
}

impl OfrepClient {
    /// Create a client with the transport's default timeouts.
    pub fn new() -> Result<Self, OfrepError> {
        let http = Client::builder()
            .user_agent(concat!("openfeature-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(OfrepError::Client)?;
        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Resolve the endpoint configuration for this call, then evaluate.
    ///
    /// Configuration errors are returned before any request is made.
    pub async fn resolve_and_evaluate(
        &self,
        overrides: &ConfigOverrides,
        env: &dyn Environment,
        request: &EvaluationRequest,
    ) -> OpenFeatureResult<EvaluationOutcome> {
        let config = config::resolve(overrides, env)?;
        Ok(self.evaluate(&config, request).await?)
    }

    /// Evaluate one flag, or all flags when no flag key is given.
    pub async fn evaluate(
        &self,
        config: &EndpointConfig,
        request: &EvaluationRequest,
    ) -> Result<EvaluationOutcome, OfrepError> {
        let flag_key = request.single_flag_key();
        let is_bulk = flag_key.is_none();
        let url = evaluation_url(config.base_url(), flag_key);
        let body = request.body().to_string();

        let mut builder = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        builder = match config.credential() {
            Credential::Bearer(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            Credential::ApiKey(key) => builder.header(API_KEY_HEADER, key.as_str()),
        };

        if is_bulk {
            if let Some(etag) = request.etag.as_deref().filter(|etag| !etag.is_empty()) {
                builder = builder.header(IF_NONE_MATCH, etag);
            }
        }

        debug!(url = %url, body = %body, "Fetching OFREP API");

        let response = match builder.body(body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(url = %url, error = %e, "OFREP API request failed");
                return Ok(EvaluationOutcome::TransportError {
                    error: e.to_string(),
                });
            }
        };

        let status = response.status();
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        info!(status = status.as_u16(), "OFREP API response");

        if status == StatusCode::NOT_MODIFIED {
            return Ok(EvaluationOutcome::NotModified {
                status: status.as_u16(),
                etag,
                message: NOT_MODIFIED_MESSAGE.to_string(),
            });
        }

        // Read once as text; a body that is not JSON is kept as text.
        let raw = response.text().await.ok();
        let parsed = raw
            .as_deref()
            .filter(|text| !text.is_empty())
            .and_then(|text| serde_json::from_str::<Value>(text).ok());

        if !status.is_success() {
            // A JSON `null` body is reported as its raw text.
            let error = parsed
                .filter(|value| !value.is_null())
                .or_else(|| raw.map(Value::String));
            warn!(status = status.as_u16(), error = ?error, "OFREP API error");
            return Ok(EvaluationOutcome::HttpError {
                status: status.as_u16(),
                error,
            });
        }

        let data = match parsed {
            Some(Value::Null) | None => return Err(OfrepError::NoJsonData),
            Some(data) => data,
        };

        debug!(status = status.as_u16(), "OFREP API success");
        Ok(EvaluationOutcome::Evaluated {
            status: status.as_u16(),
            etag: if is_bulk { etag } else { None },
            data,
        })
    }
}
