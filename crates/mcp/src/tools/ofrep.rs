// OFREP flag evaluation tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{bail, Context, Result};
use openfeature_mcp_core::{ConfigOverrides, Environment, EvaluationRequest, OfrepClient};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Evaluates flags against an OFREP endpoint resolved per call from
/// arguments, environment and the config file.
pub struct OfrepEvalTool {
    client: OfrepClient,
    env: Arc<dyn Environment>,
}

impl OfrepEvalTool {
    pub fn new(client: OfrepClient, env: Arc<dyn Environment>) -> Self {
        Self { client, env }
    }
}

#[derive(Debug, Default, Deserialize)]
struct OfrepEvalArgs {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    flag_key: Option<String>,
    #[serde(default)]
    context: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    etag: Option<String>,
    #[serde(default)]
    auth: Option<OfrepAuthArgs>,
}

#[derive(Debug, Default, Deserialize)]
struct OfrepAuthArgs {
    #[serde(default)]
    bearer_token: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
}

impl OfrepEvalArgs {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            Url::parse(base_url).with_context(|| format!("Invalid base_url '{}'", base_url))?;
        }
        let targeting_key = self.context.as_ref().and_then(|ctx| ctx.get("targetingKey"));
        if targeting_key.is_some_and(|key| !key.is_string()) {
            bail!("context.targetingKey must be a string");
        }
                if let Some(auth) = &self.auth {
            if auth.bearer_token.as_deref() == Some("") {
                bail!("auth.bearer_token must not be empty");
            }
            if auth.api_key.as_deref() == Some("") {
                bail!("auth.api_key must not be empty");
            }
        }
        Ok(())
    }

    fn into_parts(self) -> (ConfigOverrides, EvaluationRequest) {
        let auth = self.auth.unwrap_or_default();
        let overrides = ConfigOverrides {
            base_url: self.base_url,
            bearer_token: auth.bearer_token,
            api_key: auth.api_key,
        };
        let request = EvaluationRequest {
            flag_key: self.flag_key,
            context: self.context,
            etag: self.etag,
        };
        (overrides, request)
    }
}

#[async_trait::async_trait]
impl Tool for OfrepEvalTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "ofrep_flag_eval".to_string(),
            description: "Evaluate feature flags using OpenFeature Remote Evaluation Protocol (OFREP).\n\
                          If flag_key is omitted, performs bulk evaluation."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "base_url": {
                        "type": "string",
                        "format": "uri",
                        "description": "Base URL of your OFREP-compatible flag service. Must be set directly or via environment variables or config file."
                    },
                    "flag_key": json_schema_string(
                        "If provided, calls single flag evaluation, otherwise performs bulk evaluation."
                    ),
                    "context": {
                        "type": "object",
                        "description": "Context information for flag evaluation",
                        "properties": {
                            "targetingKey": json_schema_string(
                                "A string logically identifying the subject of evaluation (end-user, service, etc). Should be set in the majority of cases."
                            )
                        },
                        "additionalProperties": true
                    },
                    "etag": json_schema_string("ETag for bulk evaluation"),
                    "auth": {
                        "type": "object",
                        "properties": {
                            "bearer_token": { "type": "string", "minLength": 1 },
                            "api_key": { "type": "string", "minLength": 1 }
                        }
                    }
                }),
                vec![],
            ),
            annotations: None,
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: OfrepEvalArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for ofrep_flag_eval")?;
        args.validate()?;

        let (overrides, request) = args.into_parts();
        let outcome = self
            .client
            .resolve_and_evaluate(&overrides, self.env.as_ref(), &request)
            .await?;

        info!(status = ?outcome.status(), "OFREP evaluation finished");
        Ok(CallToolResult::text(outcome.to_json_text()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolContent;
    use std::collections::HashMap;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn env(vars: &[(&str, &str)]) -> Arc<dyn Environment> {
        let mut map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        // Keep the config file lookup away from the real home directory.
        map.insert(
            "OPENFEATURE_MCP_CONFIG_PATH".to_string(),
            "/nonexistent/openfeature-mcp.json".to_string(),
        );
        Arc::new(map)
    }

    fn tool(env: Arc<dyn Environment>) -> OfrepEvalTool {
        OfrepEvalTool::new(OfrepClient::new().unwrap(), env)
    }

    #[tokio::test]
    async fn test_arguments_override_environment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ofrep/v1/evaluate/flags/dark-mode"))
            .and(header("authorization", "Bearer from-args"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"key": "dark-mode", "value": false})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tool = tool(env(&[
            ("OPENFEATURE_OFREP_BASE_URL", "http://127.0.0.1:1"),
            ("OPENFEATURE_OFREP_BEARER_TOKEN", "from-env"),
        ]));

        let result = tool
            .execute(serde_json::json!({
                "base_url": server.uri(),
                "flag_key": "dark-mode",
                "context": {"targetingKey": "user-1"},
                "auth": {"bearer_token": "from-args"}
            }))
            .await
            .unwrap();

        assert_eq!(
            result.content,
            vec![ToolContent::text(
                r#"{"status":200,"data":{"key":"dark-mode","value":false}}"#
            )]
        );
    }

    #[tokio::test]
    async fn test_bulk_evaluation_from_environment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ofrep/v1/evaluate/flags"))
            .and(header("x-api-key", "env-key"))
            .respond_with(ResponseTemplate::new(304).insert_header("etag", "abc"))
            .mount(&server)
            .await;

        let base = server.uri();
        let tool = tool(env(&[
            ("OFREP_BASE_URL", base.as_str()),
            ("OFREP_API_KEY", "env-key"),
        ]));

        let result = tool
            .execute(serde_json::json!({"etag": "abc"}))
            .await
            .unwrap();

        assert_eq!(
            result.content,
            vec![ToolContent::text(
                r#"{"status":304,"etag":"abc","message":"Bulk evaluation not modified"}"#
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_base_url_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = tool(env(&[("OFREP_BEARER_TOKEN", "token")]));
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();

        assert!(
            err.to_string().starts_with("OFREP base URL is not configured"),
            "unexpected error: {}",
            err
        );
    }

    #[tokio::test]
    async fn test_invalid_base_url_rejected() {
        let tool = tool(env(&[]));

        let err = tool
            .execute(serde_json::json!({
                "base_url": "not a url",
                "auth": {"api_key": "k"}
            }))
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).starts_with("Invalid base_url 'not a url'"));
    }

    #[tokio::test]
    async fn test_non_string_targeting_key_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tool = tool(env(&[]));
        let err = tool
            .execute(serde_json::json!({
                "base_url": server.uri(),
                "context": {"targetingKey": 42},
                "auth": {"api_key": "k"}
            }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "context.targetingKey must be a string");
    }

    #[tokio::test]
    async fn test_empty_auth_value_rejected() {
        let tool = tool(env(&[]));

        let err = tool
            .execute(serde_json::json!({
                "base_url": "https://flags.example.com",
                "auth": {"bearer_token": ""}
            }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "auth.bearer_token must not be empty");
    }

    #[tokio::test]
    async fn test_non_json_success_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let tool = tool(env(&[]));
        let err = tool
            .execute(serde_json::json!({
                "base_url": server.uri(),
                "auth": {"api_key": "k"}
            }))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No JSON data returned from OFREP API");
    }
}
