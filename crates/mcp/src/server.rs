//! MCP server with stdio transport
//!
//! Reads newline-delimited JSON-RPC 2.0 messages and writes one response
//! line per request. Notifications get no response.

use crate::protocol::*;
use crate::resources::ProviderDocResources;
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "OpenFeature MCP Server";

pub struct McpServer {
    registry: ToolRegistry,
    resources: Option<ProviderDocResources>,
}

impl McpServer {
    /// `resources` is `None` when documentation resources are disabled; the
    /// resource and completion capabilities are then not advertised.
    pub fn new(registry: ToolRegistry, resources: Option<ProviderDocResources>) -> Self {
        Self {
            registry,
            resources,
        }
    }

    /// Serve on the process stdin/stdout until EOF.
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.serve(stdin, tokio::io::stdout()).await
    }

    /// Serve JSON-RPC lines from `reader`, writing responses to `writer`.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server started, listening on stdin...");
        let mut line = String::new();

        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .await
                .context("Failed to read request line")?;
            if read == 0 {
                debug!("Received EOF, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!("Received request: {}", trimmed);

            let Some(response) = self.handle_line(trimmed).await else {
                continue;
            };

            let mut out = match serde_json::to_string(&response) {
                Ok(out) => out,
                Err(e) => {
                    error!("Failed to serialize response: {}", e);
                    continue;
                }
            };
            debug!("Sending response: {}", out);
            out.push('\n');

            writer
                .write_all(out.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
        }

        info!("MCP server shutting down");
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Invalid JSON-RPC message: {}", e);
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
            }
        }
    }

    /// Dispatch a single request. Returns `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "resources/list" if self.resources.is_some() => {
                JsonRpcResponse::success(id, ListResourcesResult { resources: Vec::new() })
            }
            "resources/templates/list" => match &self.resources {
                Some(resources) => JsonRpcResponse::success(
                    id,
                    ListResourceTemplatesResult {
                        resource_templates: vec![resources.template()],
                    },
                ),
                None => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&request.method)),
            },
            "resources/read" => self.handle_resources_read(id, request.params).await,
            "completion/complete" => self.handle_complete(id, request.params),
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match parse_params::<InitializeParams>(params) {
            Ok(params) => info!(
                client = %params.client_info.name,
                client_version = %params.client_info.version,
                protocol = %params.protocol_version,
                "MCP client connected"
            ),
            Err(e) => debug!("Initialize without client info: {}", e.message),
        }

        let resources_enabled = self.resources.is_some();
        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: false,
            }),
            resources: resources_enabled.then_some(ResourcesCapability {
                subscribe: false,
                list_changed: false,
            }),
            completions: resources_enabled.then(|| serde_json::json!({})),
        };

        JsonRpcResponse::success(
            id,
            InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities,
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
        )
    }

    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match parse_params(params) {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, e),
        };
        let arguments = params
            .arguments
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        match self.registry.call(&params.name, arguments).await {
            Some(result) => JsonRpcResponse::success(id, result),
            None => JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            ),
        }
    }

    async fn handle_resources_read(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(resources) = &self.resources else {
            return JsonRpcResponse::error(id, JsonRpcError::method_not_found("resources/read"));
        };
        let params: ReadResourceParams = match parse_params(params) {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        match resources.read(&params.uri).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
        }
    }

    fn handle_complete(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(resources) = &self.resources else {
            return JsonRpcResponse::error(id, JsonRpcError::method_not_found("completion/complete"));
        };
        let params: CompleteParams = match parse_params(params) {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, e),
        };

        let values = match params.reference.uri.as_deref() {
            Some(crate::resources::DOC_URI_TEMPLATE) => {
                resources.complete(&params.argument.name, &params.argument.value)
            }
            _ => Vec::new(),
        };

        JsonRpcResponse::success(
            id,
            CompleteResult {
                completion: Completion {
                    total: values.len(),
                    has_more: false,
                    values,
                },
            },
        )
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}
