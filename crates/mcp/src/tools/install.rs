// SDK installation guide tool

use crate::protocol::{CallToolResult, ToolAnnotations, ToolContent, ToolSchema};
use crate::resources::provider_resource_links;
use crate::tools::{json_schema_array, json_schema_enum, json_schema_object, Tool};
use anyhow::{Context, Result};
use openfeature_mcp_core::{InstallTechnology, PromptComposer, ProviderDocsIndex};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Returns the installation guide for an OpenFeature SDK, with optional
/// provider-specific instructions.
pub struct InstallSdkTool {
    docs: Arc<ProviderDocsIndex>,
    resources_enabled: bool,
}

impl InstallSdkTool {
    pub fn new(docs: Arc<ProviderDocsIndex>, resources_enabled: bool) -> Self {
        Self {
            docs,
            resources_enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstallSdkArgs {
    technology: InstallTechnology,
    #[serde(default)]
    providers: Vec<String>,
}

#[async_trait::async_trait]
impl Tool for InstallSdkTool {
    fn schema(&self) -> ToolSchema {
        let technologies: Vec<&str> = InstallTechnology::ALL.iter().map(|t| t.as_str()).collect();
        let providers: Vec<&str> = self.docs.provider_names().collect();

        ToolSchema {
            name: "install_openfeature_sdk".to_string(),
            description: "Fetch OpenFeature SDK installation instructions, and follow the instructions to install the OpenFeature SDK. \
                          If you are installing a provider, also fetches the provider installation instructions. \
                          Also includes documentation and examples for using OpenFeature SDK in your application. \
                          Choose the technology that matches the application's language/framework."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "technology": json_schema_enum(&technologies, "Target language or framework"),
                    "providers": json_schema_array(
                        json_schema_enum(&providers, "Provider name"),
                        "Feature flag providers to include installation instructions for (default: none)",
                    ),
                }),
                vec!["technology"],
            ),
            annotations: Some(ToolAnnotations {
                title: Some("Install OpenFeature SDK".to_string()),
                read_only_hint: Some(true),
            }),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: InstallSdkArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for install_openfeature_sdk")?;

        let composer = PromptComposer::new(&self.docs, self.resources_enabled);
        let text = composer.compose(args.technology.prompt(), &args.providers, args.technology)?;
        debug!(technology = %args.technology, providers = ?args.providers, "Composed install prompt");

        let mut content = vec![ToolContent::text(text)];
        if self.resources_enabled {
            content.extend(provider_resource_links(
                &self.docs,
                &args.providers,
                args.technology,
            ));
        }

        Ok(CallToolResult {
            content,
            is_error: None,
        })
    }
}
