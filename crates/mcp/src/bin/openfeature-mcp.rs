// Standalone MCP server binary

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use openfeature_mcp::resources::{resources_disabled, ProviderDocResources};
use openfeature_mcp::server::McpServer;
use openfeature_mcp::tools::*;
use openfeature_mcp_core::{OfrepClient, ProcessEnvironment, ProviderDocsIndex};
use std::sync::Arc;

#[derive(ValueEnum, Copy, Clone, Debug)]
enum LogFormat {
    Text,
    Json,
}

/// OpenFeature MCP server over stdio
#[derive(Parser, Debug)]
#[command(name = "openfeature-mcp", version, about)]
struct Args {
    /// Disable provider documentation resources and resource links
    #[arg(
        long,
        env = "DISABLE_RESOURCES",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = parse_toggle
    )]
    disable_resources: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "OPENFEATURE_MCP_LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,
}

fn parse_toggle(value: &str) -> Result<bool, String> {
    Ok(resources_disabled(Some(value)))
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    tracing::info!("OpenFeature MCP Server starting...");

    let resources_enabled = !args.disable_resources;
    let docs = Arc::new(ProviderDocsIndex::bundled());

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(InstallSdkTool::new(docs.clone(), resources_enabled)));
    registry.register(Arc::new(OfrepEvalTool::new(
        OfrepClient::new()?,
        Arc::new(ProcessEnvironment),
    )));

    tracing::info!(
        tools = registry.list_schemas().len(),
        providers = docs.len(),
        resources_enabled,
        "Registered tools"
    );

    let resources = if resources_enabled {
        Some(ProviderDocResources::new(docs)?)
    } else {
        None
    };
    let server = McpServer::new(registry, resources);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Received interrupt, shutting down"),
    }

    Ok(())
}
