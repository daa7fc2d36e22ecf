// MCP (Model Context Protocol) server exposing OpenFeature tools over stdio

pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use server::McpServer;
