// Core logic for the OpenFeature MCP server: OFREP evaluation and SDK install prompts

pub mod config;
pub mod error;
pub mod ofrep;
pub mod prompt;
pub mod providers;
pub mod technology;

pub use config::{ConfigOverrides, Credential, EndpointConfig, Environment, ProcessEnvironment};
pub use error::{
    ConfigurationError, OfrepError, OpenFeatureError, OpenFeatureResult, UnknownProviderError,
};
pub use ofrep::{EvaluationOutcome, EvaluationRequest, OfrepClient};
pub use prompt::PromptComposer;
pub use providers::ProviderDocsIndex;
pub use technology::InstallTechnology;
