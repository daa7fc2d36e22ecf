//! Error types for the OpenFeature MCP core.

/// Result type for core operations.
pub type OpenFeatureResult<T> = Result<T, OpenFeatureError>;

/// Any failure raised by the core components.
#[derive(Debug, thiserror::Error)]
pub enum OpenFeatureError {
    /// OFREP endpoint configuration could not be resolved.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A provider name passed to the prompt composer is not in the docs index.
    #[error(transparent)]
    UnknownProvider(#[from] UnknownProviderError),

    /// The OFREP call produced something that is not a reportable outcome.
    #[error(transparent)]
    Ofrep(#[from] OfrepError),
}

/// Failure to produce a valid [`EndpointConfig`](crate::config::EndpointConfig)
/// after all configuration layers were merged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "OFREP base URL is not configured: pass base_url, set OPENFEATURE_OFREP_BASE_URL \
         (or OFREP_BASE_URL), or add OFREP.baseUrl to the config file"
    )]
    MissingBaseUrl,

    #[error("OFREP base URL '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("At least one of bearerToken or apiKey must be provided")]
    MissingCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Provider '{provider}' is not recognized. Available providers: {}", .known.join(", "))]
pub struct UnknownProviderError {
    pub provider: String,
    pub known: Vec<String>,
}

/// Local OFREP failures. HTTP errors and transport failures are not
/// represented here; they are reported as evaluation outcomes.
#[derive(Debug, thiserror::Error)]
pub enum OfrepError {
    #[error("No JSON data returned from OFREP API")]
    NoJsonData,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
