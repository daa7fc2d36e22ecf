// Provider documentation resources: openfeature+doc://{provider}/{language}

use crate::protocol::{ReadResourceResult, ResourceContents, ResourceTemplate, ToolContent};
use anyhow::{Context, Result};
use openfeature_mcp_core::technology::UnsupportedTechnology;
use openfeature_mcp_core::{InstallTechnology, ProviderDocsIndex};
use std::sync::Arc;
use tracing::{debug, warn};

pub const DOC_URI_PREFIX: &str = "openfeature+doc://";
pub const DOC_URI_TEMPLATE: &str = "openfeature+doc://{provider}/{language}";
pub const DOC_TEMPLATE_NAME: &str = "openfeature_provider_doc";

/// Whether a `DISABLE_RESOURCES` value turns resources off. Only `true`
/// and `1` do.
pub fn resources_disabled(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some("1"))
}

pub fn doc_uri(provider: &str, technology: InstallTechnology) -> String {
    format!("{}{}/{}", DOC_URI_PREFIX, provider, technology)
}

pub fn resource_name(provider: &str, technology: InstallTechnology) -> String {
    format!("{} {} OpenFeature Provider Documentation", provider, technology)
}

/// Resource links for the requested providers that have documentation for
/// `technology`. Providers without a URL, known or not, are skipped.
pub fn provider_resource_links(
    docs: &ProviderDocsIndex,
    providers: &[String],
    technology: InstallTechnology,
) -> Vec<ToolContent> {
    providers
        .iter()
        .filter(|provider| docs.doc_url(provider, technology).is_some())
        .map(|provider| ToolContent::ResourceLink {
            uri: doc_uri(provider, technology),
            name: resource_name(provider, technology),
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Unsupported resource URI '{0}', expected {DOC_URI_TEMPLATE}")]
    InvalidUri(String),

    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),

    #[error(transparent)]
    UnsupportedTechnology(#[from] UnsupportedTechnology),
}

/// The provider documentation resource template.
pub struct ProviderDocResources {
    docs: Arc<ProviderDocsIndex>,
    http: reqwest::Client,
}

impl ProviderDocResources {
    pub fn new(docs: Arc<ProviderDocsIndex>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("openfeature-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { docs, http })
    }

    pub fn template(&self) -> ResourceTemplate {
        ResourceTemplate {
            uri_template: DOC_URI_TEMPLATE.to_string(),
            name: DOC_TEMPLATE_NAME.to_string(),
            title: Some("OpenFeature Provider Docs".to_string()),
            description: Some(
                "Template for OpenFeature provider docs by provider and language.".to_string(),
            ),
        }
    }

    /// Split a resource URI into a known provider and a technology.
    pub fn parse_uri(&self, uri: &str) -> Result<(String, InstallTechnology), ResourceError> {
        let (provider, language) = uri
            .strip_prefix(DOC_URI_PREFIX)
            .and_then(|rest| rest.split_once('/'))
            .filter(|(provider, language)| !provider.is_empty() && !language.is_empty())
            .ok_or_else(|| ResourceError::InvalidUri(uri.to_string()))?;

        if !self.docs.contains(provider) {
            return Err(ResourceError::UnknownProvider(provider.to_string()));
        }
        Ok((provider.to_string(), language.parse()?))
    }

    /// Fetch the documentation behind a resource URI.
    ///
    /// Missing mappings and fetch failures are reported as `text/plain`
    /// contents, not errors.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let (provider, technology) = self.parse_uri(uri)?;

        let Some(href) = self.docs.doc_url(&provider, technology) else {
            return Ok(single(ResourceContents {
                uri: doc_uri(&provider, technology),
                name: None,
                mime_type: "text/plain".to_string(),
                text: format!(
                    "No documentation mapping found for provider='{}' language='{}'.",
                    provider, technology
                ),
            }));
        };

        debug!(href, "Fetching provider documentation");
        let response = match self.http.get(href).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(href, error = %e, "Provider documentation fetch failed");
                return Ok(fetch_error(href, &e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(href, status = status.as_u16(), "Provider documentation fetch failed");
            return Ok(single(ResourceContents {
                uri: href.to_string(),
                name: Some(resource_name(&provider, technology)),
                mime_type: "text/plain".to_string(),
                text: format!(
                    "Failed to fetch documentation ({} {}) from {}.",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(""),
                    href
                ),
            }));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        match response.text().await {
            Ok(text) => Ok(single(ResourceContents {
                uri: href.to_string(),
                name: None,
                mime_type,
                text,
            })),
            Err(e) => Ok(fetch_error(href, &e)),
        }
    }

    /// Completion values for a template argument.
    pub fn complete(&self, argument: &str, value: &str) -> Vec<String> {
        let needle = value.to_lowercase();
        let matches = |candidate: &str| candidate.to_lowercase().contains(&needle);

        match argument {
            "provider" => self
                .docs
                .provider_names()
                .filter(|name| matches(name))
                .map(str::to_string)
                .collect(),
            "language" => InstallTechnology::ALL
                .iter()
                .map(InstallTechnology::as_str)
                .filter(|name| matches(name))
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn single(contents: ResourceContents) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![contents],
    }
}

fn fetch_error(href: &str, err: &reqwest::Error) -> ReadResourceResult {
    single(ResourceContents {
        uri: href.to_string(),
        name: None,
        mime_type: "text/plain".to_string(),
        text: format!("Error fetching documentation from {}: {}", href, err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resources_for(base: &str) -> ProviderDocResources {
        let index = ProviderDocsIndex::from_entries(vec![
            (
                "acme",
                vec![
                    (InstallTechnology::Go, format!("{}/docs/acme-go", base)),
                    (InstallTechnology::Java, format!("{}/docs/missing", base)),
                ],
            ),
            (
                "Zeta",
                vec![(InstallTechnology::Python, format!("{}/docs/zeta", base))],
            ),
        ]);
        ProviderDocResources::new(Arc::new(index)).unwrap()
    }

    #[test]
    fn test_resources_disabled_values() {
        assert!(resources_disabled(Some("true")));
        assert!(resources_disabled(Some("1")));
        assert!(!resources_disabled(Some("yes")));
        assert!(!resources_disabled(Some("false")));
        assert!(!resources_disabled(None));
    }

    #[test]
    fn test_parse_uri() {
        let resources = resources_for("http://docs.invalid");

        let (provider, tech) = resources.parse_uri("openfeature+doc://acme/go").unwrap();
        assert_eq!(provider, "acme");
        assert_eq!(tech, InstallTechnology::Go);

        assert!(matches!(
            resources.parse_uri("https://acme/go"),
            Err(ResourceError::InvalidUri(_))
        ));
        assert!(matches!(
            resources.parse_uri("openfeature+doc://acme"),
            Err(ResourceError::InvalidUri(_))
        ));
        assert!(matches!(
            resources.parse_uri("openfeature+doc://nobody/go"),
            Err(ResourceError::UnknownProvider(_))
        ));
        assert!(matches!(
            resources.parse_uri("openfeature+doc://acme/cobol"),
            Err(ResourceError::UnsupportedTechnology(_))
        ));
    }

    #[tokio::test]
    async fn test_read_fetches_documentation() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/docs/acme-go"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("# Acme Go provider", "text/markdown"),
            )
            .mount(&server)
            .await;

        let resources = resources_for(&server.uri());
        let result = resources.read("openfeature+doc://acme/go").await.unwrap();

        assert_eq!(
            result.contents,
            vec![ResourceContents {
                uri: format!("{}/docs/acme-go", server.uri()),
                name: None,
                mime_type: "text/markdown".to_string(),
                text: "# Acme Go provider".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_read_reports_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let resources = resources_for(&server.uri());
        let result = resources.read("openfeature+doc://acme/java").await.unwrap();
        let contents = &result.contents[0];

        assert_eq!(contents.mime_type, "text/plain");
        assert_eq!(
            contents.name.as_deref(),
            Some("acme java OpenFeature Provider Documentation")
        );
        assert_eq!(
            contents.text,
            format!(
                "Failed to fetch documentation (404 Not Found) from {}/docs/missing.",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_read_without_mapping() {
        let resources = resources_for("http://docs.invalid");
        let result = resources.read("openfeature+doc://acme/ruby").await.unwrap();

        assert_eq!(result.contents[0].uri, "openfeature+doc://acme/ruby");
        assert_eq!(
            result.contents[0].text,
            "No documentation mapping found for provider='acme' language='ruby'."
        );
    }

    #[tokio::test]
    async fn test_read_reports_transport_failure() {
        let resources = resources_for("http://127.0.0.1:1");
        let result = resources.read("openfeature+doc://acme/go").await.unwrap();

        assert!(result.contents[0]
            .text
            .starts_with("Error fetching documentation from http://127.0.0.1:1/docs/acme-go: "));
    }

    #[test]
    fn test_complete_is_case_insensitive() {
        let resources = resources_for("http://docs.invalid");

        assert_eq!(resources.complete("provider", "ZE"), vec!["Zeta".to_string()]);
        assert_eq!(
            resources.complete("language", "java"),
            vec!["java".to_string(), "javascript".to_string()]
        );
        assert_eq!(resources.complete("provider", "").len(), 2);
        assert!(resources.complete("other", "a").is_empty());
    }

    #[test]
    fn test_links_skip_providers_without_docs() {
        let index = ProviderDocsIndex::from_entries(vec![
            ("acme", vec![(InstallTechnology::Go, "https://docs.acme.dev/go")]),
            ("zeta", vec![(InstallTechnology::Python, "https://zeta.dev/python")]),
        ]);
        let providers = vec!["zeta".to_string(), "acme".to_string(), "unknown".to_string()];

        assert_eq!(
            provider_resource_links(&index, &providers, InstallTechnology::Go),
            vec![ToolContent::ResourceLink {
                uri: "openfeature+doc://acme/go".to_string(),
                name: "acme go OpenFeature Provider Documentation".to_string(),
            }]
        );
    }
}
