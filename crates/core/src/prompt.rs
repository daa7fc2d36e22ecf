// Provider section injection for SDK installation prompts

use crate::error::{OpenFeatureResult, UnknownProviderError};
use crate::providers::ProviderDocsIndex;
use crate::technology::InstallTechnology;
use once_cell::sync::Lazy;
use regex::Regex;

static PROVIDERS_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*PROVIDERS:START\s*-->.*?<!--\s*PROVIDERS:END\s*-->")
        .expect("provider marker pattern is valid")
});

const PROVIDER_SECTION_HEADER: &str = "### Step 2: Provider installation";

/// Name under which clients can fetch provider docs as an MCP resource.
pub fn provider_doc_resource_name(provider: &str, technology: InstallTechnology) -> String {
    format!("of-provider-doc:{}:{}", provider, technology)
}

/// Builds installation prompts with provider-specific instructions.
pub struct PromptComposer<'a> {
    docs: &'a ProviderDocsIndex,
    resource_links: bool,
}

impl<'a> PromptComposer<'a> {
    /// `resource_links` controls whether provider lines point agents at the
    /// MCP documentation resource before the plain URL.
    pub fn new(docs: &'a ProviderDocsIndex, resource_links: bool) -> Self {
        Self {
            docs,
            resource_links,
        }
    }

    /// One instruction line per requested provider, in request order.
    ///
    /// Fails on the first provider missing from the docs index. A known
    /// provider without a URL for `technology` gets a search instruction.
    pub fn provider_lines(
        &self,
        providers: &[String],
        technology: InstallTechnology,
    ) -> Result<Vec<String>, UnknownProviderError> {
        providers
            .iter()
            .map(|provider| self.provider_line(provider, technology))
            .collect()
    }

    fn provider_line(
        &self,
        provider: &str,
        technology: InstallTechnology,
    ) -> Result<String, UnknownProviderError> {
        let docs = self
            .docs
            .technologies(provider)
            .ok_or_else(|| UnknownProviderError {
                provider: provider.to_string(),
                known: self.docs.provider_names().map(str::to_string).collect(),
            })?;

        let line = match docs.get(&technology) {
            Some(url) if self.resource_links => format!(
                "- **{provider}**: If your AI Agent supports MCP resources, fetch the MCP resource named `{resource}` \
                 (otherwise read the documentation from this link: {url}) \
                 and evaluate the best way to install and configure this provider alongside the OpenFeature {technology} SDK.",
                resource = provider_doc_resource_name(provider, technology),
            ),
            Some(url) => format!(
                "- **{provider}**: Read the provider documentation from this link: {url} \
                 and evaluate the best way to install and configure this provider alongside the OpenFeature {technology} SDK.",
            ),
            None => format!(
                "- **{provider}**: No specific {technology} documentation URL found. \
                 Search for \"{provider} OpenFeature {technology}\" installation documentation \
                 and provide installation instructions if available.",
            ),
        };
        Ok(line)
    }

    /// Compose the final prompt for `technology`.
    ///
    /// With providers, the marked region is replaced by a provider section,
    /// or the lines are appended when the template has no markers. Without
    /// providers, the marked region is removed.
    pub fn compose(
        &self,
        template: &str,
        providers: &[String],
        technology: InstallTechnology,
    ) -> OpenFeatureResult<String> {
        let lines = self.provider_lines(providers, technology)?;
        Ok(inject_provider_lines(template, &lines, technology))
    }
}

/// Apply already-built provider lines to a template.
pub fn inject_provider_lines(
    template: &str,
    lines: &[String],
    technology: InstallTechnology,
) -> String {
    if lines.is_empty() {
        return PROVIDERS_MARKER.replace(template, "").into_owned();
    }

    if PROVIDERS_MARKER.is_match(template) {
        let block = format!("{}\n\n{}", PROVIDER_SECTION_HEADER, lines.join("\n"));
        // NoExpand: URLs or names containing `$` are inserted literally.
        PROVIDERS_MARKER
            .replace(template, regex::NoExpand(&block))
            .into_owned()
    } else {
        format!(
            "{}\n\n---\n\nProvider installation instructions for {}:\n\n{}",
            template,
            technology,
            lines.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenFeatureError;

    const TEMPLATE: &str = "# Install\n\nStep 1\n\n<!-- PROVIDERS:START -->\nplaceholder\n<!-- PROVIDERS:END -->\n\nStep 3\n";

    fn index() -> ProviderDocsIndex {
        ProviderDocsIndex::from_entries(vec![
            ("acme", vec![(InstallTechnology::Go, "https://docs.acme.dev/go")]),
            ("zeta", vec![(InstallTechnology::Python, "https://zeta.dev/python")]),
        ])
    }

    fn names(providers: &[&str]) -> Vec<String> {
        providers.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_zero_providers_strips_marker_region() {
        let index = index();
        let composer = PromptComposer::new(&index, true);

        let prompt = composer.compose(TEMPLATE, &[], InstallTechnology::Go).unwrap();
        assert_eq!(prompt, "# Install\n\nStep 1\n\n\n\nStep 3\n");
    }

    #[test]
    fn test_markers_replaced_with_provider_section() {
        let index = index();
        let composer = PromptComposer::new(&index, false);

        let prompt = composer
            .compose(TEMPLATE, &names(&["acme"]), InstallTechnology::Go)
            .unwrap();

        assert!(prompt.starts_with("# Install\n\nStep 1\n\n### Step 2: Provider installation\n\n- **acme**: Read the provider documentation from this link: https://docs.acme.dev/go "));
        assert!(prompt.ends_with("alongside the OpenFeature go SDK.\n\nStep 3\n"));
        assert!(!prompt.contains("PROVIDERS:START"));
        assert!(!prompt.contains("placeholder"));
    }

    #[test]
    fn test_marker_whitespace_is_tolerated() {
        let index = index();
        let composer = PromptComposer::new(&index, false);
        let template = "a<!--PROVIDERS:START   -->x<!--   PROVIDERS:END-->b";

        assert_eq!(composer.compose(template, &[], InstallTechnology::Go).unwrap(), "ab");
    }

    #[test]
    fn test_missing_markers_appends_section() {
        let index = index();
        let composer = PromptComposer::new(&index, false);

        let prompt = composer
            .compose("# Install", &names(&["acme"]), InstallTechnology::Go)
            .unwrap();

        assert!(prompt.starts_with(
            "# Install\n\n---\n\nProvider installation instructions for go:\n\n- **acme**:"
        ));
    }

    #[test]
    fn test_resource_link_wording() {
        let index = index();
        let composer = PromptComposer::new(&index, true);

        let lines = composer
            .provider_lines(&names(&["acme"]), InstallTechnology::Go)
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "- **acme**: If your AI Agent supports MCP resources, fetch the MCP resource named \
                 `of-provider-doc:acme:go` (otherwise read the documentation from this link: \
                 https://docs.acme.dev/go) and evaluate the best way to install and configure this \
                 provider alongside the OpenFeature go SDK."
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_known_provider_without_url_gets_search_line() {
        let index = index();
        let composer = PromptComposer::new(&index, true);

        let lines = composer
            .provider_lines(&names(&["zeta"]), InstallTechnology::Go)
            .unwrap();

        assert_eq!(
            lines[0],
            "- **zeta**: No specific go documentation URL found. Search for \"zeta OpenFeature go\" \
             installation documentation and provide installation instructions if available."
        );
    }

    #[test]
    fn test_unknown_provider_lists_known_providers() {
        let index = index();
        let composer = PromptComposer::new(&index, true);

        let err = composer
            .compose(TEMPLATE, &names(&["acme", "foo"]), InstallTechnology::Go)
            .unwrap_err();

        match err {
            OpenFeatureError::UnknownProvider(e) => {
                assert_eq!(e.provider, "foo");
                assert_eq!(
                    e.to_string(),
                    "Provider 'foo' is not recognized. Available providers: acme, zeta"
                );
            }
            other => panic!("Expected unknown provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let index = index();
        let composer = PromptComposer::new(&index, false);

        let lines = composer
            .provider_lines(&names(&["zeta", "acme", "zeta"]), InstallTechnology::Python)
            .unwrap();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("- **zeta**: Read"));
        assert!(lines[1].starts_with("- **acme**: No specific python"));
        assert!(lines[2].starts_with("- **zeta**: Read"));
    }

    #[test]
    fn test_bundled_prompt_without_providers() {
        let index = ProviderDocsIndex::bundled();
        let composer = PromptComposer::new(&index, true);

        for tech in InstallTechnology::ALL {
            let prompt = composer.compose(tech.prompt(), &[], tech).unwrap();
            assert!(!prompt.contains("PROVIDERS:"));
            assert!(!prompt.contains("### Step 2"));
        }
    }
}
