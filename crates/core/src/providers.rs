// Provider documentation index: provider name -> install technology -> docs URL

use crate::technology::InstallTechnology;
use crate::technology::InstallTechnology::*;
use std::collections::BTreeMap;

/// Read-only lookup of per-technology provider documentation.
///
/// Provider names are kept sorted so listings are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDocsIndex {
    providers: BTreeMap<String, BTreeMap<InstallTechnology, String>>,
}

impl ProviderDocsIndex {
    /// Build an index from `(provider, [(technology, url)])` entries.
    ///
    /// A provider listed twice has its technology maps merged; the first URL
    /// seen for a technology wins.
    pub fn from_entries<P, U, I>(entries: impl IntoIterator<Item = (P, I)>) -> Self
    where
        P: Into<String>,
        U: Into<String>,
        I: IntoIterator<Item = (InstallTechnology, U)>,
    {
        let mut providers: BTreeMap<String, BTreeMap<InstallTechnology, String>> = BTreeMap::new();
        for (name, docs) in entries {
            let by_tech = providers.entry(name.into()).or_default();
            for (tech, url) in docs {
                by_tech.entry(tech).or_insert_with(|| url.into());
            }
        }
        Self { providers }
    }

    /// The provider dataset shipped with this crate.
    pub fn bundled() -> Self {
        Self::from_entries(
            BUNDLED_PROVIDER_DOCS
                .iter()
                .map(|(name, docs)| (*name, docs.iter().map(|(tech, url)| (*tech, *url)))),
        )
    }

    /// Whether the provider has an entry at all.
    pub fn contains(&self, provider: &str) -> bool {
        self.providers.contains_key(provider)
    }

    /// All documented technologies for a provider, or `None` if unknown.
    pub fn technologies(&self, provider: &str) -> Option<&BTreeMap<InstallTechnology, String>> {
        self.providers.get(provider)
    }

    /// The documentation URL for a provider/technology pair.
    pub fn doc_url(&self, provider: &str, technology: InstallTechnology) -> Option<&str> {
        self.providers
            .get(provider)
            .and_then(|docs| docs.get(&technology))
            .map(String::as_str)
    }

    /// Known provider names in sorted order.
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Snapshot of the openfeature.dev provider dataset.
const BUNDLED_PROVIDER_DOCS: &[(&str, &[(InstallTechnology, &str)])] = &[
    (
        "cloudbees",
        &[
            (Java, "https://github.com/rollout/cloudbees-openfeature-provider-java"),
            (Nodejs, "https://github.com/rollout/cloudbees-openfeature-provider-node"),
            (Go, "https://github.com/rollout/cloudbees-openfeature-provider-go"),
        ],
    ),
    (
        "configcat",
        &[
            (Dotnet, "https://github.com/open-feature/dotnet-sdk-contrib/tree/main/src/OpenFeature.Contrib.Providers.ConfigCat"),
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/configcat"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/configcat"),
            (Javascript, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/config-cat-web"),
            (Nodejs, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/config-cat"),
            (Php, "https://github.com/open-feature/php-sdk-contrib/tree/main/providers/ConfigCat"),
            (Python, "https://github.com/configcat/openfeature-python"),
        ],
    ),
    (
        "devcycle",
        &[
            (Dotnet, "https://docs.devcycle.com/sdk/server-side-sdks/dotnet/dotnet-openfeature"),
            (Go, "https://docs.devcycle.com/sdk/server-side-sdks/go/go-openfeature"),
            (Java, "https://docs.devcycle.com/sdk/server-side-sdks/java/java-openfeature"),
            (Javascript, "https://docs.devcycle.com/sdk/client-side-sdks/javascript/javascript-openfeature"),
            (Kotlin, "https://docs.devcycle.com/sdk/client-side-sdks/android/android-openfeature"),
            (Nestjs, "https://docs.devcycle.com/sdk/server-side-sdks/nestjs/nestjs-openfeature"),
            (Nodejs, "https://docs.devcycle.com/sdk/server-side-sdks/node/node-openfeature"),
            (Python, "https://docs.devcycle.com/sdk/server-side-sdks/python/python-openfeature"),
            (React, "https://docs.devcycle.com/sdk/client-side-sdks/react/react-openfeature"),
            (Ruby, "https://docs.devcycle.com/sdk/server-side-sdks/ruby/ruby-openfeature"),
            (Swift, "https://docs.devcycle.com/sdk/client-side-sdks/ios/ios-openfeature"),
        ],
    ),
    (
        "flagd",
        &[
            (Dotnet, "https://github.com/open-feature/dotnet-sdk-contrib/tree/main/src/OpenFeature.Contrib.Providers.Flagd"),
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/flagd"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/flagd"),
            (Javascript, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/flagd-web"),
            (Nodejs, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/flagd"),
            (Php, "https://github.com/open-feature/php-sdk-contrib/tree/main/providers/Flagd"),
            (Python, "https://github.com/open-feature/python-sdk-contrib/tree/main/providers/openfeature-provider-flagd"),
            (Ruby, "https://github.com/open-feature/ruby-sdk-contrib/tree/main/providers/openfeature-flagd-provider"),
        ],
    ),
    (
        "flagsmith",
        &[
            (Dotnet, "https://github.com/open-feature/dotnet-sdk-contrib/tree/main/src/OpenFeature.Contrib.Providers.Flagsmith"),
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/flagsmith"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/flagsmith"),
            (Javascript, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/flagsmith-client"),
            (Php, "https://github.com/open-feature/php-sdk-contrib/tree/main/providers/Flagsmith"),
            (Python, "https://github.com/Flagsmith/flagsmith-openfeature-provider-python"),
            (Ruby, "https://github.com/open-feature/ruby-sdk-contrib/tree/main/providers/openfeature-flagsmith-provider"),
        ],
    ),
    (
        "flipt",
        &[
            (Dotnet, "https://github.com/open-feature/dotnet-sdk-contrib/tree/main/src/OpenFeature.Contrib.Providers.Flipt"),
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/flipt"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/flipt"),
            (Javascript, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/flipt-web"),
            (Nodejs, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/flipt"),
        ],
    ),
    (
        "go-feature-flag",
        &[
            (Dotnet, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_dotnet"),
            (Go, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_go"),
            (Java, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_java"),
            (Javascript, "https://gofeatureflag.org/docs/sdk/client_providers/openfeature_javascript"),
            (Kotlin, "https://gofeatureflag.org/docs/sdk/client_providers/openfeature_android"),
            (Nodejs, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_javascript"),
            (Php, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_php"),
            (Python, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_python"),
            (Ruby, "https://gofeatureflag.org/docs/sdk/server_providers/openfeature_ruby"),
            (Swift, "https://gofeatureflag.org/docs/sdk/client_providers/openfeature_swift"),
        ],
    ),
    (
        "growthbook",
        &[
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/growthbook"),
            (Javascript, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/growthbook-client"),
            (Nodejs, "https://github.com/open-feature/js-sdk-contrib/tree/main/libs/providers/growthbook"),
        ],
    ),
    (
        "launchdarkly",
        &[
            (Dotnet, "https://github.com/launchdarkly/openfeature-dotnet-server"),
            (Go, "https://github.com/launchdarkly/openfeature-go-server"),
            (Java, "https://github.com/launchdarkly/openfeature-java-server"),
            (Javascript, "https://github.com/launchdarkly/openfeature-js-client"),
            (Nodejs, "https://github.com/launchdarkly/openfeature-node-server"),
            (Php, "https://github.com/launchdarkly/openfeature-php-server"),
            (Python, "https://github.com/launchdarkly/openfeature-python-server"),
            (Ruby, "https://github.com/launchdarkly/openfeature-ruby-server"),
        ],
    ),
    (
        "posthog",
        &[(Nodejs, "https://github.com/tapico/tapico-openfeature-posthog")],
    ),
    (
        "split",
        &[
            (Go, "https://github.com/splitio/split-openfeature-provider-go"),
            (Java, "https://github.com/splitio/split-openfeature-provider-java"),
            (Nodejs, "https://github.com/splitio/split-openfeature-provider-js"),
            (Python, "https://github.com/splitio/split-openfeature-provider-python"),
        ],
    ),
    (
        "statsig",
        &[
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/statsig"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/statsig"),
        ],
    ),
    (
        "unleash",
        &[
            (Go, "https://github.com/open-feature/go-sdk-contrib/tree/main/providers/unleash"),
            (Java, "https://github.com/open-feature/java-sdk-contrib/tree/main/providers/unleash"),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_index_lookups() {
        let index = ProviderDocsIndex::bundled();

        assert!(index.contains("flagd"));
        assert!(!index.contains("not-a-provider"));
        assert_eq!(
            index.doc_url("flagd", InstallTechnology::Go),
            Some("https://github.com/open-feature/go-sdk-contrib/tree/main/providers/flagd")
        );
        // Known provider without a Swift integration
        assert_eq!(index.doc_url("flagd", InstallTechnology::Swift), None);
    }

    #[test]
    fn test_provider_names_sorted() {
        let index = ProviderDocsIndex::bundled();
        let names: Vec<&str> = index.provider_names().collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), index.len());
    }

    #[test]
    fn test_from_entries_merges_duplicates() {
        let index = ProviderDocsIndex::from_entries(vec![
            ("acme", vec![(InstallTechnology::Go, "https://first.example/go")]),
            (
                "acme",
                vec![
                    (InstallTechnology::Go, "https://second.example/go"),
                    (InstallTechnology::Python, "https://second.example/py"),
                ],
            ),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.doc_url("acme", InstallTechnology::Go), Some("https://first.example/go"));
        assert_eq!(
            index.doc_url("acme", InstallTechnology::Python),
            Some("https://second.example/py")
        );
    }
}
