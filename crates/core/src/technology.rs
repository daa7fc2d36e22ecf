// Install technologies and their bundled SDK installation prompts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target language or framework for OpenFeature SDK installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallTechnology {
    Dotnet,
    Go,
    Java,
    Javascript,
    Kotlin,
    Nestjs,
    Nodejs,
    Php,
    Python,
    React,
    Ruby,
    Swift,
}

impl InstallTechnology {
    pub const ALL: [InstallTechnology; 12] = [
        Self::Dotnet,
        Self::Go,
        Self::Java,
        Self::Javascript,
        Self::Kotlin,
        Self::Nestjs,
        Self::Nodejs,
        Self::Php,
        Self::Python,
        Self::React,
        Self::Ruby,
        Self::Swift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dotnet => "dotnet",
            Self::Go => "go",
            Self::Java => "java",
            Self::Javascript => "javascript",
            Self::Kotlin => "kotlin",
            Self::Nestjs => "nestjs",
            Self::Nodejs => "nodejs",
            Self::Php => "php",
            Self::Python => "python",
            Self::React => "react",
            Self::Ruby => "ruby",
            Self::Swift => "swift",
        }
    }

    /// The bundled installation prompt for this technology.
    ///
    /// Every prompt may carry a `<!-- PROVIDERS:START -->` /
    /// `<!-- PROVIDERS:END -->` region that the prompt composer fills in or
    /// strips.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Dotnet => include_str!("../prompts/dotnet.md"),
            Self::Go => include_str!("../prompts/go.md"),
            Self::Java => include_str!("../prompts/java.md"),
            Self::Javascript => include_str!("../prompts/javascript.md"),
            Self::Kotlin => include_str!("../prompts/kotlin.md"),
            Self::Nestjs => include_str!("../prompts/nestjs.md"),
            Self::Nodejs => include_str!("../prompts/nodejs.md"),
            Self::Php => include_str!("../prompts/php.md"),
            Self::Python => include_str!("../prompts/python.md"),
            Self::React => include_str!("../prompts/react.md"),
            Self::Ruby => include_str!("../prompts/ruby.md"),
            Self::Swift => include_str!("../prompts/swift.md"),
        }
    }
}

impl fmt::Display for InstallTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported install technology '{0}'")]
pub struct UnsupportedTechnology(pub String);

impl FromStr for InstallTechnology {
    type Err = UnsupportedTechnology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tech| tech.as_str() == s)
            .ok_or_else(|| UnsupportedTechnology(s.to_string()))
    }
}
