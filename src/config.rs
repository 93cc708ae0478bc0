//! Configuration loading and types for inkpress.
//!
//! The site configuration lives in `inkpress.yaml` next to the content
//! directories. Publisher settings are environment variables and live in
//! [`crate::nostr`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level configuration for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

/// Site identity, used for page metadata, feeds, and canonical URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title, e.g. "Jane Developer"
    pub title: String,

    /// Base URL of the deployed site, e.g. "https://jane.github.io"
    pub url: String,

    /// One-line site description for feeds and meta tags
    #[serde(default)]
    pub description: String,

    /// Feed language code
    #[serde(default = "default_language")]
    pub language: String,
}

impl SiteConfig {
    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Canonical URL of a post page.
    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/blog/{}.html", self.base_url(), slug)
    }

    /// Host portion of the base URL, for display in attribution text.
    pub fn host(&self) -> &str {
        let url = self.base_url();
        url.split_once("://").map(|(_, rest)| rest).unwrap_or(url)
    }
}

fn default_language() -> String {
    "en-us".to_string()
}

/// Content and output directory layout, resolved relative to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory tree of markdown posts
    pub posts: PathBuf,
    /// Directory of page sources and static files
    pub src: PathBuf,
    /// Directory of HTML templates
    pub templates: PathBuf,
    /// Output directory (destroyed and recreated on every build)
    pub output: PathBuf,
    /// Optional extra assets, copied to `<output>/assets`
    pub public: PathBuf,
    /// Optional image directory, copied to `<output>/images`
    pub images: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: "posts".into(),
            src: "src".into(),
            templates: "src/templates".into(),
            output: "dist".into(),
            public: "public".into(),
            images: "images".into(),
        }
    }
}

impl RootConfig {
    /// Load the config from the command line argument, defaulting to `inkpress.yaml`
    pub async fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new("inkpress.yaml"));
        let config_file = if config_file.is_relative() {
            std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file)
        } else {
            config_file.to_path_buf()
        };

        Self::load_from_file(&config_file).await
    }

    /// Load the config from a file path
    pub(crate) async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(serde_yaml::from_str(&content)?)
    }
}
