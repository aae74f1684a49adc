//! Configuration file support for porter.
//!
//! porter supports two configuration file locations:
//! - Global: `~/.porter/config.toml` - User-wide defaults
//! - Project: `.porter/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::alias::SourceDistro;
use crate::matcher::{image, package, tag, PreferredVariant};

/// Registry host used when none is configured.
pub const DEFAULT_REGISTRY_HOST: &str = "cgr.dev";

/// Organization used when none is configured.
pub const DEFAULT_REGISTRY_ORG: &str = "chainguard";

/// porter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag matching settings
    pub tags: TagsConfig,

    /// Package mapping settings
    pub packages: PackagesConfig,

    /// Image mapping settings
    pub images: ImagesConfig,

    /// Image reference settings
    pub registry: RegistryConfig,
}

/// Tag matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Minimum score for a fuzzy tag match
    pub min_score: Option<f64>,

    /// Number of tags listed by `porter tag --rank`
    pub rank_limit: Option<usize>,

    /// Default variant (none, distroless, slim, dev)
    pub variant: Option<String>,

    /// Require dev tags by default
    pub require_dev: Option<bool>,
}

/// Package mapping configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Minimum score for a fuzzy package match
    pub min_score: Option<f64>,

    /// Number of packages listed by `porter search`
    pub rank_limit: Option<usize>,

    /// Alias dataset replacing the bundled one
    pub aliases: Option<PathBuf>,

    /// Default source distro (apt, yum, dnf, auto)
    pub source: Option<String>,
}

/// Image mapping configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Minimum score for a fuzzy image match
    pub min_score: Option<f64>,

    /// Number of images listed by `porter image`
    pub rank_limit: Option<usize>,

    /// Image catalog replacing the bundled one
    pub catalog: Option<PathBuf>,
}

/// Image reference configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry host (e.g., cgr.dev)
    pub host: Option<String>,

    /// Organization below the host
    pub org: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Tag settings
        if other.tags.min_score.is_some() {
            self.tags.min_score = other.tags.min_score;
        }
        if other.tags.rank_limit.is_some() {
            self.tags.rank_limit = other.tags.rank_limit;
        }
        if other.tags.variant.is_some() {
            self.tags.variant = other.tags.variant;
        }
        if other.tags.require_dev.is_some() {
            self.tags.require_dev = other.tags.require_dev;
        }

        // Package settings
        if other.packages.min_score.is_some() {
            self.packages.min_score = other.packages.min_score;
        }
        if other.packages.rank_limit.is_some() {
            self.packages.rank_limit = other.packages.rank_limit;
        }
        if other.packages.aliases.is_some() {
            self.packages.aliases = other.packages.aliases;
        }
        if other.packages.source.is_some() {
            self.packages.source = other.packages.source;
        }

        // Image settings
        if other.images.min_score.is_some() {
            self.images.min_score = other.images.min_score;
        }
        if other.images.rank_limit.is_some() {
            self.images.rank_limit = other.images.rank_limit;
        }
        if other.images.catalog.is_some() {
            self.images.catalog = other.images.catalog;
        }

        // Registry settings
        if other.registry.host.is_some() {
            self.registry.host = other.registry.host;
        }
        if other.registry.org.is_some() {
            self.registry.org = other.registry.org;
        }
    }

    pub fn tag_min_score(&self) -> f64 {
        self.tags.min_score.unwrap_or(tag::DEFAULT_MIN_SCORE)
    }

    pub fn tag_rank_limit(&self) -> usize {
        self.tags.rank_limit.unwrap_or(tag::DEFAULT_RANK_LIMIT)
    }

    /// Parse the default variant; unknown values are ignored with a warning.
    pub fn preferred_variant(&self) -> Option<PreferredVariant> {
        self.tags.variant.as_ref().and_then(|s| match s.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring `tags.variant` in config: {}", e);
                None
            }
        })
    }

    pub fn package_min_score(&self) -> f64 {
        self.packages.min_score.unwrap_or(package::DEFAULT_MIN_SCORE)
    }

    pub fn package_rank_limit(&self) -> usize {
        self.packages.rank_limit.unwrap_or(package::DEFAULT_RANK_LIMIT)
    }

    /// Parse the default source distro; unknown values are ignored with a warning.
    pub fn source_distro(&self) -> Option<SourceDistro> {
        self.packages.source.as_ref().and_then(|s| match s.parse() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Ignoring `packages.source` in config: {}", e);
                None
            }
        })
    }

    pub fn image_min_score(&self) -> f64 {
        self.images.min_score.unwrap_or(image::DEFAULT_MIN_SCORE)
    }

    pub fn image_rank_limit(&self) -> usize {
        self.images.rank_limit.unwrap_or(image::DEFAULT_RANK_LIMIT)
    }

    pub fn registry_host(&self) -> &str {
        self.registry.host.as_deref().unwrap_or(DEFAULT_REGISTRY_HOST)
    }

    pub fn registry_org(&self) -> &str {
        self.registry.org.as_deref().unwrap_or(DEFAULT_REGISTRY_ORG)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.porter/config.toml)
/// 2. Global config (~/.porter/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global porter config directory (~/.porter).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".porter"))
}

/// Get the project config path (.porter/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".porter").join("config.toml")
}
