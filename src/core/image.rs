//! Image names and the curated image catalog.
//!
//! Source images arrive as full references (`docker.io/library/python:3.12`,
//! `123456789012.dkr.ecr.us-east-1.amazonaws.com/team/api@sha256:...`). They
//! are reduced to a bare name before lookup: lower-cased, without digest or
//! tag, without the registry prefix.
//!
//! The catalog is a TOML document:
//!
//! ```toml
//! generic = ["alpine", "ubuntu", "ubi9/ubi-minimal"]
//!
//! [images]
//! python = ["python"]
//! openjdk = ["jdk", "jre"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

/// Image catalog shipped with the crate.
pub const BUNDLED_IMAGES: &str = include_str!("../../data/images.toml");

/// Well-known registry prefixes, most specific first.
const STATIC_REGISTRY_PREFIXES: &[&str] = &[
    "docker.io/library/",
    "docker.io/",
    "index.docker.io/library/",
    "index.docker.io/",
    "library/",
    "registry.access.redhat.com/",
    "registry.redhat.io/",
    "quay.io/",
    "gcr.io/",
    "ghcr.io/",
    "public.ecr.aws/",
    "mcr.microsoft.com/",
    "cgr.dev/chainguard/",
    "cgr.dev/",
];

/// Registries whose host varies per account or project.
static DYNAMIC_REGISTRY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // AWS ECR
        r"^\d+\.dkr\.ecr\.[a-z0-9-]+\.amazonaws\.com/",
        // GCR with a project
        r"^(us\.|eu\.|asia\.)?gcr\.io/[^/]+/",
        // Artifact Registry: host/project/repository/
        r"^[a-z0-9-]+-docker\.pkg\.dev/[^/]+/[^/]+/",
        // Azure ACR
        r"^[a-z0-9]+\.azurecr\.io/",
        // Any registry with a port
        r"^[a-z0-9.-]+:\d+/",
        // Internal registry with an organization
        r"^[a-z0-9.-]+\.[a-z]{2,}/[^/]+/",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Remove a known or pattern-matched registry prefix from a lower-case name.
pub fn strip_registry_prefix(image: &str) -> &str {
    if let Some(rest) = STATIC_REGISTRY_PREFIXES
        .iter()
        .find_map(|prefix| image.strip_prefix(*prefix))
    {
        return rest;
    }

    DYNAMIC_REGISTRY_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(image))
        .map_or(image, |found| &image[found.end()..])
}

/// Reduce an image reference to the name used for catalog lookups.
///
/// `registry.access.redhat.com/ubi9/ubi-minimal:latest` becomes
/// `ubi9/ubi-minimal`; a registry port is not mistaken for a tag.
pub fn normalize_image_name(reference: &str) -> String {
    let lowered = reference.trim().to_lowercase();
    let without_digest = lowered.split('@').next().unwrap_or(&lowered);

    let name_start = without_digest.rfind('/').map_or(0, |i| i + 1);
    let without_tag = match without_digest[name_start..].find(':') {
        Some(colon) => &without_digest[..name_start + colon],
        None => without_digest,
    };

    strip_registry_prefix(without_tag).to_string()
}

/// Last path segment of a normalized name (`bitnami/python` gives `python`).
pub fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    generic: Vec<String>,
    #[serde(default)]
    images: BTreeMap<String, Vec<String>>,
}

/// Source image name to curated image names, plus the generic base set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    aliases: BTreeMap<String, Vec<String>>,
    generic: BTreeSet<String>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        ImageCatalog::default()
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_IMAGES).context("failed to parse bundled image catalog")
    }

    /// Parse a TOML catalog. Keys are normalized like source references.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents).context("invalid image catalog")?;

        let mut catalog = ImageCatalog::new();
        for (name, targets) in file.images {
            if targets.is_empty() {
                tracing::warn!("Ignoring image alias `{}` with no targets", name);
                continue;
            }
            catalog = catalog.with_alias(&name, targets);
        }
        catalog.generic = file
            .generic
            .iter()
            .map(|name| normalize_image_name(name))
            .filter(|name| !name.is_empty())
            .collect();

        Ok(catalog)
    }

    /// Load a catalog from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read image catalog: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse image catalog: {}", path.display()))
    }

    pub fn with_alias<I, S>(mut self, name: &str, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.insert(
            normalize_image_name(name),
            targets.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn with_generic(mut self, name: &str) -> Self {
        self.generic.insert(normalize_image_name(name));
        self
    }

    /// Curated images for a normalized name.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.aliases.get(name).map(Vec::as_slice)
    }

    /// Aliases in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.aliases
            .iter()
            .map(|(name, targets)| (name.as_str(), targets.as_slice()))
    }

    /// Whether a normalized name, or its base name, is a generic OS base.
    pub fn is_generic(&self, name: &str) -> bool {
        self.generic.contains(name) || self.generic.contains(base_name(name))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
