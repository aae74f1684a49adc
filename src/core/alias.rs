//! Alias tables - exact source-package to target-package mappings.
//!
//! The dataset is a TOML document with one table per source distribution:
//!
//! ```toml
//! [packages.debian]
//! ssh = ["openssh-client", "openssh-server"]
//! build-essential = ["build-base"]
//! apt-transport-https = []
//!
//! [packages.fedora]
//! openssl-devel = ["openssl-dev"]
//! ```
//!
//! An empty list means the package has no equivalent and can be dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matcher::errors::MatchError;

/// Alias dataset shipped with the crate.
pub const BUNDLED_ALIASES: &str = include_str!("../../data/aliases.toml");

/// Distribution family an alias table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasSource {
    Debian,
    Fedora,
}

impl fmt::Display for AliasSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasSource::Debian => write!(f, "debian"),
            AliasSource::Fedora => write!(f, "fedora"),
        }
    }
}

/// Package manager the source names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDistro {
    Apt,
    Yum,
    Dnf,
    /// Try apt naming first, then yum.
    #[default]
    Auto,
}

impl SourceDistro {
    /// Alias tables to consult, in order.
    pub fn alias_sources(self) -> &'static [AliasSource] {
        match self {
            SourceDistro::Apt => &[AliasSource::Debian],
            SourceDistro::Yum | SourceDistro::Dnf => &[AliasSource::Fedora],
            SourceDistro::Auto => &[AliasSource::Debian, AliasSource::Fedora],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceDistro::Apt => "apt",
            SourceDistro::Yum => "yum",
            SourceDistro::Dnf => "dnf",
            SourceDistro::Auto => "auto",
        }
    }
}

impl fmt::Display for SourceDistro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceDistro {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apt" => Ok(SourceDistro::Apt),
            "yum" => Ok(SourceDistro::Yum),
            "dnf" => Ok(SourceDistro::Dnf),
            "auto" => Ok(SourceDistro::Auto),
            _ => Err(MatchError::invalid_input(format!(
                "unknown source distro '{}', valid values: apt, yum, dnf, auto",
                s
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AliasFile {
    #[serde(default)]
    packages: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// Immutable source-name to target-names mapping per distro family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    tables: BTreeMap<AliasSource, BTreeMap<String, Vec<String>>>,
}

impl AliasTable {
    pub fn new() -> Self {
        AliasTable::default()
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_ALIASES).context("failed to parse bundled alias dataset")
    }

    /// Parse a TOML alias dataset. Keys are lower-cased.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: AliasFile = toml::from_str(contents).context("invalid alias dataset")?;

        let mut tables = BTreeMap::new();
        for (section, entries) in file.packages {
            let source = match section.to_lowercase().as_str() {
                "debian" => AliasSource::Debian,
                "fedora" => AliasSource::Fedora,
                _ => {
                    tracing::warn!("Ignoring unknown alias section `packages.{}`", section);
                    continue;
                }
            };

            let entries: BTreeMap<String, Vec<String>> = entries
                .into_iter()
                .map(|(name, targets)| (name.trim().to_lowercase(), targets))
                .collect();
            tables.insert(source, entries);
        }

        Ok(AliasTable { tables })
    }

    /// Load an alias dataset from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read alias dataset: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse alias dataset: {}", path.display()))
    }

    /// Builder used by tests and callers assembling synthetic tables.
    pub fn with_alias<I, S>(mut self, source: AliasSource, name: &str, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(source)
            .or_default()
            .insert(name.trim().to_lowercase(), targets.into_iter().map(Into::into).collect());
        self
    }

    /// Look a key up in one table.
    pub fn get(&self, source: AliasSource, key: &str) -> Option<&[String]> {
        self.tables
            .get(&source)
            .and_then(|t| t.get(key))
            .map(Vec::as_slice)
    }

    /// Search the tables for `distro` in order; the first hit wins.
    pub fn lookup(&self, distro: SourceDistro, key: &str) -> Option<(AliasSource, &[String])> {
        distro
            .alias_sources()
            .iter()
            .find_map(|&source| self.get(source, key).map(|targets| (source, targets)))
    }

    /// Total number of aliases across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_dataset() {
        let table = AliasTable::from_toml_str(
            r#"
[packages.debian]
ssh = ["openssh-client", "openssh-server"]
apt-utils = []

[packages.fedora]
"OpenSSL-Devel" = ["openssl-dev"]
"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get(AliasSource::Debian, "ssh").unwrap(),
            &["openssh-client".to_string(), "openssh-server".to_string()]
        );
        assert_eq!(table.get(AliasSource::Debian, "apt-utils").unwrap().len(), 0);
        assert!(table.get(AliasSource::Fedora, "openssl-devel").is_some());
    }

    #[test]
    fn test_lookup_order_for_auto() {
        let table = AliasTable::new()
            .with_alias(AliasSource::Fedora, "gcc", ["gcc-fedora"])
            .with_alias(AliasSource::Debian, "gcc", ["gcc-debian"]);

        let (source, targets) = table.lookup(SourceDistro::Auto, "gcc").unwrap();
        assert_eq!(source, AliasSource::Debian);
        assert_eq!(targets, &["gcc-debian".to_string()]);

        let (source, _) = table.lookup(SourceDistro::Dnf, "gcc").unwrap();
        assert_eq!(source, AliasSource::Fedora);
    }

    #[test]
    fn test_apt_skips_fedora_table() {
        let table = AliasTable::new().with_alias(AliasSource::Fedora, "openssl-devel", ["openssl-dev"]);
        assert!(table.lookup(SourceDistro::Apt, "openssl-devel").is_none());
        assert!(table.lookup(SourceDistro::Auto, "openssl-devel").is_some());
    }

    #[test]
    fn test_source_distro_parse() {
        assert_eq!("APT".parse::<SourceDistro>().unwrap(), SourceDistro::Apt);
        assert_eq!("dnf".parse::<SourceDistro>().unwrap(), SourceDistro::Dnf);
        let err = "pacman".parse::<SourceDistro>().unwrap_err();
        assert!(err.to_string().contains("pacman"));
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let table = AliasTable::bundled().unwrap();
        let targets = table.get(AliasSource::Debian, "ssh").unwrap();
        assert!(targets.contains(&"openssh-client".to_string()));
        assert!(targets.contains(&"openssh-server".to_string()));
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("aliases.toml");
        std::fs::write(&path, "packages = 3").unwrap();

        let err = AliasTable::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("aliases.toml"));
    }
}
