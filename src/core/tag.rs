//! Image tag parsing - WHAT a tag says about version and flavor.
//!
//! A tag such as `3.8-jdk17-dev` is split into a numeric version
//! (`3.8`), suffix tokens (`jdk17`, `dev`), a build variant and an
//! optional JDK version. Parsing is lenient: a tag without any digits
//! is still a valid tag made only of tokens (`latest`, `alpine`).

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// JDK patterns, most specific first. The first hit wins.
static JDK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:eclipse-)?temurin-?(\d+)",
        r"(?:amazon-)?corretto-?(\d+)",
        r"openjdk-?(\d+)",
        r"jdk-?(\d+)",
        r"jre-?(\d+)",
        r"java-?(\d+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Build flavor of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Minimal runtime, no shell or package manager.
    Distroless,
    /// Runtime with a shell but no package manager.
    Slim,
    /// Shell and package manager included.
    Dev,
}

impl Variant {
    /// Tag suffix token naming this variant, if it has one.
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Variant::Distroless => None,
            Variant::Slim => Some("slim"),
            Variant::Dev => Some("dev"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Distroless => "distroless",
            Variant::Slim => "slim",
            Variant::Dev => "dev",
        }
    }

    fn from_token(token: &str) -> Option<Variant> {
        match token {
            "dev" => Some(Variant::Dev),
            "slim" => Some(Variant::Slim),
            "distroless" => Some(Variant::Distroless),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric version carried by a tag.
///
/// Only the first three components take part in matching; a fourth
/// component (`1.2.3.4`) is parsed and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagVersion {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

impl TagVersion {
    /// Parse a dotted numeric string like `3`, `3.12` or `17.0.13`.
    pub fn parse(s: &str) -> Option<TagVersion> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(p) => Some(p.parse().ok()?),
            None => None,
        };
        let patch = match parts.next() {
            Some(p) => Some(p.parse().ok()?),
            None => None,
        };
        for rest in parts {
            rest.parse::<u64>().ok()?;
        }

        Some(TagVersion {
            major,
            minor,
            patch,
        })
    }

}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
        }
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        Ok(())
    }
}

/// A parsed image tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    raw: String,
    version: Option<TagVersion>,
    tokens: BTreeSet<String>,
    explicit_variant: Option<Variant>,
    jdk_version: Option<u32>,
}

impl Tag {
    /// Parse a tag string. Never fails; see [`Tag::is_empty`].
    ///
    /// A number that only completes a JDK token (`temurin-17`) is not the
    /// tag's version.
    pub fn parse(raw: &str) -> Tag {
        let lowered = raw.trim().to_lowercase().replace('_', "-");
        let jdk = find_jdk(&lowered);
        let mut version = None;
        let mut tokens = BTreeSet::new();
        let mut offset = 0;

        for part in lowered.split('-') {
            let start = offset;
            offset += part.len() + 1;
            if part.is_empty() {
                continue;
            }

            let inside_jdk = jdk
                .as_ref()
                .is_some_and(|(_, span)| span.start <= start && start + part.len() <= span.end);

            if version.is_none() && !inside_jdk && part.starts_with(|c: char| c.is_ascii_digit()) {
                let numeric_end = part
                    .find(|c: char| !c.is_ascii_digit() && c != '.')
                    .unwrap_or(part.len());
                let numeric = part[..numeric_end].trim_end_matches('.');
                if let Some(parsed) = TagVersion::parse(numeric) {
                    version = Some(parsed);
                    let rest = &part[numeric_end..];
                    if rest.chars().any(|c| c.is_alphabetic()) {
                        tokens.insert(rest.to_string());
                    }
                    continue;
                }
            }

            if part.chars().any(|c| c.is_alphabetic()) {
                tokens.insert(part.to_string());
            }
        }

        let explicit_variant = [Variant::Dev, Variant::Slim, Variant::Distroless]
            .into_iter()
            .find(|v| tokens.contains(v.as_str()));

        Tag {
            raw: raw.to_string(),
            version,
            tokens,
            explicit_variant,
            jdk_version: jdk.map(|(version, _)| version),
        }
    }

    /// The tag exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> Option<&TagVersion> {
        self.version.as_ref()
    }

    /// All suffix tokens, variant words included.
    pub fn tokens(&self) -> &BTreeSet<String> {
        &self.tokens
    }

    /// Suffix tokens that do not name a variant.
    pub fn descriptive_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|t| Variant::from_token(t).is_none())
    }

    /// True when parsing found neither a version nor any token.
    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.tokens.is_empty()
    }

    /// Variant named by the tag itself, if any.
    pub fn explicit_variant(&self) -> Option<Variant> {
        self.explicit_variant
    }

    /// Variant of the tag; untagged means distroless.
    pub fn variant(&self) -> Variant {
        match self.explicit_variant {
            Some(Variant::Dev) => Variant::Dev,
            Some(Variant::Slim) => Variant::Slim,
            _ => Variant::Distroless,
        }
    }

    pub fn is_dev(&self) -> bool {
        self.variant() == Variant::Dev
    }

    pub fn is_slim(&self) -> bool {
        self.variant() == Variant::Slim
    }

    pub fn is_distroless(&self) -> bool {
        self.variant() == Variant::Distroless
    }

    pub fn jdk_version(&self) -> Option<u32> {
        self.jdk_version
    }

    /// The tag with its `-dev`/`-slim` suffix removed, lower-cased.
    pub fn base(&self) -> String {
        let lowered = self.raw.trim().to_lowercase();
        for suffix in ["-dev", "-slim"] {
            if let Some(stripped) = lowered.strip_suffix(suffix) {
                return stripped.to_string();
            }
        }
        lowered
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extract a JDK/Java major version from a lower-cased tag.
pub fn extract_jdk_version(tag: &str) -> Option<u32> {
    find_jdk(tag).map(|(version, _)| version)
}

/// JDK version plus the byte span of the whole JDK token.
fn find_jdk(tag: &str) -> Option<(u32, Range<usize>)> {
    JDK_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(tag)?;
        let version = caps.get(1)?.as_str().parse().ok()?;
        Some((version, caps.get(0)?.range()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_version() {
        let tag = Tag::parse("3.12");
        let v = tag.version().unwrap();
        assert_eq!(v.major, 3);
        assert_eq!(v.minor, Some(12));
        assert_eq!(v.patch, None);
        assert!(tag.tokens().is_empty());
        assert!(tag.is_distroless());
    }

    #[test]
    fn test_parse_variant_suffix() {
        let tag = Tag::parse("3.12-dev");
        assert!(tag.is_dev());
        assert_eq!(tag.explicit_variant(), Some(Variant::Dev));
        assert_eq!(tag.descriptive_tokens().count(), 0);

        let slim = Tag::parse("18-slim");
        assert!(slim.is_slim());
        assert_eq!(slim.base(), "18");
    }

    #[test]
    fn test_parse_prefixed_version() {
        let tag = Tag::parse("adoptium-openjdk-17.0.13-dev");
        let v = tag.version().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (17, Some(0), Some(13)));
        assert!(tag.tokens().contains("adoptium"));
        assert!(tag.is_dev());
        assert_eq!(tag.jdk_version(), Some(17));
    }

    #[test]
    fn test_jdk_patterns() {
        assert_eq!(Tag::parse("3.8-eclipse-temurin-17").jdk_version(), Some(17));
        assert_eq!(Tag::parse("3.8-jdk11-dev").jdk_version(), Some(11));
        assert_eq!(Tag::parse("8-amazon-corretto-21").jdk_version(), Some(21));
        assert_eq!(Tag::parse("openjdk17").jdk_version(), Some(17));
        assert_eq!(Tag::parse("7.6_java-17").jdk_version(), Some(17));
        assert_eq!(Tag::parse("3.12-slim").jdk_version(), None);
    }

    #[test]
    fn test_token_only_tags() {
        let latest = Tag::parse("latest");
        assert!(latest.version().is_none());
        assert!(latest.tokens().contains("latest"));
        assert!(!latest.is_empty());

        assert!(Tag::parse("   ").is_empty());
        assert!(Tag::parse("").is_empty());
    }

    #[test]
    fn test_glued_suffix_becomes_token() {
        let tag = Tag::parse("3.13rc1-alpine");
        assert_eq!(tag.version().unwrap().to_string(), "3.13");
        assert!(tag.tokens().contains("rc1"));
        assert!(tag.tokens().contains("alpine"));
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(TagVersion::parse("18").unwrap().minor, None);
        assert_eq!(TagVersion::parse("1.2.3.4").unwrap().to_string(), "1.2.3");
        assert!(TagVersion::parse("1.x").is_none());
    }

    #[test]
    fn test_jdk_number_is_not_the_version() {
        let tag = Tag::parse("eclipse-temurin-17");
        assert!(tag.version().is_none());
        assert_eq!(tag.jdk_version(), Some(17));
        assert!(tag.tokens().contains("temurin"));

        let tag = Tag::parse("3.8-eclipse-temurin-17");
        assert_eq!(tag.version().unwrap().to_string(), "3.8");
        assert_eq!(tag.jdk_version(), Some(17));

        let tag = Tag::parse("17-jdk");
        assert_eq!(tag.version().unwrap().major, 17);
    }
}
