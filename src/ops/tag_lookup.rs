//! Implementation of `porter tag`.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::image::{base_name, normalize_image_name, ImageCatalog};
use crate::core::matching::Match;
use crate::matcher::{representative_tags, PreferredVariant, ScoredTag, TagMatcher, TagOptions, VariantTags};
use crate::ops::inputs::{load_image_catalog, load_tag_index};
use crate::util::GlobalContext;

/// An image reference split into repository and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Repository, registry included (`docker.io/library/python`)
    pub image: Option<String>,
    pub tag: String,
}

impl ImageRef {
    /// Split `repo:tag`. Input without a `:` after the last `/` is a bare
    /// tag; a repository without a tag means `latest`. Digests are dropped.
    pub fn parse(reference: &str) -> ImageRef {
        let reference = reference.trim();
        let reference = reference.split('@').next().unwrap_or(reference);
        let name_start = reference.rfind('/').map_or(0, |i| i + 1);

        match reference[name_start..].rfind(':') {
            Some(colon) => {
                let split = name_start + colon;
                ImageRef {
                    image: Some(reference[..split].to_string()).filter(|s| !s.is_empty()),
                    tag: reference[split + 1..].to_string(),
                }
            }
            None if name_start > 0 => ImageRef {
                image: Some(reference.to_string()),
                tag: "latest".to_string(),
            },
            None => ImageRef {
                image: None,
                tag: reference.to_string(),
            },
        }
    }
}

/// Options for looking up a tag.
#[derive(Debug, Clone)]
pub struct TagLookupOptions {
    /// Original tag or `image:tag` reference
    pub reference: String,

    /// Image when `reference` is a bare tag
    pub image: Option<String>,

    /// Tag list to match against
    pub tags_path: PathBuf,

    /// Matching constraints from the command line
    pub tag_options: TagOptions,

    /// Also list the ranked candidates
    pub rank: bool,

    /// Length of the ranked list
    pub limit: Option<usize>,

    /// Minimum score override
    pub min_score: Option<f64>,

    /// Organization override for the rendered reference
    pub org: Option<String>,
}

/// Result of `porter tag`.
#[derive(Debug, Clone, Serialize)]
pub struct TagLookupReport {
    /// Curated image the source repository maps to
    pub image: Option<String>,
    #[serde(flatten)]
    pub result: Match,
    /// Full reference of the matched image (`cgr.dev/<org>/<image>:<tag>`)
    pub reference: Option<String>,
    pub variants: VariantTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranked: Vec<ScoredTag>,
}

/// Render `host/org/image`.
pub fn repository_reference(host: &str, org: &str, image: &str) -> String {
    format!("{}/{}/{}", host.trim_end_matches('/'), org.trim_matches('/'), image)
}

/// Render `host/org/image:tag`.
pub fn image_reference(host: &str, org: &str, image: &str, tag: &str) -> String {
    format!("{}:{}", repository_reference(host, org, image), tag)
}

/// Curated name for a source repository: a catalog hit on the full or base
/// name, else the base name itself.
fn curated_image(catalog: &ImageCatalog, repository: &str) -> String {
    let name = normalize_image_name(repository);
    let base = base_name(&name);

    catalog
        .get(&name)
        .or_else(|| catalog.get(base))
        .and_then(|targets| targets.first())
        .cloned()
        .unwrap_or_else(|| base.to_string())
}

/// Command-line constraints win; config fills in what was left unset.
fn effective_options(ctx: &GlobalContext, cli: &TagOptions) -> TagOptions {
    let config = ctx.config();
    TagOptions {
        require_dev: cli.require_dev || config.tags.require_dev.unwrap_or(false),
        preferred_variant: match cli.preferred_variant {
            PreferredVariant::None => config.preferred_variant().unwrap_or_default(),
            explicit => explicit,
        },
        jdk_hint: cli.jdk_hint,
    }
}

/// Match one tag against a tag list.
pub fn lookup_tag(ctx: &GlobalContext, opts: &TagLookupOptions) -> Result<TagLookupReport> {
    let parsed = ImageRef::parse(&opts.reference);
    let image = match opts.image.clone().or(parsed.image) {
        Some(repository) => {
            let catalog = load_image_catalog(ctx, None)?;
            Some(curated_image(&catalog, &repository)).filter(|name| !name.is_empty())
        }
        None => None,
    };

    let index = load_tag_index(&ctx.resolve_path(&opts.tags_path))?;
    let options = effective_options(ctx, &opts.tag_options);
    let matcher = TagMatcher::new()
        .with_min_score(opts.min_score.unwrap_or_else(|| ctx.config().tag_min_score()));

    tracing::debug!("matching tag '{}' with {:?}", parsed.tag, options);
    let result = matcher.match_tag(&parsed.tag, &index, &options)?;

    let ranked = if opts.rank {
        let limit = opts.limit.unwrap_or_else(|| ctx.config().tag_rank_limit());
        matcher.rank(&parsed.tag, &index, &options, limit)?
    } else {
        Vec::new()
    };

    let base = result.matched_value.as_deref().unwrap_or(&parsed.tag);
    let variants = representative_tags(&index, base);

    let reference = match (&image, &result.matched_value) {
        (Some(image), Some(tag)) => {
            let org = opts.org.as_deref().unwrap_or(ctx.config().registry_org());
            Some(image_reference(ctx.config().registry_host(), org, image, tag))
        }
        _ => None,
    };

    Ok(TagLookupReport {
        image,
        result,
        reference,
        variants,
        ranked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matching::MatchKind;
    use crate::test_support::{create_test_project, ProjectFixture};
    use tempfile::TempDir;

    fn options(reference: &str) -> TagLookupOptions {
        TagLookupOptions {
            reference: reference.to_string(),
            image: None,
            tags_path: PathBuf::from("tags.txt"),
            tag_options: TagOptions::default(),
            rank: false,
            limit: None,
            min_score: None,
            org: None,
        }
    }

    fn context(project: &TempDir) -> (GlobalContext, TempDir) {
        let home = TempDir::new().unwrap();
        let ctx = GlobalContext::with_paths(project.path().to_path_buf(), home.path().to_path_buf());
        (ctx, home)
    }

    #[test]
    fn test_image_ref_parse() {
        assert_eq!(
            ImageRef::parse("python:3.12-slim"),
            ImageRef { image: Some("python".into()), tag: "3.12-slim".into() }
        );
        assert_eq!(
            ImageRef::parse("docker.io/library/maven:3.8-eclipse-temurin-17"),
            ImageRef {
                image: Some("docker.io/library/maven".into()),
                tag: "3.8-eclipse-temurin-17".into()
            }
        );
        assert_eq!(
            ImageRef::parse("localhost:5000/app"),
            ImageRef { image: Some("localhost:5000/app".into()), tag: "latest".into() }
        );
        assert_eq!(ImageRef::parse("3.12").image, None);
        assert_eq!(ImageRef::parse("node:20@sha256:abcd").tag, "20");
    }

    #[test]
    fn test_curated_image() {
        let catalog = ImageCatalog::new()
            .with_alias("openjdk", ["jdk", "jre"])
            .with_alias("python", ["python"]);

        assert_eq!(curated_image(&catalog, "docker.io/library/openjdk"), "jdk");
        assert_eq!(curated_image(&catalog, "bitnami/python"), "python");
        assert_eq!(curated_image(&catalog, "localhost:5000/team/app"), "app");
    }

    #[test]
    fn test_image_reference() {
        assert_eq!(
            image_reference("cgr.dev", "chainguard", "python", "3.12-dev"),
            "cgr.dev/chainguard/python:3.12-dev"
        );
    }

    #[test]
    fn test_lookup_renders_reference() {
        let project = create_test_project(&ProjectFixture::standard());
        let (ctx, _home) = context(&project);

        let mut opts = options("python:3.12");
        opts.tag_options.require_dev = true;
        let report = lookup_tag(&ctx, &opts).unwrap();

        assert_eq!(report.result.matched_value.as_deref(), Some("3.12-dev"));
        assert_eq!(
            report.reference.as_deref(),
            Some("cgr.dev/chainguard/python:3.12-dev")
        );
        assert_eq!(report.variants.distroless.as_deref(), Some("3.12"));
        assert_eq!(report.variants.dev.as_deref(), Some("3.12-dev"));
        assert!(report.ranked.is_empty());
    }

    #[test]
    fn test_config_supplies_variant_and_org() {
        let project = create_test_project(&ProjectFixture::standard().with_config(
            "[tags]\nvariant = \"dev\"\n\n[registry]\norg = \"acme.example\"\n",
        ));
        let (ctx, _home) = context(&project);

        let mut opts = options("3.11");
        opts.image = Some("python".to_string());
        let report = lookup_tag(&ctx, &opts).unwrap();

        assert_eq!(report.result.matched_value.as_deref(), Some("3.11-dev"));
        assert_eq!(
            report.reference.as_deref(),
            Some("cgr.dev/acme.example/python:3.11-dev")
        );
    }

    #[test]
    fn test_rank_list() {
        let project = create_test_project(&ProjectFixture::standard());
        let (ctx, _home) = context(&project);

        let mut opts = options("3.12");
        opts.rank = true;
        opts.limit = Some(4);
        let report = lookup_tag(&ctx, &opts).unwrap();

        assert_eq!(report.result.kind, MatchKind::Exact);
        assert_eq!(report.ranked.len(), 4);
        assert_eq!(report.ranked[0].tag, "3.12");
    }

    #[test]
    fn test_source_image_maps_through_catalog() {
        let project = create_test_project(&ProjectFixture::standard());
        let (ctx, _home) = context(&project);

        let report = lookup_tag(&ctx, &options("docker.io/library/eclipse-temurin:3.12")).unwrap();
        assert_eq!(report.image.as_deref(), Some("jdk"));
        assert_eq!(report.reference.as_deref(), Some("cgr.dev/chainguard/jdk:3.12"));
    }

    #[test]
    fn test_no_match_has_no_reference() {
        let project = create_test_project(&ProjectFixture::standard());
        let (ctx, _home) = context(&project);

        let report = lookup_tag(&ctx, &options("python:9.1")).unwrap();
        assert_eq!(report.result.kind, MatchKind::None);
        assert!(report.reference.is_none());
    }

    #[test]
    fn test_blank_tag_is_an_error() {
        let project = create_test_project(&ProjectFixture::standard());
        let (ctx, _home) = context(&project);

        let err = lookup_tag(&ctx, &options("  ")).unwrap_err();
        assert!(err.downcast_ref::<crate::matcher::MatchError>().is_some());
    }
}
