//! `porter tag` command

use anyhow::Result;

use crate::cli::TagArgs;
use crate::GlobalOptions;
use porter::matcher::{PreferredVariant, TagOptions};
use porter::ops::{lookup_tag, TagLookupOptions};
use porter::util::diagnostic::{self, suggestions, Diagnostic};
use porter::util::{GlobalContext, Status};

pub fn execute(args: TagArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;

    let opts = TagLookupOptions {
        reference: args.reference,
        image: args.image,
        tags_path: args.tags,
        tag_options: TagOptions {
            require_dev: args.dev,
            preferred_variant: args.variant.unwrap_or(PreferredVariant::None),
            jdk_hint: args.jdk,
        },
        rank: args.rank,
        limit: args.limit,
        min_score: args.min_score,
        org: args.org,
    };

    let report = lookup_tag(&ctx, &opts)?;

    if shell.is_json() {
        shell.json_report("tag-match", &report);
        return Ok(());
    }

    match &report.result.matched_value {
        Some(tag) if report.result.is_match() => {
            for warning in &report.result.warnings {
                shell.warn(warning);
            }
            shell.status(Status::Matched, &report.result);
            shell.print(report.reference.as_deref().unwrap_or(tag));
        }
        _ if shell.is_quiet() => {}
        _ => {
            let diag = report.result.warnings.iter().fold(
                Diagnostic::warning(format!("no tag close to '{}'", report.result.query))
                    .with_location(ctx.resolve_path(&opts.tags_path)),
                |diag, warning| diag.with_context(warning),
            );
            diagnostic::emit(&diag.with_suggestion(suggestions::NO_TAG_MATCH), shell.use_color());
        }
    }

    if shell.is_verbose() {
        let variants = &report.variants;
        for (name, tag) in [
            ("distroless", &variants.distroless),
            ("slim", &variants.slim),
            ("dev", &variants.dev),
        ] {
            if let Some(tag) = tag {
                shell.note(format!("{} variant: {}", name, tag));
            }
        }
    }

    for scored in &report.ranked {
        shell.print(format!("{:>6.2}  {}", scored.score, scored.tag));
    }

    Ok(())
}
