//! `porter image` command

use anyhow::Result;

use crate::cli::ImageArgs;
use crate::GlobalOptions;
use porter::ops::{lookup_image, ImageLookupOptions};
use porter::util::diagnostic::suggestions;
use porter::util::{GlobalContext, Status};

pub fn execute(args: ImageArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;

    let opts = ImageLookupOptions {
        reference: args.reference,
        catalog_path: args.catalog,
        min_score: args.min_score,
        limit: args.limit,
        org: args.org,
    };

    let report = lookup_image(&ctx, &opts)?;

    if shell.is_json() {
        shell.json_report("image-map", &report);
        return Ok(());
    }

    for warning in &report.result.warnings {
        shell.warn(warning);
    }

    if !report.result.is_match() {
        shell.status(Status::Unmatched, &report.name);
        shell.note(suggestions::NO_IMAGE_MATCH.trim_start_matches("help: "));
        return Ok(());
    }

    shell.status(Status::Mapped, &report.result);
    for reference in &report.references {
        shell.print(reference);
    }

    if shell.is_verbose() {
        for candidate in &report.candidates {
            shell.note(format!("{:.2}  {} (via {})", candidate.score, candidate.image, candidate.alias));
        }
    }

    Ok(())
}
