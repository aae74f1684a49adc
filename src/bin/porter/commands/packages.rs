//! `porter packages` command

use anyhow::Result;

use crate::cli::PackagesArgs;
use crate::GlobalOptions;
use porter::core::MatchKind;
use porter::ops::{map_package_names, PackageMapOptions};
use porter::util::diagnostic::suggestions;
use porter::util::{GlobalContext, Status};

pub fn execute(args: PackagesArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;

    let opts = PackageMapOptions {
        names: args.names,
        source: args.from,
        index_path: args.index,
        aliases_path: args.aliases,
        min_score: args.min_score,
    };

    let report = map_package_names(&ctx, &opts)?;

    if shell.is_json() {
        shell.json_report("package-map", &report);
        return Ok(());
    }

    let mut unmatched = 0;
    for result in &report.results {
        match result.kind {
            MatchKind::None => {
                unmatched += 1;
                shell.status(Status::Unmatched, &result.query);
            }
            MatchKind::Alias if result.values().next().is_none() => {
                shell.status(Status::Dropped, &result.query);
            }
            _ => shell.status(Status::Mapped, result),
        }

        for warning in &result.warnings {
            shell.warn(warning);
        }
    }

    for error in &report.errors {
        shell.error(error);
    }

    if unmatched > 0 {
        shell.note(suggestions::NO_MATCH.trim_start_matches("help: "));
    }

    if let Some(command) = &report.install_command {
        shell.print(command);
    }

    Ok(())
}
