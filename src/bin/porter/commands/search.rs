//! `porter search` command

use anyhow::Result;

use crate::cli::SearchArgs;
use crate::GlobalOptions;
use porter::ops::{search_index, SearchOptions};
use porter::util::{GlobalContext, Status};

pub fn execute(args: SearchArgs, global_opts: &GlobalOptions) -> Result<()> {
    let shell = &global_opts.shell;
    let ctx = GlobalContext::new()?;

    let report = search_index(
        &ctx,
        &SearchOptions {
            query: args.query,
            index_path: args.index,
            limit: args.limit,
        },
    )?;

    if shell.is_json() {
        shell.json_report("search", &report);
        return Ok(());
    }

    if report.matches.is_empty() {
        shell.status(
            Status::Unmatched,
            format!("no packages matching '{}'", report.query),
        );
        if !report.suggestions.is_empty() {
            let names: Vec<&str> = report.suggestions.iter().map(|s| s.name.as_str()).collect();
            shell.note(format!("did you mean: {}", names.join(", ")));
        }
        return Ok(());
    }

    shell.status(
        Status::Found,
        format!(
            "{} package{} matching '{}'",
            report.matches.len(),
            if report.matches.len() == 1 { "" } else { "s" },
            report.query
        ),
    );
    for name in &report.matches {
        shell.print(name);
    }

    Ok(())
}
