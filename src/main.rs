use anyhow::{bail, Context, Result};
use eve_universe_to_sqlite::{
    cli::{Cli, Commands, ImportArgs},
    download::ensure_sde_downloaded,
    schema::{get_table, table_names, ALL_TABLES},
    ui::ConsoleUi,
    writer::{convert_to_sqlite, ImportOptions, ImportSummary},
    Ui, UiApp,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

/// Where the export comes from
enum Source {
    Cache { dir: Option<PathBuf>, force: bool },
    Local(PathBuf),
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Sync {
            output_db,
            force,
            cache_dir,
            import,
        } => run_import(
            Source::Cache {
                dir: cache_dir,
                force,
            },
            output_db,
            &import,
        )?,

        Commands::Import {
            sde_dir,
            output_db,
            import,
        } => run_import(Source::Local(sde_dir), output_db, &import)?,

        Commands::Download { output, force } => {
            let mut ui = ConsoleUi::new();
            let (path, checksum) = ensure_sde_downloaded(output, force, &mut ui)?;
            println!("SDE {} extracted to {:?}", checksum, path);
        }

        Commands::ListTables { table: Some(name) } => {
            let Some(schema) = get_table(&name) else {
                bail!("Unknown table '{}' (expected one of: {})", name, table_names().join(", "));
            };
            println!("{}", schema.describe());
        }

        Commands::ListTables { table: None } => {
            println!("Available tables:\n");
            for schema in ALL_TABLES {
                let mut parents: Vec<_> = schema.dependencies().into_iter().collect();
                parents.sort();
                if parents.is_empty() {
                    println!("  {}", schema.name);
                } else {
                    println!("  {:<16} after {}", schema.name, parents.join(", "));
                }
            }
        }
    }

    Ok(())
}

fn run_import(source: Source, output_db: PathBuf, args: &ImportArgs) -> Result<()> {
    let start = Instant::now();
    let options = ImportOptions { fresh: args.fresh };

    let summary = if args.plain || !std::io::stdout().is_terminal() {
        let mut ui = ConsoleUi::new();
        let summary = import_universe(source, &output_db, &options, &mut ui)?;
        ui.log(summary_line(&summary, start));
        summary
    } else {
        let mut ui = UiApp::new()?;
        match import_universe(source, &output_db, &options, &mut ui) {
            Ok(summary) => {
                ui.finish(&summary_line(&summary, start))?;
                summary
            }
            Err(e) => {
                ui.restore()?;
                return Err(e);
            }
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{}", json);
    }

    Ok(())
}

fn import_universe(
    source: Source,
    output_db: &std::path::Path,
    options: &ImportOptions,
    ui: &mut impl Ui,
) -> Result<ImportSummary> {
    let sde_dir = match source {
        Source::Cache { dir, force } => ensure_sde_downloaded(dir, force, ui)?.0,
        Source::Local(dir) => dir,
    };

    convert_to_sqlite(&sde_dir, output_db, options, ui)
}

fn summary_line(summary: &ImportSummary, start: Instant) -> String {
    format!(
        "Wrote {} rows to {:?} in {:.1}s ({} rejected nodes, {} unlinked stargates, {} orphan stations)",
        summary.load.total_written(),
        summary.output_db,
        start.elapsed().as_secs_f64(),
        summary.rejected.len(),
        summary.unresolved_stargates,
        summary.orphan_stations
    )
}
