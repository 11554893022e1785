use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eve-universe-to-sqlite")]
#[command(version, about = "Import the EVE Online universe from the YAML SDE into SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that writes a database
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Delete the database first instead of upserting into it
    #[arg(long)]
    pub fresh: bool,

    /// Plain line output instead of the full-screen UI
    #[arg(long)]
    pub plain: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download (if needed) and import into SQLite
    Sync {
        /// Output SQLite database path
        #[arg(env = "EVE_UNIVERSE_DB")]
        output_db: PathBuf,

        /// Force re-download even if cached
        #[arg(short, long)]
        force: bool,

        /// Custom cache directory
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Download and extract the latest YAML SDE
    Download {
        /// Cache directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force re-download even if cached
        #[arg(short, long)]
        force: bool,
    },

    /// Import an extracted YAML SDE directory into SQLite
    Import {
        /// SDE root directory (containing universe/ and bsd/)
        #[arg(env = "EVE_SDE_DIR")]
        sde_dir: PathBuf,

        /// Output SQLite database path
        #[arg(env = "EVE_UNIVERSE_DB")]
        output_db: PathBuf,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// List all tables in load order, or the columns of one table
    ListTables {
        /// Table to describe
        table: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "eve-universe-to-sqlite",
            "import",
            "./sde",
            "universe.db",
            "--fresh",
            "--plain",
        ])
        .unwrap();

        match cli.command {
            Commands::Import {
                sde_dir,
                output_db,
                import,
            } => {
                assert_eq!(sde_dir, PathBuf::from("./sde"));
                assert_eq!(output_db, PathBuf::from("universe.db"));
                assert!(import.fresh && import.plain && !import.json);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_tables() {
        let cli = Cli::try_parse_from(["eve-universe-to-sqlite", "list-tables", "systems"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::ListTables { table: Some(ref t) } if t == "systems"
        ));

        let cli = Cli::try_parse_from(["eve-universe-to-sqlite", "list-tables"]).unwrap();
        assert!(matches!(cli.command, Commands::ListTables { table: None }));
    }
}
