pub mod cli;
pub mod download;
pub mod parser;
pub mod schema;
pub mod transform;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use transform::{build_universe, SdeLayout, UniverseBatch};
pub use ui::{ConsoleUi, Phase, SilentUi, Ui, UiApp};
pub use writer::{convert_to_sqlite, ImportOptions, ImportSummary, SqliteWriter};
