//! The `tabula` command-line front end.
//!
//! ```text
//! tabula view   --data users.json -c users.yaml --search ann --filter role=admin
//! tabula export --api /users --url "?role=admin" --format xlsx -o out/
//! tabula gate   --user me.json --permission users.read
//! ```

pub mod cli;
pub mod commands;
pub mod render;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub use cli::Cli;
pub use commands::{build_table, fetch_rows, read_rows, run};
pub use render::{render_page, truncate_to_width};

/// Installs the stderr logger; `verbose` counts `-v` flags.
pub fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}
