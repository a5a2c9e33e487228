//! CLI module - argument parsing, logging setup and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;

use log::LevelFilter;

pub use args::{Cli, Commands, GlobalOpts};

/// Start the logger: `info` by default, `-v` for debug, `-q` for warnings only.
/// `RUST_LOG` takes precedence when set.
pub fn init_logging(global: &GlobalOpts) {
    let level = if global.verbose {
        LevelFilter::Debug
    } else if global.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}
