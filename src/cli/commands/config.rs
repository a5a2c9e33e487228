//! `octane-migrate config` command - inspect the effective configuration

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::CONFIG_KEYS;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values (secrets masked)
    Show(ShowArgs),

    /// Show the path of the configuration file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;

    if let Some(key) = &args.key {
        if !CONFIG_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                "Unknown configuration key '{}'. Run 'octane-migrate config keys' for the list",
                key
            ));
        }
        return match config.display_value(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in CONFIG_KEYS {
        match config.display_value(key) {
            Some(value) => println!("  {:<18} {}", style(key).cyan(), value),
            None => println!("  {:<18} {}", style(key).cyan(), style("(not set)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags");
    println!("  2. Environment variables (OCTANE_SERVER, OCTANE_CLIENT_ID, ...)");
    println!("  3. Config file ({})", config_path_display(global));

    Ok(())
}

fn config_path_display(global: &GlobalOpts) -> String {
    global
        .config
        .clone()
        .or_else(Config::global_config_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let path = global
        .config
        .clone()
        .or_else(Config::global_config_path)
        .ok_or_else(|| miette::miette!("Could not determine the configuration directory"))?;

    println!("{}", path.display());
    if path.exists() {
        eprintln!("{}", style("(exists)").green());
    } else {
        eprintln!("{}", style("(not created)").dim());
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in CONFIG_KEYS {
        println!("  {:<18} {}", style(key).cyan(), description);
    }
    Ok(())
}
