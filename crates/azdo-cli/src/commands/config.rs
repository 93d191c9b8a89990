//! `azdo-tools config`: inspect and edit the config file.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use azdo_core::Config;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (file plus environment overrides)
    Show,

    /// Set a value, e.g. `azure_devops.organization contoso`
    Set {
        /// Key in `section.field` form
        key: String,
        /// New value
        value: String,
    },

    /// Print a single value
    Get {
        /// Key in `section.field` form
        key: String,
    },

    /// Print the config file location
    Path,
}

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    let path = Config::config_path()?;
    let mut stdout = std::io::stdout().lock();
    execute(command, &path, |name| std::env::var(name).ok(), &mut stdout)
}

/// Run a config subcommand against the file at `path`.
fn execute<F>(
    command: ConfigCommands,
    path: &Path,
    env: F,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match command {
        ConfigCommands::Show => {
            let mut config = Config::load_from(path)?;
            config.apply_env_overrides(env);
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            writeln!(out, "# {}", path.display())?;
            write!(out, "{}", rendered)?;
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(path)?;
            config.set(&key, &value)?;
            config.save_to(path)?;
            writeln!(out, "{} = {}", key, value)?;
        }
        ConfigCommands::Get { key } => {
            let config = Config::load_from(path)?;
            match config.get(&key)? {
                Some(value) => writeln!(out, "{}", value)?,
                None => writeln!(out, "{} is not set", key)?,
            }
        }
        ConfigCommands::Path => writeln!(out, "{}", path.display())?,
    }
    Ok(())
}
