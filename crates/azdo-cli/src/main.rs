//! azdo-tools CLI - Azure DevOps tools for AI assistants.
//!
//! Without a subcommand the binary runs the MCP server on stdio.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConfigCommands, TokenCommands};

#[derive(Parser)]
#[command(name = "azdo-tools")]
#[command(author, version, about = "Azure DevOps tools for AI assistants (MCP server)", long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdin/stdout (default)
    Serve,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage the stored personal access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// List available tools as JSON
    Tools {
        /// Only tools of this category (e.g. build, pull-request)
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    // stdout carries the MCP transport, so logs go to stderr
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run().await,
        Commands::Config { command } => commands::config::run(command),
        Commands::Token { command } => commands::token::run(command),
        Commands::Tools { category } => commands::tools::run(category.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["azdo-tools"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "azdo-tools",
            "config",
            "set",
            "azure_devops.organization",
            "contoso",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Set { key, value },
            }) => {
                assert_eq!(key, "azure_devops.organization");
                assert_eq!(value, "contoso");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_parse_tools_category_with_global_verbose() {
        let cli = Cli::try_parse_from(["azdo-tools", "tools", "--category", "build", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Tools { category }) => assert_eq!(category.as_deref(), Some("build")),
            _ => panic!("expected tools"),
        }
    }

    #[test]
    fn test_parse_token_status() {
        let cli = Cli::try_parse_from(["azdo-tools", "token", "status"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Token {
                command: TokenCommands::Status
            })
        ));
    }
}
