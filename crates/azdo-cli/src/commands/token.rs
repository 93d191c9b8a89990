//! `azdo-tools token`: manage the PAT in the OS keychain.

use std::io::Write;

use azdo_storage::{resolve_token, CredentialStore, KeychainStore, PAT_KEY};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Store a personal access token in the keychain
    Set {
        /// The token value
        value: String,
    },

    /// Remove the stored token
    Delete,

    /// Report whether a token is available and where it comes from
    Status,
}

pub fn run(command: TokenCommands) -> anyhow::Result<()> {
    let store = KeychainStore::new();
    let mut stdout = std::io::stdout().lock();
    execute(command, &store, |name| std::env::var(name).ok(), &mut stdout)
}

fn execute<F>(
    command: TokenCommands,
    store: &dyn CredentialStore,
    env: F,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    match command {
        TokenCommands::Set { value } => {
            let value = value.trim();
            if value.is_empty() {
                anyhow::bail!("Token must not be empty");
            }
            store.store(PAT_KEY, value)?;
            writeln!(out, "Token stored in keychain ({})", PAT_KEY)?;
        }
        TokenCommands::Delete => {
            store.delete(PAT_KEY)?;
            writeln!(out, "Token removed from keychain")?;
        }
        TokenCommands::Status => match resolve_token(store, env) {
            Ok(token) => writeln!(out, "Token found: {}", token.source)?,
            Err(e) => writeln!(out, "{}", e)?,
        },
    }
    Ok(())
}
