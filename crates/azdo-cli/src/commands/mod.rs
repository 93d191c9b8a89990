//! Subcommand implementations.

pub mod config;
pub mod serve;
pub mod token;
pub mod tools;

pub use config::ConfigCommands;
pub use token::TokenCommands;
