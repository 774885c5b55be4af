//! Core engine services: configuration persistence and command-line handling

pub mod cli;
pub mod config;

pub use cli::CommandLineArgs;
pub use config::Config;
