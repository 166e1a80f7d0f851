// Frameworks layer: configuration, runtime bootstrap, and the CLI.

pub mod cli;
pub mod config;
pub mod runtime;
