//! CLI module for rooda - argument parsing and terminal output.

pub mod args;
pub mod output;

pub use args::Cli;
