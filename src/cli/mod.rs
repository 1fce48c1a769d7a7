//! CLI argument parsing.

mod args;
pub mod validators;

pub use args::{AccuracyArgs, Cli, Command, ConfigAction, ProcessArgs};
