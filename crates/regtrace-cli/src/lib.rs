mod args;
mod commands;
mod handlers;
mod output;

pub use args::{Cli, Commands, RunFormat};
pub use commands::run;
