pub mod commands;

pub use commands::{Cli, Commands, ReadArgs, run};
