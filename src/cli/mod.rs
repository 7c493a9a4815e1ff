pub mod args;
mod config_cmd;
mod generate;

pub use args::{Cli, CliCommand};
pub use config_cmd::handle_config_command;
pub use generate::handle_generate_command;
