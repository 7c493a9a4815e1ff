use anyhow::{Context, Result};

use crate::cli::args::{ConfigCliArgs, ConfigCommand};
use crate::config::Config;
use crate::global;

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut config = Config::load()?;
            // Never echo the credential itself.
            if config.openai.api_key.is_some() {
                config.openai.api_key = Some("<set>".to_string());
            }
            let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
            println!("# {}", global::config_file()?.display());
            print!("{rendered}");
        }
    }
    Ok(())
}
