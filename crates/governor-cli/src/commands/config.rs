//! Configuration commands

use crate::args::ConfigAction;
use crate::console::CliConsole;
use anyhow::Result;
use governor_core::GovernorConfig;

pub fn execute(config: &GovernorConfig, action: ConfigAction, console: &CliConsole) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigAction::Validate => {
            config.validate()?;
            console.success("Configuration is valid");
            Ok(())
        }
    }
}
