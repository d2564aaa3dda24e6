//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl producing a serializable result
//! - An `Outputable` impl rendering that result

mod gather;
mod sample_config;

pub use gather::{GatherCmd, GatherResult};
pub use sample_config::{SampleConfigCmd, SampleConfigResult};

use clap::Subcommand;
use std::error::Error;

use crate::config::PluginConfig;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, config: PluginConfig) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured query once and print the collected metrics
    Gather(GatherCmd),

    /// Print the plugin description and a sample configuration file
    SampleConfig(SampleConfigCmd),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, config: PluginConfig, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Gather(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
            Command::SampleConfig(cmd) => {
                let result = cmd.execute(config)?;
                Ok(result.format(format))
            }
        }
    }
}
