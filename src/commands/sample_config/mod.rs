//! Print the plugin description and a sample configuration file.

use std::error::Error;

use clap::Args;
use serde::Serialize;

use crate::commands::Execute;
use crate::config::{PluginConfig, SAMPLE_CONFIG};
use crate::output::Outputable;
use crate::plugin::DESCRIPTION;

/// Print the plugin description and a sample configuration file
#[derive(Args, Debug, Default)]
#[command(after_help = "\
Examples:
  sql_query_input sample-config > .sql_query.json   # Start a configuration file")]
pub struct SampleConfigCmd {}

#[derive(Debug, Serialize)]
pub struct SampleConfigResult {
    pub description: String,
    pub config: PluginConfig,
}

impl Execute for SampleConfigCmd {
    type Output = SampleConfigResult;

    fn execute(self, _config: PluginConfig) -> Result<Self::Output, Box<dyn Error>> {
        Ok(SampleConfigResult {
            description: DESCRIPTION.to_string(),
            config: serde_json::from_str(SAMPLE_CONFIG)?,
        })
    }
}

impl Outputable for SampleConfigResult {
    fn to_table(&self) -> String {
        SAMPLE_CONFIG.to_string()
    }
}
