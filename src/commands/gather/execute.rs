use std::error::Error;

use serde::Serialize;
use tracing::info;

use super::GatherCmd;
use crate::accumulator::MetricBuffer;
use crate::commands::Execute;
use crate::config::PluginConfig;
use crate::db::{Connector, MySqlConnector};
use crate::metric::Metric;
use crate::plugin::QueryPlugin;

/// Result of one collection cycle
#[derive(Debug, Default, Serialize)]
pub struct GatherResult {
    pub measurement: String,
    pub database: String,
    pub database_exists: bool,
    pub metrics: Vec<Metric>,
}

impl GatherCmd {
    /// Layer the command-line flags over `config`.
    pub fn apply(self, mut config: PluginConfig) -> PluginConfig {
        if let Some(server) = self.server {
            config.server = server;
        }
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(measurement) = self.measurement {
            config.measurement = measurement;
        }
        if let Some(query) = self.query {
            config.query = query;
        }
        if !self.tags.is_empty() {
            config.tags = self.tags;
        }
        config
    }

    pub(crate) fn run_with<C: Connector>(
        self,
        config: PluginConfig,
        connector: C,
    ) -> Result<GatherResult, Box<dyn Error>> {
        let config = self.apply(config);
        config.validate()?;

        let mut plugin = QueryPlugin::with_connector(config, connector);
        let mut buffer = MetricBuffer::new();
        let emitted = plugin.gather(&mut buffer)?;
        info!(emitted, "Collection cycle finished");

        let config = plugin.config();
        Ok(GatherResult {
            measurement: config.measurement.clone(),
            database: config.database.clone(),
            database_exists: plugin.database_exists(),
            metrics: buffer.into_metrics(),
        })
    }
}

impl Execute for GatherCmd {
    type Output = GatherResult;

    fn execute(self, config: PluginConfig) -> Result<Self::Output, Box<dyn Error>> {
        self.run_with(config, MySqlConnector)
    }
}
