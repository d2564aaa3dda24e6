//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, toon and
//! InfluxDB line protocol.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
    /// InfluxDB line protocol
    Line,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format as InfluxDB line protocol.
    ///
    /// Results that carry no metrics fall back to the table rendering.
    fn to_line_protocol(&self) -> String {
        self.to_table()
    }

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
            OutputFormat::Line => self.to_line_protocol(),
        }
    }
}
