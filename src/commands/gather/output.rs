//! Output formatting for gather command results.

use super::execute::GatherResult;
use crate::metric::line_protocol;
use crate::output::Outputable;

impl Outputable for GatherResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let status = if self.database_exists { "found" } else { "not found" };
        lines.push(format!("Measurement: {}", self.measurement));
        lines.push(format!("Database: {} ({})", self.database, status));
        lines.push(String::new());

        if self.metrics.is_empty() {
            lines.push("No metrics collected.".to_string());
            return lines.join("\n");
        }

        lines.push(format!("Collected {} metric(s):", self.metrics.len()));
        for (index, metric) in self.metrics.iter().enumerate() {
            lines.push(format!("  #{}", index + 1));
            for (key, value) in &metric.tags {
                lines.push(format!("    {} = {} (tag)", key, value));
            }
            for (key, value) in &metric.fields {
                lines.push(format!("    {} = {} ({})", key, value, value.type_name()));
            }
        }

        lines.join("\n")
    }

    fn to_line_protocol(&self) -> String {
        let mut lines = line_protocol::to_lines(&self.metrics);
        lines.truncate(lines.trim_end_matches('\n').len());
        lines
    }
}
