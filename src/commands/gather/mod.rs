mod cli_tests;
mod execute;
mod output;

pub use execute::GatherResult;

use clap::Args;

/// Run the configured query once and print the collected metrics
#[derive(Args, Debug, Default)]
#[command(after_help = "\
Examples:
  sql_query_input gather                                   # Use .sql_query.json
  sql_query_input gather -q 'SELECT 1 AS up'               # Override the query
  sql_query_input gather -s 'user:pass@tcp(db:3306)/' -q 'SELECT host, load FROM stats' -t host
  sql_query_input -f line gather                           # InfluxDB line protocol")]
pub struct GatherCmd {
    /// Server DSN: [username[:password]@][protocol[(address)]]/[?param=value]
    #[arg(short, long)]
    pub server: Option<String>,

    /// Database whose existence is checked before the query runs
    #[arg(short, long)]
    pub database: Option<String>,

    /// Measurement name of the emitted metrics
    #[arg(short, long)]
    pub measurement: Option<String>,

    /// Query producing the metrics
    #[arg(short, long)]
    pub query: Option<String>,

    /// Result column emitted as a tag (repeatable; replaces configured tags)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,
}
