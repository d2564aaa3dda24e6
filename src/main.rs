use clap::Parser;
use tracing_subscriber::EnvFilter;

use sql_query_input::cli::Args;
use sql_query_input::config::PluginConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PluginConfig::resolve(args.config.as_deref())?;
    let output = args.command.run(config, args.format)?;
    println!("{}", output);
    Ok(())
}
