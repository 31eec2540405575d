//! staywise - Main Entry Point
//!
//! Hotel booking cancellation predictor with CLI and server modes.

use clap::Parser;
use staywise::cli::{cmd_form, cmd_interactive, cmd_predict, cmd_preview, cmd_schema, cmd_serve, Cli, Commands};
use staywise::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "staywise=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.artifacts.apply(AppConfig::default());

    match cli.command {
        Some(Commands::Serve { port, host, dataset }) => {
            let mut config = config;
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if dataset.is_some() {
                config = config.with_dataset_path(dataset);
            }
            cmd_serve(config).await?;
        }
        Some(Commands::Predict { record, sample, json, input, output, print_json }) => {
            cmd_predict(
                &config,
                record,
                sample.as_deref(),
                json.as_deref(),
                input.as_deref(),
                output.as_deref(),
                print_json,
            )?;
        }
        Some(Commands::Form) => {
            cmd_form(&config)?;
        }
        Some(Commands::Schema { json }) => {
            cmd_schema(&config, json)?;
        }
        Some(Commands::Preview { data, rows }) => {
            cmd_preview(&config, data.as_deref(), rows)?;
        }
        None => {
            cmd_interactive(config).await?;
        }
    }

    Ok(())
}
