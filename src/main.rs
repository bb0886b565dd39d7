use atr_analyzer::cli::{run_analyze, Cli, Command};
use atr_analyzer::utils::{init_file_logger, init_stderr_logger};
use atr_analyzer::{tui, Config, ExtractionService, HttpExtractionClient};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?.with_overrides(cli.base_url.clone(), cli.timeout_secs);

    let service: Arc<dyn ExtractionService> =
        Arc::new(HttpExtractionClient::from_config(&config.service)?);

    match cli.command() {
        Command::Tui { file } => {
            let _guard = init_file_logger(&config.logging)?;
            info!("Logging to {:?}", config.logging.log_dir);
            tui::run(config, service, file).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze { file, json } => {
            init_stderr_logger(&config.logging);
            info!("Service endpoint: {}", config.service.base_url);

            let ok = run_analyze(
                service,
                &file,
                json,
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await?;

            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
