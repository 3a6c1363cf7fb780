use anyhow::Context;
use clap::Parser;
use ide_mcp_client::cli::Cli;
use ide_mcp_client::{init_logging, run, Config, Discovery, FsRegistry, HttpTransport};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    init_logging(config.log_level);

    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "ide_mcp_client".to_string());
    let discovery = Discovery::from_config(FsRegistry, &config);
    let transport = HttpTransport::new(config.timeout).context("Failed to set up HTTP transport")?;

    let mut stdout = std::io::stdout().lock();
    match run(&cli.command(), &discovery, &transport, &program, &mut stdout).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::debug!(user_input = err.is_user_input(), "command failed: {:?}", err);
            eprintln!("Error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
