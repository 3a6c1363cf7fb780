use clap::Parser;
use std::path::PathBuf;

use crate::command::Command;

#[derive(Parser, Debug)]
#[command(name = "ide_mcp_client")]
#[command(about = "Standalone MCP test client for a locally running IDE server")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding gemini-ide-server-*.json descriptors
    #[arg(long, global = true, value_name = "DIR")]
    pub registry_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The selected command; none means `list`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}
