//! IDE MCP Client
//!
//! A diagnostic client for the MCP server an IDE plugin exposes on an
//! ephemeral local port. The server advertises itself through descriptor
//! files; this crate finds the live one, confirms it with an `initialize`
//! handshake, then sends a single JSON-RPC request and prints the reply.
//!
//! # Example
//!
//! ```no_run
//! use ide_mcp_client::{run, Command, Config, Discovery, FsRegistry, HttpTransport};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let discovery = Discovery::from_config(FsRegistry, &config);
//!     let transport = HttpTransport::new(config.timeout)?;
//!     run(&Command::List, &discovery, &transport, "ide_mcp_client", &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod discovery;
pub mod error;
mod logging;
pub mod protocol;
pub mod render;
pub mod transport;

use std::io::Write;

pub use command::{ArgFile, Command};
pub use config::{Config, LogLevel};
pub use discovery::{
    ConnectionDescriptor, DescriptorFile, Discovery, FsRegistry, RegistrySource, ResolvedSession,
};
pub use error::ClientError;
pub use logging::init_logging;
pub use protocol::{JsonRpcRequest, JsonRpcResponse};
pub use transport::{HttpTransport, Transport, TransportError};

/// Runs one command end to end and writes its output to `out`.
///
/// User input is validated before anything touches the network. A response
/// carrying a JSON-RPC `error` is printed like any other and counts as
/// success.
pub async fn run<S, T, W>(
    command: &Command,
    discovery: &Discovery<S>,
    transport: &T,
    program: &str,
    out: &mut W,
) -> error::Result<()>
where
    S: RegistrySource,
    T: Transport,
    W: Write,
{
    let request = command.build_request(command::request_id())?;

    let session = discovery
        .find_active_server(transport)
        .await
        .ok_or(ClientError::NoActiveServer)?;

    let Some(request) = request else {
        out.write_all(render::render_info(&session, program).as_bytes())?;
        return Ok(());
    };

    let response = transport
        .send(&session.endpoint, &session.token, &request)
        .await
        .ok_or(ClientError::NoResponse)?;

    if let Some(err) = response.error() {
        tracing::info!(code = err.code, "server returned an error: {}", err.message);
    }

    writeln!(out, "{}", render::render_response(&response))?;
    Ok(())
}
