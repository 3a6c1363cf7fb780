//! Error taxonomy for a single client invocation

use thiserror::Error;

/// Every way an invocation can end unsuccessfully. All of them are terminal.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No descriptor matched, or none answered the handshake.
    #[error("Could not find an active server.")]
    NoActiveServer,

    #[error("Arguments must be valid JSON ({source}): {input}")]
    InvalidArguments {
        input: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Arguments must be a JSON object, got: {input}")]
    ArgumentsNotObject { input: String },

    #[error("Params must be valid JSON ({source}): {input}")]
    InvalidParams {
        input: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("--arg-file expects KEY=PATH, got '{0}'")]
    MalformedArgFile(String),

    #[error("Error reading file '{path}': {source}")]
    ArgFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The final request got no usable response. Details were already
    /// written to stderr by the transport.
    #[error("No response from server")]
    NoResponse,

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ClientError {
    /// Extra remedy line shown under the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoActiveServer => {
                Some("Ensure the IDE is running and the MCP companion plugin is loaded.")
            }
            _ => None,
        }
    }

    /// True for errors caused by what the user typed.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidArguments { .. }
                | Self::ArgumentsNotObject { .. }
                | Self::InvalidParams { .. }
                | Self::MalformedArgFile(_)
                | Self::ArgFileRead { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
