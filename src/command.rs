//! User commands and the JSON-RPC requests they turn into

use crate::error::{ClientError, Result};
use crate::protocol::JsonRpcRequest;
use clap::Subcommand;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List available tools
    List,

    /// Call a tool
    Call {
        /// Name of the tool to call
        name: String,

        /// JSON arguments for the tool (e.g. '{"key": "value"}')
        arguments: Option<String>,

        /// Load an argument from a file (e.g. --arg-file newContent=my_code.py)
        #[arg(long = "arg-file", value_name = "KEY=PATH")]
        arg_files: Vec<String>,
    },

    /// Send a raw JSON-RPC method
    Raw {
        /// Method name
        method: String,

        /// JSON params
        params: Option<String>,
    },

    /// Show connection info and discovery path
    Info,
}

impl Default for Command {
    fn default() -> Self {
        Self::List
    }
}

/// One `--arg-file KEY=PATH` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgFile {
    pub key: String,
    pub path: PathBuf,
}

impl ArgFile {
    /// Splits at the first `=`; the path may itself contain `=`.
    pub fn parse(spec: &str) -> Result<Self> {
        let (key, path) = spec
            .split_once('=')
            .ok_or_else(|| ClientError::MalformedArgFile(spec.to_string()))?;
        Ok(Self {
            key: key.to_string(),
            path: PathBuf::from(path),
        })
    }

    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|source| ClientError::ArgFileRead {
            path: self.path.display().to_string(),
            source,
        })
    }
}

/// Request id for the final command: current Unix time in milliseconds.
pub fn request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Parses `call` arguments and overlays `--arg-file` contents in flag order.
pub fn tool_arguments(json: Option<&str>, arg_files: &[String]) -> Result<Map<String, Value>> {
    let mut arguments = match json {
        None => Map::new(),
        Some(input) => {
            let value: Value =
                serde_json::from_str(input).map_err(|source| ClientError::InvalidArguments {
                    input: input.to_string(),
                    source,
                })?;
            match value {
                Value::Object(map) => map,
                _ => {
                    return Err(ClientError::ArgumentsNotObject {
                        input: input.to_string(),
                    })
                }
            }
        }
    };

    for spec in arg_files {
        let arg_file = ArgFile::parse(spec)?;
        let contents = arg_file.read()?;
        tracing::debug!(key = %arg_file.key, bytes = contents.len(), "loaded --arg-file");
        arguments.insert(arg_file.key, Value::String(contents));
    }

    Ok(arguments)
}

fn raw_params(json: Option<&str>) -> Result<Value> {
    match json {
        None => Ok(empty_object()),
        Some(input) => serde_json::from_str(input).map_err(|source| ClientError::InvalidParams {
            input: input.to_string(),
            source,
        }),
    }
}

impl Command {
    /// Builds the request for this command. `info` has none.
    pub fn build_request(&self, id: u64) -> Result<Option<JsonRpcRequest>> {
        let request = match self {
            Command::List => JsonRpcRequest::new(id, "tools/list", empty_object()),
            Command::Call {
                name,
                arguments,
                arg_files,
            } => {
                let arguments = tool_arguments(arguments.as_deref(), arg_files)?;
                let mut params = Map::new();
                params.insert("name".to_string(), Value::String(name.clone()));
                params.insert("arguments".to_string(), Value::Object(arguments));
                JsonRpcRequest::new(id, "tools/call", Value::Object(params))
            }
            Command::Raw { method, params } => {
                JsonRpcRequest::new(id, method.clone(), raw_params(params.as_deref())?)
            }
            Command::Info => return Ok(None),
        };
        Ok(Some(request))
    }
}
