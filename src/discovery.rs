//! Locating a live server through its descriptor files
//!
//! A running IDE plugin writes `gemini-ide-server-<pid>-<port>.json` into a
//! registry directory. Crashed or restarted servers leave stale files
//! behind, so every candidate is confirmed with an `initialize` handshake
//! before it is trusted. Candidates are tried newest first and the scan
//! stops at the first one that answers.

use crate::config::Config;
use crate::protocol::JsonRpcRequest;
use crate::transport::Transport;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const DESCRIPTOR_PREFIX: &str = "gemini-ide-server-";
pub const DESCRIPTOR_GLOB: &str = "gemini-ide-server-*.json";

/// One matching file in a registry directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Directory listing and file reading used by discovery.
pub trait RegistrySource {
    /// Descriptor files in `dir` matching [`DESCRIPTOR_GLOB`], any order.
    fn list(&self, dir: &Path) -> Vec<DescriptorFile>;

    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Registry backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRegistry;

impl RegistrySource for FsRegistry {
    fn list(&self, dir: &Path) -> Vec<DescriptorFile> {
        let Some(dir) = dir.to_str() else {
            tracing::warn!("registry path is not valid UTF-8: {}", dir.display());
            return Vec::new();
        };
        let pattern = Path::new(&glob::Pattern::escape(dir)).join(DESCRIPTOR_GLOB);
        let Some(pattern) = pattern.to_str() else {
            return Vec::new();
        };

        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!("bad descriptor pattern {}: {}", pattern, e);
                return Vec::new();
            }
        };

        paths
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
                Some(DescriptorFile { path, modified })
            })
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Contents of a descriptor file. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescriptor {
    pub port: u16,
    pub auth_token: String,
    #[serde(default, deserialize_with = "lenient_pid")]
    pub pid: Option<u32>,
}

/// The pid is informational; anything that is not a `u32` reads as absent.
fn lenient_pid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|pid| u32::try_from(pid).ok()))
}

impl ConnectionDescriptor {
    pub fn parse(contents: &str) -> Option<Self> {
        let descriptor: Self = serde_json::from_str(contents).ok()?;
        if descriptor.port == 0 || descriptor.auth_token.is_empty() {
            return None;
        }
        Some(descriptor)
    }
}

/// Splits `gemini-ide-server-<pid>-<port>.json` into its pid and port.
pub fn parse_descriptor_name(file_name: &str) -> Option<(u32, u16)> {
    let stem = file_name
        .strip_prefix(DESCRIPTOR_PREFIX)?
        .strip_suffix(".json")?;
    let (pid, port) = stem.rsplit_once('-')?;
    Some((pid.parse().ok()?, port.parse().ok()?))
}

/// Connection details of the server that answered the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub endpoint: Url,
    pub port: u16,
    pub token: String,
    pub pid: Option<u32>,
    pub descriptor: PathBuf,
}

/// `http://<host>:<port><path>`
pub fn endpoint_url(host: &str, port: u16, path: &str) -> Option<Url> {
    Url::parse(&format!("http://{}:{}{}", host, port, path)).ok()
}

/// Scans a registry for a live server.
#[derive(Debug, Clone)]
pub struct Discovery<S> {
    source: S,
    registry_dir: PathBuf,
    fallback_dir: Option<PathBuf>,
    host: String,
    endpoint_path: String,
}

impl<S: RegistrySource> Discovery<S> {
    pub fn new(source: S, registry_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            registry_dir: registry_dir.into(),
            fallback_dir: None,
            host: "127.0.0.1".to_string(),
            endpoint_path: "/mcp".to_string(),
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self {
            source,
            registry_dir: config.registry_dir.clone(),
            fallback_dir: config.fallback_dir.clone(),
            host: config.host.clone(),
            endpoint_path: config.endpoint_path.clone(),
        }
    }

    /// Directory searched only when the registry has no descriptors.
    pub fn with_fallback(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    /// Matching descriptor files, most recently modified first.
    pub fn candidates(&self) -> Vec<DescriptorFile> {
        let mut files = self.source.list(&self.registry_dir);
        if files.is_empty() {
            if let Some(dir) = &self.fallback_dir {
                tracing::debug!("registry empty, checking {}", dir.display());
                files = self.source.list(dir);
            }
        }
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        files
    }

    /// Reads and validates one candidate.
    fn load(&self, file: &DescriptorFile) -> Option<ConnectionDescriptor> {
        let contents = match self.source.read(&file.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("skipping {}: {}", file.path.display(), e);
                return None;
            }
        };

        let Some(mut descriptor) = ConnectionDescriptor::parse(&contents) else {
            tracing::warn!("skipping {}: not a valid descriptor", file.path.display());
            return None;
        };

        if descriptor.pid.is_none() {
            descriptor.pid = file
                .path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_descriptor_name)
                .map(|(pid, _)| pid);
        }
        Some(descriptor)
    }

    /// Returns the newest candidate that answers the handshake.
    pub async fn find_active_server<T: Transport>(&self, transport: &T) -> Option<ResolvedSession> {
        let handshake = JsonRpcRequest::initialize();

        for file in self.candidates() {
            let Some(descriptor) = self.load(&file) else {
                continue;
            };
            let Some(endpoint) = endpoint_url(&self.host, descriptor.port, &self.endpoint_path)
            else {
                tracing::warn!("cannot build endpoint for port {}", descriptor.port);
                continue;
            };

            tracing::debug!(port = descriptor.port, "probing {}", file.path.display());
            if transport
                .send(&endpoint, &descriptor.auth_token, &handshake)
                .await
                .is_some()
            {
                tracing::info!(port = descriptor.port, "found live server");
                return Some(ResolvedSession {
                    endpoint,
                    port: descriptor.port,
                    token: descriptor.auth_token,
                    pid: descriptor.pid,
                    descriptor: file.path,
                });
            }
        }

        None
    }
}
