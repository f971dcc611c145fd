use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Options
// ============================================================================

/// Options for assembling a full engine configuration, parsed from TOML
///
/// ```toml
/// listen = "127.0.0.1"
/// socks_port = 10808
/// log_level = "warning"
/// access_log = "/var/log/core/access.log"
/// error_log = "/var/log/core/error.log"
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CoreOptions {
    /// Address the local SOCKS inbound binds to, default "127.0.0.1"
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Port of the local SOCKS inbound, default 10808
    #[serde(default = "default_socks_port")]
    pub socks_port: u16,

    /// Engine log level, default "warning"
    #[serde(default)]
    pub log_level: LogLevel,

    /// Access log path. Omitted from the engine config when unset.
    #[serde(default)]
    pub access_log: Option<String>,

    /// Error log path. Omitted from the engine config when unset.
    #[serde(default)]
    pub error_log: Option<String>,
}

/// Log level understood by the engine
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    None,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            socks_port: default_socks_port(),
            log_level: LogLevel::default(),
            access_log: None,
            error_log: None,
        }
    }
}

impl CoreOptions {
    /// Parse options from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let options: CoreOptions =
            toml::from_str(content).context("Failed to parse core options TOML")?;

        if options.listen.trim().is_empty() {
            anyhow::bail!("listen address must not be empty");
        }
        if options.socks_port == 0 {
            anyhow::bail!("socks_port must not be 0");
        }

        Ok(options)
    }

    /// Load options from file path
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read core options from {:?}", path))?;
        Self::from_toml(&content)
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_socks_port() -> u16 {
    10808
}
