//! Full engine configuration
//!
//! Wraps a single proxy outbound with a log block, a local SOCKS inbound and a
//! direct fallback outbound, producing a document the engine can run as-is.

use serde::{Deserialize, Serialize};

use super::options::{CoreOptions, LogLevel};
use super::outbound::Outbound;

pub const SOCKS_INBOUND_TAG: &str = "socks-in";
pub const DIRECT_TAG: &str = "direct";

// ============================================================================
// Engine Config
// ============================================================================

/// Complete engine configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub log: LogConfig,
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<EngineOutbound>,
}

/// Engine log block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub loglevel: LogLevel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Local inbound accepting application traffic
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Inbound {
    pub tag: String,
    pub listen: String,
    pub port: u16,
    pub protocol: String,
    pub settings: SocksSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SocksSettings {
    pub auth: String,
    pub udp: bool,
}

/// Outbound entry of the engine config
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum EngineOutbound {
    /// Generated proxy outbound
    Proxy(Box<Outbound>),
    /// Fallback outbound that connects directly
    Direct(DirectOutbound),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DirectOutbound {
    pub tag: String,
    pub protocol: String,
}

impl Default for DirectOutbound {
    fn default() -> Self {
        Self {
            tag: DIRECT_TAG.to_string(),
            protocol: "freedom".to_string(),
        }
    }
}

impl Inbound {
    /// SOCKS inbound without authentication and with UDP relaying enabled
    pub fn socks(listen: &str, port: u16) -> Self {
        Self {
            tag: SOCKS_INBOUND_TAG.to_string(),
            listen: listen.to_string(),
            port,
            protocol: "socks".to_string(),
            settings: SocksSettings {
                auth: "noauth".to_string(),
                udp: true,
            },
        }
    }
}

impl EngineConfig {
    /// Assemble a runnable config around `outbound`
    ///
    /// The proxy outbound comes first so the engine uses it by default.
    pub fn assemble(outbound: Outbound, options: &CoreOptions) -> Self {
        Self {
            log: LogConfig {
                loglevel: options.log_level,
                access: options.access_log.clone(),
                error: options.error_log.clone(),
            },
            inbounds: vec![Inbound::socks(&options.listen, options.socks_port)],
            outbounds: vec![
                EngineOutbound::Proxy(Box::new(outbound)),
                EngineOutbound::Direct(DirectOutbound::default()),
            ],
        }
    }

    /// Serialize the configuration to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
