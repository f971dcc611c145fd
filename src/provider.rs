//! Provider data model
//!
//! A [`Provider`] is the normalized form of one share link. Each variant owns
//! its connection attributes and knows how to encode itself into an engine
//! [`Outbound`].

mod shadowsocks;
mod vless;
mod vmess;

pub use shadowsocks::Shadowsocks;
pub use vless::Vless;
pub use vmess::Vmess;

use crate::config::outbound::Outbound;
use crate::error::Result;

// ============================================================================
// Provider
// ============================================================================

/// A parsed share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Vless(Vless),
    Vmess(Vmess),
    Shadowsocks(Shadowsocks),
}

impl Provider {
    /// Protocol name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Vless(_) => "vless",
            Provider::Vmess(_) => "vmess",
            Provider::Shadowsocks(_) => "shadowsocks",
        }
    }

    /// Encodes the provider into an engine outbound
    pub fn outbound(&self) -> Result<Outbound> {
        match self {
            Provider::Vless(v) => v.outbound(),
            Provider::Vmess(v) => v.outbound(),
            Provider::Shadowsocks(s) => s.outbound(),
        }
    }

    /// Remote server address
    pub fn address(&self) -> &str {
        match self {
            Provider::Vless(v) => &v.address,
            Provider::Vmess(v) => &v.address,
            Provider::Shadowsocks(s) => &s.address,
        }
    }

    /// Remote server port
    pub fn port(&self) -> u16 {
        match self {
            Provider::Vless(v) => v.port,
            Provider::Vmess(v) => v.port,
            Provider::Shadowsocks(s) => s.port,
        }
    }
}

impl From<Vless> for Provider {
    fn from(v: Vless) -> Self {
        Provider::Vless(v)
    }
}

impl From<Vmess> for Provider {
    fn from(v: Vmess) -> Self {
        Provider::Vmess(v)
    }
}

impl From<Shadowsocks> for Provider {
    fn from(s: Shadowsocks) -> Self {
        Provider::Shadowsocks(s)
    }
}

// ============================================================================
// Shared Attributes
// ============================================================================

/// Transport and security attributes common to all protocols
///
/// Values are kept in their share-link source form; list-valued fields
/// (`host`, `alpn`) stay comma separated until encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportParams {
    /// Transport network: `tcp`, `ws`, `grpc`, ...
    pub network: String,
    /// Security layer: `none`, `tls`, `reality`
    pub security: String,
    /// Obfuscation header for TCP (`http` enables the HTTP disguise)
    pub header_type: String,
    /// Host header value(s), comma separated
    pub host: String,
    pub path: String,
    pub sni: String,
    /// ALPN protocols, comma separated
    pub alpn: String,
    /// gRPC service name
    pub service_name: String,
}

/// Reality handshake attributes (VLESS only)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealityParams {
    pub fingerprint: String,
    pub public_key: String,
    pub short_id: String,
    pub spider_x: String,
    pub post_quantum_verify: String,
}
