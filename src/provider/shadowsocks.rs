use crate::config::outbound::{
    Outbound, OutboundSettings, PROXY_TAG, ShadowsocksServer, StreamSettings,
};
use crate::error::Result;

use super::TransportParams;

/// Shadowsocks connection attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shadowsocks {
    pub address: String,
    pub port: u16,
    /// Cipher method, e.g. `aes-256-gcm`
    pub method: String,
    pub password: String,
    pub transport: TransportParams,
}

impl Shadowsocks {
    pub fn outbound(&self) -> Result<Outbound> {
        Ok(Outbound {
            tag: PROXY_TAG.to_string(),
            protocol: "shadowsocks".to_string(),
            settings: OutboundSettings::Servers {
                servers: vec![ShadowsocksServer {
                    address: self.address.clone(),
                    port: self.port,
                    method: self.method.clone(),
                    password: self.password.clone(),
                }],
            },
            stream_settings: StreamSettings::build(&self.address, &self.transport),
        })
    }
}
