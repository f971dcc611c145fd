use crate::config::outbound::{
    Outbound, OutboundSettings, PROXY_TAG, StreamSettings, VnextServer, VnextUser,
};
use crate::error::Result;
use crate::parser::util::value_or_default;

use super::TransportParams;

/// VMess connection attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vmess {
    pub address: String,
    pub port: u16,
    pub id: String,
    pub alter_id: u32,
    /// VMess cipher (`scy`), default `auto`
    pub security: String,
    /// `transport.security` is `tls` or `none`, derived from the `tls` field
    pub transport: TransportParams,
}

impl Vmess {
    pub fn outbound(&self) -> Result<Outbound> {
        let user = VnextUser {
            id: self.id.clone(),
            alter_id: Some(self.alter_id),
            security: Some(value_or_default(&self.security, "auto").to_string()),
            ..Default::default()
        };

        Ok(Outbound {
            tag: PROXY_TAG.to_string(),
            protocol: "vmess".to_string(),
            settings: OutboundSettings::Vnext {
                vnext: vec![VnextServer {
                    address: self.address.clone(),
                    port: self.port,
                    users: vec![user],
                }],
            },
            stream_settings: StreamSettings::build(&self.address, &self.transport),
        })
    }
}
