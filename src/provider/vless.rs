use crate::config::outbound::{
    Outbound, OutboundSettings, PROXY_TAG, RealitySettings, StreamSettings, VnextServer, VnextUser,
};
use crate::error::Result;
use crate::parser::util::value_or_default;

use super::{RealityParams, TransportParams};

/// VLESS connection attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vless {
    pub address: String,
    /// Only integer-parseability is checked for VLESS ports; `0` is accepted.
    pub port: u16,
    pub id: String,
    /// Flow control, empty when unset
    pub flow: String,
    pub encryption: String,
    pub transport: TransportParams,
    /// Used only when `transport.security` is `reality`
    pub reality: RealityParams,
}

impl Vless {
    pub fn outbound(&self) -> Result<Outbound> {
        let user = VnextUser {
            id: self.id.clone(),
            encryption: Some(value_or_default(&self.encryption, "none").to_string()),
            flow: (!self.flow.is_empty()).then(|| self.flow.clone()),
            ..Default::default()
        };

        let mut stream = StreamSettings::build(&self.address, &self.transport);
        if stream.security.eq_ignore_ascii_case("reality") {
            stream.reality_settings = Some(RealitySettings::new(
                &self.address,
                &self.transport,
                &self.reality,
            ));
        }

        Ok(Outbound {
            tag: PROXY_TAG.to_string(),
            protocol: "vless".to_string(),
            settings: OutboundSettings::Vnext {
                vnext: vec![VnextServer {
                    address: self.address.clone(),
                    port: self.port,
                    users: vec![user],
                }],
            },
            stream_settings: stream,
        })
    }
}
