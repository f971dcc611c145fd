//! VMess protocol parser
//!
//! VMess share links carry a Base64 encoded JSON object:
//! vmess://BASE64({ "v": "2", "add": "host", "port": 443, "id": "uuid", ... })

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::parser::base64::decode_base64_any;
use crate::parser::util::parse_int_field;
use crate::provider::{Provider, TransportParams, Vmess};

use super::UriParser;

const SCHEME: &str = "vmess";
const PREFIX: &str = "vmess://";

// ============================================================================
// VMess Parser
// ============================================================================

/// Parser for VMess (vmess://) URIs
pub struct VmessParser;

/// VMess URI JSON payload
///
/// `port` and `aid` are kept as raw JSON values because clients emit them
/// both as numbers and as numeric strings.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct VmessJson {
    /// Server address
    add: Option<String>,
    /// Server port (number or string)
    port: Option<Value>,
    /// UUID
    id: Option<String>,
    /// Alter ID (number or string)
    aid: Option<Value>,
    /// Network type (tcp, ws, grpc, ...)
    net: Option<String>,
    /// Host header
    host: Option<String>,
    /// Path, or gRPC service name when `serviceName` is absent
    path: Option<String>,
    /// `tls` enables TLS
    tls: Option<String>,
    sni: Option<String>,
    alpn: Option<String>,
    /// TCP header type
    #[serde(rename = "type")]
    header_type: Option<String>,
    /// Cipher
    scy: Option<String>,
    /// gRPC service name
    #[serde(rename = "serviceName")]
    service_name: Option<String>,
}

impl UriParser for VmessParser {
    fn scheme(&self) -> &str {
        SCHEME
    }

    fn parse(&self, _uri: &Url, raw: &str) -> Result<Provider> {
        trace!("Parsing VMess URI");

        let payload = raw
            .strip_prefix(PREFIX)
            .ok_or(ProviderError::InvalidVmessUri)?;

        let decoded = decode_base64_any(payload).map_err(|source| ProviderError::Base64 {
            scheme: SCHEME,
            source,
        })?;

        let json: VmessJson = serde_json::from_slice(&decoded).map_err(ProviderError::Json)?;

        let port = parse_int_field(json.port.as_ref()).map_err(ProviderError::InvalidVmessPort)?;
        let address = json.add.unwrap_or_default();
        let id = json.id.unwrap_or_default();
        if address.is_empty() || id.is_empty() {
            return Err(ProviderError::MissingVmessFields);
        }
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ProviderError::PortOutOfRange {
                scheme: SCHEME,
                port,
            })?;

        // A malformed alter id is tolerated and left at 0.
        let alter_id = json
            .aid
            .as_ref()
            .and_then(|aid| parse_int_field(Some(aid)).ok())
            .and_then(|aid| u32::try_from(aid).ok())
            .unwrap_or(0);

        let security = if json.tls.as_deref().unwrap_or("").eq_ignore_ascii_case("tls") {
            "tls"
        } else {
            "none"
        };
        let path = json.path.unwrap_or_default();

        trace!(
            "VMess config: server={}:{}, net={:?}, tls={:?}",
            address, port, json.net, json.tls
        );

        Ok(Provider::Vmess(Vmess {
            address,
            port,
            id,
            alter_id,
            security: non_empty_or(json.scy, "auto"),
            transport: TransportParams {
                network: non_empty_or(json.net, "tcp"),
                security: security.to_string(),
                header_type: json.header_type.unwrap_or_default(),
                host: json.host.unwrap_or_default(),
                service_name: json.service_name.unwrap_or_else(|| path.clone()),
                path,
                sni: json.sni.unwrap_or_default(),
                alpn: json.alpn.unwrap_or_default(),
            },
        }))
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
