use serde::{Deserialize, Serialize};

use crate::parser::util::{first_non_empty, split_csv, to_host_list, to_path_list, value_or_default};
use crate::provider::{RealityParams, TransportParams};

/// Tag carried by every generated outbound; the engine config routes through it.
pub const PROXY_TAG: &str = "proxy";

// ============================================================================
// Outbound
// ============================================================================

/// Outbound configuration consumed by the proxy-core engine
///
/// Field names follow the engine's JSON schema exactly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Outbound {
    /// Outbound tag, always [`PROXY_TAG`] for generated outbounds
    pub tag: String,

    /// Protocol name: `vless`, `vmess` or `shadowsocks`
    pub protocol: String,

    /// Protocol-specific server and user descriptors
    pub settings: OutboundSettings,

    /// Transport and security layer
    #[serde(rename = "streamSettings")]
    pub stream_settings: StreamSettings,
}

/// Protocol settings block
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum OutboundSettings {
    /// VLESS and VMess server list
    Vnext { vnext: Vec<VnextServer> },
    /// Shadowsocks server list
    Servers { servers: Vec<ShadowsocksServer> },
}

/// One VLESS/VMess server entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VnextServer {
    pub address: String,
    pub port: u16,
    pub users: Vec<VnextUser>,
}

/// One VLESS/VMess user entry
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VnextUser {
    pub id: String,

    /// VMess alter id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<u32>,

    /// VMess cipher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,

    /// VLESS encryption, always `none` in practice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,

    /// VLESS flow control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
}

/// One Shadowsocks server entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShadowsocksServer {
    pub address: String,
    pub port: u16,
    pub method: String,
    pub password: String,
}

// ============================================================================
// Stream Settings
// ============================================================================

/// Transport and security configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamSettings {
    /// Transport: `tcp`, `ws`, `grpc`, ...
    pub network: String,

    /// Security layer: `none`, `tls`, `reality`
    pub security: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_settings: Option<TcpSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_settings: Option<WsSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_settings: Option<GrpcSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_settings: Option<TlsSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_settings: Option<RealitySettings>,
}

/// TCP transport with an HTTP-disguise header
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TcpSettings {
    pub header: TcpHeader,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TcpHeader {
    #[serde(rename = "type")]
    pub header_type: String,
    pub request: HttpRequest,
}

/// Fake HTTP request sent ahead of the stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// Request paths, never empty
    pub path: Vec<String>,

    /// Omitted entirely when there is no host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HttpRequestHeaders>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HttpRequestHeaders {
    #[serde(rename = "Host")]
    pub host: Vec<String>,
}

/// WebSocket transport
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WsSettings {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<WsHeaders>,
}

/// WebSocket headers. `Host` is a single string here, unlike the TCP header.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WsHeaders {
    #[serde(rename = "Host")]
    pub host: String,
}

/// gRPC transport
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GrpcSettings {
    pub service_name: String,
}

/// TLS security layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TlsSettings {
    pub server_name: String,

    /// Omitted when no ALPN value is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,
}

/// Reality security layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealitySettings {
    pub fingerprint: String,
    pub server_name: String,

    /// Server public key. The engine reads it from `password`.
    pub password: String,

    pub short_id: String,
    pub spider_x: String,

    /// Post-quantum verification token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mldsa65_verify: Option<String>,
}

// ============================================================================
// Builders
// ============================================================================

impl StreamSettings {
    /// Builds the transport blocks and, for `tls`, the TLS block.
    ///
    /// Reality is protocol specific and is attached by the caller.
    pub fn build(address: &str, transport: &TransportParams) -> Self {
        let network = value_or_default(&transport.network, "tcp");
        let security = value_or_default(&transport.security, "none");

        let mut stream = StreamSettings {
            network: network.to_string(),
            security: security.to_string(),
            ..Default::default()
        };

        if network.eq_ignore_ascii_case("tcp") && transport.header_type.eq_ignore_ascii_case("http")
        {
            stream.tcp_settings = Some(TcpSettings::http(transport));
        }
        if network.eq_ignore_ascii_case("ws") {
            stream.ws_settings = Some(WsSettings::new(transport));
        }
        if network.eq_ignore_ascii_case("grpc") {
            stream.grpc_settings = Some(GrpcSettings {
                service_name: transport.service_name.clone(),
            });
        }
        if security.eq_ignore_ascii_case("tls") {
            stream.tls_settings = Some(TlsSettings::new(address, transport));
        }

        stream
    }
}

impl TcpSettings {
    fn http(transport: &TransportParams) -> Self {
        TcpSettings {
            header: TcpHeader {
                header_type: "http".to_string(),
                request: HttpRequest {
                    path: to_path_list(&transport.path),
                    headers: to_host_list(&transport.host).map(|host| HttpRequestHeaders { host }),
                },
            },
        }
    }
}

impl WsSettings {
    fn new(transport: &TransportParams) -> Self {
        let headers = if transport.host.trim().is_empty() {
            None
        } else {
            Some(WsHeaders {
                host: transport.host.clone(),
            })
        };

        WsSettings {
            path: value_or_default(&transport.path, "/").to_string(),
            headers,
        }
    }
}

/// SNI priority: explicit SNI, then host header, then the server address.
fn server_name(address: &str, transport: &TransportParams) -> String {
    first_non_empty(&[&transport.sni, &transport.host, address]).to_string()
}

impl TlsSettings {
    pub fn new(address: &str, transport: &TransportParams) -> Self {
        TlsSettings {
            server_name: server_name(address, transport),
            alpn: split_csv(&transport.alpn),
        }
    }
}

impl RealitySettings {
    pub fn new(address: &str, transport: &TransportParams, reality: &RealityParams) -> Self {
        let pqv = reality.post_quantum_verify.trim();
        RealitySettings {
            fingerprint: value_or_default(&reality.fingerprint, "chrome").to_string(),
            server_name: server_name(address, transport),
            password: reality.public_key.clone(),
            short_id: reality.short_id.clone(),
            spider_x: reality.spider_x.clone(),
            mldsa65_verify: (!pqv.is_empty()).then(|| reality.post_quantum_verify.clone()),
        }
    }
}
