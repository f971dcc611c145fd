//! VLESS protocol parser
//!
//! Format: vless://uuid@host:port?params#tag

use tracing::trace;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::parser::util::{QueryParams, authority, split_host_port, split_userinfo};
use crate::provider::{Provider, RealityParams, TransportParams, Vless};

use super::UriParser;

const SCHEME: &str = "vless";

// ============================================================================
// VLESS Parser
// ============================================================================

/// Parser for VLESS (vless://) URIs
///
/// The port is only checked for being an integer. Unlike `vmess` and `ss`,
/// port `0` is accepted.
pub struct VlessParser;

impl UriParser for VlessParser {
    fn scheme(&self) -> &str {
        SCHEME
    }

    fn parse(&self, uri: &Url, raw: &str) -> Result<Provider> {
        trace!("Parsing VLESS URI");

        let (userinfo, hostport) = split_userinfo(authority(raw));
        if userinfo.is_none() {
            return Err(ProviderError::MissingUserId { scheme: SCHEME });
        }
        let id = urlencoding::decode(uri.username())
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| uri.username().to_string());
        if id.is_empty() {
            return Err(ProviderError::EmptyUserId { scheme: SCHEME });
        }

        let (address, port) = split_host_port(hostport).map_err(|source| {
            ProviderError::HostPort {
                scheme: SCHEME,
                source,
            }
        })?;
        let port: u16 = port.parse().map_err(|source| ProviderError::InvalidPort {
            scheme: SCHEME,
            source,
        })?;

        let q = QueryParams::from_url(uri);
        trace!(
            "VLESS config: server={}:{}, type={}, security={}",
            address,
            port,
            q.get("type"),
            q.get("security")
        );

        Ok(Provider::Vless(Vless {
            address,
            port,
            id,
            flow: q.get("flow"),
            encryption: q.get_or("encryption", "none"),
            transport: TransportParams {
                network: q.get_or("type", "tcp"),
                security: q.get_or("security", "none"),
                header_type: q.get("headerType"),
                host: q.get("host"),
                path: q.get("path"),
                sni: q.get("sni"),
                alpn: q.get("alpn"),
                service_name: q.get("serviceName"),
            },
            reality: RealityParams {
                fingerprint: q.get("fp"),
                public_key: q.get("pbk"),
                short_id: q.get("sid"),
                spider_x: q.get("spx"),
                post_quantum_verify: q.get("pqv"),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Vless> {
        let uri = Url::parse(raw).unwrap();
        match VlessParser.parse(&uri, raw)? {
            Provider::Vless(v) => Ok(v),
            other => panic!("Expected VLESS provider, got {other:?}"),
        }
    }

    #[test]
    fn test_vless_minimal_defaults() {
        let vless = parse("vless://80cbb58b-74c0-4fb5-a66e-818ffc81a3cd@example.com:443").unwrap();
        assert_eq!(vless.address, "example.com");
        assert_eq!(vless.port, 443);
        assert_eq!(vless.id, "80cbb58b-74c0-4fb5-a66e-818ffc81a3cd");
        assert_eq!(vless.encryption, "none");
        assert_eq!(vless.transport.network, "tcp");
        assert_eq!(vless.transport.security, "none");
        assert_eq!(vless.flow, "");
        assert_eq!(vless.reality, RealityParams::default());
    }

    #[test]
    fn test_vless_reality_fields_mapped() {
        let raw = "vless://80cbb58b-74c0-4fb5-a66e-818ffc81a3cd@example.com:443?type=tcp&headerType=http&security=reality&pbk=PUBKEY123&sid=abcd1234&fp=chrome&sni=aparat.com&spx=%2F&pqv=VERIFY123&encryption=none&path=%2Ftest";
        let vless = parse(raw).unwrap();
        assert_eq!(vless.transport.security, "reality");
        assert_eq!(vless.transport.header_type, "http");
        assert_eq!(vless.transport.path, "/test");
        assert_eq!(vless.transport.sni, "aparat.com");
        assert_eq!(vless.reality.public_key, "PUBKEY123");
        assert_eq!(vless.reality.short_id, "abcd1234");
        assert_eq!(vless.reality.fingerprint, "chrome");
        assert_eq!(vless.reality.spider_x, "/");
        assert_eq!(vless.reality.post_quantum_verify, "VERIFY123");
    }

    #[test]
    fn test_vless_transport_fields() {
        let raw = "vless://id@example.com:443?type=grpc&serviceName=svc&security=tls&alpn=h2,http/1.1&host=cdn.example.com&flow=xtls-rprx-vision";
        let vless = parse(raw).unwrap();
        assert_eq!(vless.transport.network, "grpc");
        assert_eq!(vless.transport.service_name, "svc");
        assert_eq!(vless.transport.alpn, "h2,http/1.1");
        assert_eq!(vless.transport.host, "cdn.example.com");
        assert_eq!(vless.flow, "xtls-rprx-vision");
    }

    #[test]
    fn test_vless_missing_user_id() {
        let err = parse("vless://example.com:443").unwrap_err();
        assert!(matches!(err, ProviderError::MissingUserId { .. }));
    }

    #[test]
    fn test_vless_empty_user_id() {
        let err = parse("vless://@example.com:443").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyUserId { .. }));
    }

    #[test]
    fn test_vless_missing_port() {
        let err = parse("vless://id@example.com").unwrap_err();
        assert!(matches!(err, ProviderError::HostPort { .. }));
        assert!(err.to_string().contains("host/port"));
    }

    #[test]
    fn test_vless_empty_port() {
        let err = parse("vless://id@example.com:").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidPort { .. }));
    }

    #[test]
    fn test_vless_port_zero_is_accepted() {
        // VLESS does not range-check its port; vmess and ss reject 0.
        let vless = parse("vless://id@example.com:0").unwrap();
        assert_eq!(vless.port, 0);
    }

    #[test]
    fn test_vless_ipv6_host() {
        let vless = parse("vless://id@[2001:db8::1]:443").unwrap();
        assert_eq!(vless.address, "2001:db8::1");
        assert_eq!(vless.port, 443);
    }

    #[test]
    fn test_vless_percent_encoded_id() {
        let vless = parse("vless://user%40id@example.com:443").unwrap();
        assert_eq!(vless.id, "user@id");
    }

    #[test]
    fn test_vless_fragment_ignored() {
        let vless = parse("vless://id@example.com:443?security=tls#My%20Node").unwrap();
        assert_eq!(vless.transport.security, "tls");
        assert_eq!(vless.port, 443);
    }

    #[test]
    fn test_scheme() {
        assert_eq!(VlessParser.scheme(), "vless");
    }
}
