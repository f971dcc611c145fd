//! Shadowsocks protocol parser
//!
//! Supports SIP002 style links with either encoding of the credentials:
//! - ss://BASE64(method:password)@host:port?params#tag
//! - ss://method:password@host:port?params#tag

use tracing::trace;
use url::Url;

use crate::error::{ProviderError, Result};
use crate::parser::base64::decode_base64_any;
use crate::parser::util::{QueryParams, split_host_port};
use crate::provider::{Provider, Shadowsocks, TransportParams};

use super::UriParser;

const SCHEME: &str = "ss";

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) URIs
///
/// Base64 credentials may contain `/`, `+` and `=`, which a URL parser does
/// not keep inside the userinfo, so the credential segment is located in the
/// raw string.
pub struct ShadowsocksParser;

impl UriParser for ShadowsocksParser {
    fn scheme(&self) -> &str {
        SCHEME
    }

    fn parse(&self, uri: &Url, raw: &str) -> Result<Provider> {
        trace!("Parsing Shadowsocks URI");

        let (credentials, server) =
            credential_segment(raw).ok_or(ProviderError::MissingCredentials)?;
        let (method, password) =
            parse_credentials(credentials).ok_or(ProviderError::MissingCredentials)?;

        let (address, port) = split_host_port(server).map_err(|source| {
            ProviderError::HostPort {
                scheme: SCHEME,
                source,
            }
        })?;
        let port: u16 = port
            .parse()
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ProviderError::InvalidSsPort)?;

        let q = QueryParams::from_url(uri);
        trace!(
            "Shadowsocks config: server={}:{}, method={}, type={}",
            address,
            port,
            method,
            q.get("type")
        );

        Ok(Provider::Shadowsocks(Shadowsocks {
            address,
            port,
            method,
            password,
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
        }))
    }
}

/// Finds `credentials@server` in the raw link, ignoring fragment and query.
///
/// The last `@` separates the two, and a trailing `/` path is dropped from the
/// server part.
fn credential_segment(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let rest = rest.split('#').next().unwrap_or(rest);
    let rest = rest.split('?').next().unwrap_or(rest);

    let at = rest.rfind('@').filter(|at| *at > 0)?;
    let server = &rest[at + 1..];
    let server = server.split('/').next().unwrap_or(server);
    Some((&rest[..at], server))
}

/// Decodes `method:password`, first as Base64 and then as literal text.
fn parse_credentials(segment: &str) -> Option<(String, String)> {
    let decoded = decode_base64_any(segment)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|text| {
            text.split_once(':')
                .map(|(m, p)| (m.to_string(), p.to_string()))
        })
        .filter(|(method, _)| !method.is_empty());

    // Plain credentials are taken literally, without percent-decoding.
    let (method, password) = decoded.or_else(|| {
        segment
            .split_once(':')
            .map(|(m, p)| (m.to_string(), p.to_string()))
    })?;

    if method.is_empty() || password.is_empty() {
        return None;
    }
    Some((method, password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    fn parse(raw: &str) -> Result<Shadowsocks> {
        let uri = Url::parse(raw).unwrap();
        match ShadowsocksParser.parse(&uri, raw)? {
            Provider::Shadowsocks(s) => Ok(s),
            other => panic!("Expected Shadowsocks provider, got {other:?}"),
        }
    }

    #[test]
    fn test_shadowsocks_base64_userinfo() {
        let raw = "ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ=@example.com:8388?type=tcp&security=tls&sni=aparat.com";
        let ss = parse(raw).unwrap();
        assert_eq!(ss.method, "aes-256-gcm");
        assert_eq!(ss.password, "password");
        assert_eq!(ss.address, "example.com");
        assert_eq!(ss.port, 8388);
        assert_eq!(ss.transport.network, "tcp");
        assert_eq!(ss.transport.security, "tls");
        assert_eq!(ss.transport.sni, "aparat.com");
    }

    #[test]
    fn test_shadowsocks_base64_with_slash() {
        // A password whose Base64 form contains '/' and '+'
        let creds = STANDARD.encode("chacha20-ietf-poly1305:p?>>~");
        assert!(creds.contains('/') || creds.contains('+'));
        let raw = format!("ss://{creds}@example.com:8388#tag");
        let ss = parse(&raw).unwrap();
        assert_eq!(ss.method, "chacha20-ietf-poly1305");
        assert_eq!(ss.password, "p?>>~");
        assert_eq!(ss.port, 8388);
    }

    #[test]
    fn test_shadowsocks_url_safe_unpadded() {
        let creds = URL_SAFE_NO_PAD.encode("aes-128-gcm:secret");
        let raw = format!("ss://{creds}@example.com:443");
        let ss = parse(&raw).unwrap();
        assert_eq!(ss.method, "aes-128-gcm");
        assert_eq!(ss.password, "secret");
    }

    #[test]
    fn test_shadowsocks_plain_credentials() {
        let ss = parse("ss://aes-256-gcm:secret@example.com:8388").unwrap();
        assert_eq!(ss.method, "aes-256-gcm");
        assert_eq!(ss.password, "secret");
    }

    #[test]
    fn test_shadowsocks_plain_credentials_kept_literal() {
        let ss = parse("ss://aes-256-gcm:p%41ss@example.com:8388").unwrap();
        assert_eq!(ss.password, "p%41ss");

        let ss = parse("ss://aes-256-gcm:pa%40ss@example.com:8388").unwrap();
        assert_eq!(ss.password, "pa%40ss");
    }

    #[test]
    fn test_shadowsocks_trailing_path_and_defaults() {
        let ss = parse("ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ@example.com:8388/?plugin=x#n").unwrap();
        assert_eq!(ss.port, 8388);
        assert_eq!(ss.transport.network, "tcp");
        assert_eq!(ss.transport.security, "none");
    }

    #[test]
    fn test_shadowsocks_invalid_credentials() {
        let err = parse("ss://invalid@example.com:8388").unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredentials));
        assert!(err.to_string().contains("missing method/password"));
    }

    #[test]
    fn test_shadowsocks_empty_password() {
        let creds = STANDARD.encode("aes-256-gcm:");
        let err = parse(&format!("ss://{creds}@example.com:8388")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredentials));
    }

    #[test]
    fn test_shadowsocks_no_credentials() {
        let err = parse("ss://example.com:8388").unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredentials));
    }

    #[test]
    fn test_shadowsocks_port_validation() {
        let creds = "YWVzLTI1Ni1nY206cGFzc3dvcmQ";
        for port in ["0", ""] {
            let err = parse(&format!("ss://{creds}@example.com:{port}")).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidSsPort), "port {port:?}: {err}");
        }
    }

    #[test]
    fn test_shadowsocks_missing_port() {
        let err = parse("ss://YWVzLTI1Ni1nY206cGFzc3dvcmQ@example.com").unwrap_err();
        assert!(matches!(err, ProviderError::HostPort { .. }));
    }

    #[test]
    fn test_credential_segment() {
        assert_eq!(
            credential_segment("ss://abc@host:1?x=a@b#c@d"),
            Some(("abc", "host:1"))
        );
        assert_eq!(credential_segment("ss://host:1"), None);
        assert_eq!(credential_segment("ss://@host:1"), None);
    }

    #[test]
    fn test_scheme() {
        assert_eq!(ShadowsocksParser.scheme(), "ss");
    }
}
