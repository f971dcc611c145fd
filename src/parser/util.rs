//! Small string and number helpers shared by the share-link parsers and the
//! outbound codec.

use std::collections::HashMap;

use serde_json::Value;
use url::Url;

use crate::error::{HostPortError, NumericFieldError};

// ============================================================================
// Query Parameters
// ============================================================================

/// Decoded query parameters of a share link. The first occurrence of a key wins.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn from_url(uri: &Url) -> Self {
        let mut params = HashMap::new();
        for (key, value) in uri.query_pairs() {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    /// Value for `key`, or an empty string when absent
    pub fn get(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_default()
    }

    /// Value for `key`, or `default` when absent or empty
    pub fn get_or(&self, key: &str, default: &str) -> String {
        value_or_default(self.0.get(key).map_or("", String::as_str), default).to_string()
    }
}

// ============================================================================
// Numeric Coercion
// ============================================================================

/// Coerces a JSON value that may be a number or a numeric string.
///
/// A native integer is taken first; otherwise a string is trimmed and parsed.
/// `443` and `"443"` yield the same result.
pub fn parse_int_field(value: Option<&Value>) -> Result<i64, NumericFieldError> {
    match value {
        None | Some(Value::Null) => Err(NumericFieldError::Empty),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| NumericFieldError::NotAnInteger(n.to_string())),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(NumericFieldError::EmptyString);
            }
            s.parse()
                .map_err(|_| NumericFieldError::NotAnInteger(s.to_string()))
        }
        Some(_) => Err(NumericFieldError::WrongType),
    }
}

// ============================================================================
// String Helpers
// ============================================================================

/// Returns `value`, or `default` when `value` is empty.
pub fn value_or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

/// Returns the first non-empty candidate, or `""`.
pub fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
///
/// Returns `None` instead of an empty list.
pub fn split_csv(value: &str) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() { None } else { Some(items) }
}

/// Host header values for the HTTP-disguised TCP header.
pub fn to_host_list(value: &str) -> Option<Vec<String>> {
    split_csv(value)
}

/// Request path list for the HTTP-disguised TCP header. Never empty.
pub fn to_path_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        vec!["/".to_string()]
    } else {
        vec![value.to_string()]
    }
}

// ============================================================================
// Authority Helpers
// ============================================================================

/// Returns the authority section (`userinfo@host:port`) of a raw URI.
pub fn authority(raw: &str) -> &str {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Splits an authority into its optional userinfo and the `host:port` part.
pub fn split_userinfo(authority: &str) -> (Option<&str>, &str) {
    match authority.rfind('@') {
        Some(at) => (Some(&authority[..at]), &authority[at + 1..]),
        None => (None, authority),
    }
}

/// Splits `host:port` or `[host]:port` into host and port text.
///
/// Brackets are removed from IPv6 hosts. The port text is not validated.
pub fn split_host_port(hostport: &str) -> Result<(String, String), HostPortError> {
    let err_input = || hostport.to_string();

    let (host, port) = if let Some(rest) = hostport.strip_prefix('[') {
        let bracket_end = rest
            .find(']')
            .ok_or_else(|| HostPortError::MissingBracket(err_input()))?;
        let host = &rest[..bracket_end];
        let after = &rest[bracket_end + 1..];
        let port = match after.strip_prefix(':') {
            Some(port) => port,
            None if after.is_empty() => return Err(HostPortError::MissingPort(err_input())),
            None => return Err(HostPortError::TooManyColons(err_input())),
        };
        (host, port)
    } else {
        let colon = hostport
            .rfind(':')
            .ok_or_else(|| HostPortError::MissingPort(err_input()))?;
        let host = &hostport[..colon];
        if host.contains(':') {
            return Err(HostPortError::TooManyColons(err_input()));
        }
        (host, &hostport[colon + 1..])
    };

    if host.contains(['[', ']']) || port.contains(['[', ']']) {
        return Err(HostPortError::UnexpectedBracket(err_input()));
    }

    Ok((host.to_string(), port.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_field_number_and_string_agree() {
        assert_eq!(parse_int_field(Some(&json!(443))), Ok(443));
        assert_eq!(parse_int_field(Some(&json!("443"))), Ok(443));
        assert_eq!(parse_int_field(Some(&json!(" 443 "))), Ok(443));
    }

    #[test]
    fn test_parse_int_field_failures() {
        assert_eq!(parse_int_field(None), Err(NumericFieldError::Empty));
        assert_eq!(
            parse_int_field(Some(&Value::Null)),
            Err(NumericFieldError::Empty)
        );
        assert_eq!(
            parse_int_field(Some(&json!(""))),
            Err(NumericFieldError::EmptyString)
        );
        assert!(matches!(
            parse_int_field(Some(&json!("abc"))),
            Err(NumericFieldError::NotAnInteger(_))
        ));
        assert!(matches!(
            parse_int_field(Some(&json!(4.5))),
            Err(NumericFieldError::NotAnInteger(_))
        ));
        assert_eq!(
            parse_int_field(Some(&json!(true))),
            Err(NumericFieldError::WrongType)
        );
    }

    #[test]
    fn test_query_params_first_wins() {
        let uri = Url::parse("vless://id@host:1?type=ws&type=grpc&path=%2Fws&empty=").unwrap();
        let params = QueryParams::from_url(&uri);
        assert_eq!(params.get("type"), "ws");
        assert_eq!(params.get("path"), "/ws");
        assert_eq!(params.get("missing"), "");
        assert_eq!(params.get_or("empty", "none"), "none");
        assert_eq!(params.get_or("missing", "tcp"), "tcp");
    }

    #[test]
    fn test_value_or_default() {
        assert_eq!(value_or_default("", "tcp"), "tcp");
        assert_eq!(value_or_default("ws", "tcp"), "ws");
    }

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(&["", "b", "c"]), "b");
        assert_eq!(first_non_empty(&["a", "b"]), "a");
        assert_eq!(first_non_empty(&["", ""]), "");
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(
            split_csv("h2, http/1.1 ,,"),
            Some(vec!["h2".to_string(), "http/1.1".to_string()])
        );
        assert_eq!(split_csv(""), None);
        assert_eq!(split_csv(" , ,"), None);
    }

    #[test]
    fn test_to_path_list_never_empty() {
        assert_eq!(to_path_list(""), vec!["/"]);
        assert_eq!(to_path_list("   "), vec!["/"]);
        assert_eq!(to_path_list("/search"), vec!["/search"]);
    }

    #[test]
    fn test_authority() {
        assert_eq!(
            authority("ss://abc@example.com:8388/?type=tcp#tag"),
            "abc@example.com:8388"
        );
        assert_eq!(authority("vless://id@host:443?x=1"), "id@host:443");
        assert_eq!(authority("vless://host"), "host");
    }

    #[test]
    fn test_split_userinfo() {
        assert_eq!(split_userinfo("id@host:443"), (Some("id"), "host:443"));
        assert_eq!(split_userinfo("a@b@host:1"), (Some("a@b"), "host:1"));
        assert_eq!(split_userinfo("host:443"), (None, "host:443"));
    }

    #[test]
    fn test_split_host_port_ipv4() {
        let (host, port) = split_host_port("example.com:8080").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, "8080");
    }

    #[test]
    fn test_split_host_port_ipv6() {
        let (host, port) = split_host_port("[2001:db8::1]:443").unwrap();
        assert_eq!(host, "2001:db8::1");
        assert_eq!(port, "443");
    }

    #[test]
    fn test_split_host_port_errors() {
        assert!(matches!(
            split_host_port("example.com"),
            Err(HostPortError::MissingPort(_))
        ));
        assert!(matches!(
            split_host_port("[::1]"),
            Err(HostPortError::MissingPort(_))
        ));
        assert!(matches!(
            split_host_port("::1:8080"),
            Err(HostPortError::TooManyColons(_))
        ));
        assert!(matches!(
            split_host_port("[::1:8080"),
            Err(HostPortError::MissingBracket(_))
        ));
        assert!(matches!(
            split_host_port("a]b:80"),
            Err(HostPortError::UnexpectedBracket(_))
        ));
    }

    #[test]
    fn test_split_host_port_empty_port_is_not_an_error() {
        let (host, port) = split_host_port("example.com:").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, "");
    }
}
