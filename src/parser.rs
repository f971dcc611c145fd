//! Share-link parsing module
//!
//! This module provides functionality for:
//! - Decoding Base64 payloads in any of the common alphabets
//! - Parsing protocol URIs (vless://, vmess://, ss://) into a [`Provider`]
//! - Dispatching a raw URI to the parser registered for its scheme
//!
//! Callers that need isolation create their own [`Registry`]. The free
//! functions here operate on a lazily built, process-wide registry holding
//! the built-in parsers.

pub mod base64;
pub mod protocols;
pub mod util;

pub use protocols::{Registry, ShadowsocksParser, UriParser, VlessParser, VmessParser};

use std::sync::{Arc, LazyLock};

use crate::error::Result;
use crate::provider::Provider;

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_builtin_parsers);

/// Process-wide registry with the built-in parsers
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Parses a share link with the default registry
pub fn from_uri(raw: &str) -> Result<Provider> {
    DEFAULT_REGISTRY.parse(raw)
}

/// Schemes known to the default registry, sorted ascending
pub fn supported_schemes() -> Vec<String> {
    DEFAULT_REGISTRY.schemes()
}

/// Adds a parser to the default registry
pub fn register_parser(parser: Arc<dyn UriParser>) -> Result<()> {
    DEFAULT_REGISTRY.register(parser)
}
