//! Protocol parsers module
//!
//! This module contains parsers for the supported share-link formats and the
//! [`Registry`] that dispatches a raw URI to the parser for its scheme.

mod shadowsocks;
mod vless;
mod vmess;

pub use shadowsocks::ShadowsocksParser;
pub use vless::VlessParser;
pub use vmess::VmessParser;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ProviderError, Result};
use crate::provider::Provider;

// ============================================================================
// URI Parser Trait
// ============================================================================

/// Trait for parsing one share-link scheme into a [`Provider`]
pub trait UriParser: Send + Sync {
    /// Returns the scheme this parser handles (e.g., "ss", "vmess")
    fn scheme(&self) -> &str;

    /// Parses a URI of this scheme.
    ///
    /// `uri` is the syntactically parsed form of `raw`. Parsers that need the
    /// exact userinfo bytes read them from `raw`.
    fn parse(&self, uri: &Url, raw: &str) -> Result<Provider>;
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of URI parsers keyed by lowercase scheme
///
/// Lookups take a shared lock, registration an exclusive one, so a registry
/// can be shared across threads and extended at runtime.
#[derive(Default)]
pub struct Registry {
    parsers: RwLock<HashMap<String, Arc<dyn UriParser>>>,
}

impl Registry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the `vless`, `vmess` and `ss` parsers registered
    ///
    /// # Panics
    ///
    /// Panics if a built-in parser cannot be registered, which can only happen
    /// if two built-ins claim the same scheme.
    pub fn with_builtin_parsers() -> Self {
        let registry = Self::new();
        let builtins: [Arc<dyn UriParser>; 3] = [
            Arc::new(VlessParser),
            Arc::new(VmessParser),
            Arc::new(ShadowsocksParser),
        ];
        for parser in builtins {
            if let Err(e) = registry.register(parser) {
                panic!("failed to register built-in parser: {e}");
            }
        }
        registry
    }

    /// Registers a parser under its lowercased scheme
    ///
    /// Fails without touching the registry if the scheme is blank or already
    /// registered.
    pub fn register(&self, parser: Arc<dyn UriParser>) -> Result<()> {
        let scheme = parser.scheme().trim().to_lowercase();
        if scheme.is_empty() {
            return Err(ProviderError::EmptyScheme);
        }

        let mut parsers = self.parsers.write();
        if parsers.contains_key(&scheme) {
            return Err(ProviderError::DuplicateScheme(scheme));
        }
        debug!("Registered parser for scheme '{}'", scheme);
        parsers.insert(scheme, parser);
        Ok(())
    }

    /// Parses a raw share link using the parser registered for its scheme
    pub fn parse(&self, raw: &str) -> Result<Provider> {
        let uri = Url::parse(raw)?;
        let scheme = uri.scheme().to_lowercase();

        // Clone the parser out so the lock is not held while parsing.
        let parser = self.parsers.read().get(&scheme).cloned();
        let Some(parser) = parser else {
            return Err(ProviderError::UnsupportedScheme {
                scheme: uri.scheme().to_string(),
                supported: self.schemes(),
            });
        };

        debug!("Parsing URI with scheme '{}'", scheme);
        let result = parser.parse(&uri, raw);
        match &result {
            Ok(provider) => debug!(
                "Successfully parsed {} URI -> {} {}:{}",
                scheme,
                provider.name(),
                provider.address(),
                provider.port()
            ),
            Err(e) => debug!("Failed to parse {} URI: {}", scheme, e),
        }
        result
    }

    /// Returns the registered schemes, sorted ascending
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.parsers.read().keys().cloned().collect();
        schemes.sort();
        schemes
    }

    /// Parses multiple URIs from content (one per line)
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse_list(&self, content: &str) -> Vec<Result<Provider>> {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        debug!("Parsing {} URI lines from content", lines.len());

        lines.into_iter().map(|line| self.parse(line)).collect()
    }

    /// Parses multiple URIs, collecting only successful results
    pub fn parse_list_lossy(&self, content: &str) -> Vec<Provider> {
        let results = self.parse_list(content);
        let total = results.len();

        let providers: Vec<Provider> = results
            .into_iter()
            .filter_map(|r| match r {
                Ok(provider) => Some(provider),
                Err(e) => {
                    warn!("Failed to parse URI: {}", e);
                    None
                }
            })
            .collect();

        debug!(
            "URI list parsing complete: {} total, {} successful, {} failed",
            total,
            providers.len(),
            total - providers.len()
        );

        providers
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("schemes", &self.schemes())
            .finish()
    }
}
