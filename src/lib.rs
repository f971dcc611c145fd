pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod provider;

pub use error::{ProviderError, Result};
pub use parser::{Registry, UriParser, from_uri, register_parser, supported_schemes};
pub use provider::Provider;
