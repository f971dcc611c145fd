//! Engine configuration types
//!
//! - [`outbound`]: the outbound JSON tree produced from a parsed share link
//! - [`engine`]: a complete, runnable engine config wrapping one outbound
//! - [`options`]: TOML options controlling the engine config assembly

pub mod engine;
pub mod options;
pub mod outbound;

pub use engine::EngineConfig;
pub use options::CoreOptions;
pub use outbound::Outbound;
