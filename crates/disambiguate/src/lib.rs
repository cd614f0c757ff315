//! disambiguate library: vault loading, exact link resolution, file watching
//! and the JSON-lines session, shared by the binary and integration tests.

pub mod config;
pub mod resolver;
pub mod session;
pub mod vault;
pub mod watcher;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use resolver::VaultResolver;
pub use session::{LinkDecision, Request, Response, Session};
pub use vault::Vault;
pub use watcher::{FileEvent, FileEventKind, FileWatcher};
