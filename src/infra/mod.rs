pub mod config;
pub mod logging;
pub mod secrets;

pub use config::{ConfigManager, StandupConfig};
pub use logging::init_tracing;
pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};
