//! Router configuration
//!
//! Settings come from an optional YAML file:
//! - `ConfigFile::user()`: `<config_dir>/multimodel/config.yaml`
//! - `ConfigFile::new(path)`: any explicit path
//!
//! Vault connection values are never read from the file; they only come
//! from the environment (see `secrets::VaultSettings`).

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::ConfigFile;
pub use settings::{ProviderEndpoints, RouterSettings};
