pub mod config_store;
pub mod version_files;

pub use config_store::{CohoConfig, ConfigStore, ConfigStoreError};
