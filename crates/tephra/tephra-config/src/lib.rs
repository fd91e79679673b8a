mod config;

pub use config::{ConfigError, TephraConfig};
