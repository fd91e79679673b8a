use serde::Deserialize;
use std::path::Path;

/// Host-tool settings: which EEPROM image to open and the log geometry it
/// was written with. The geometry must match the device build bit-exactly;
/// there is no header on media to cross-check it against.
#[derive(Deserialize, Debug)]
pub struct TephraConfig {
    #[serde(default = "defaults::image_path")]
    pub image_path: String,
    #[serde(default = "defaults::record_count")]
    pub record_count: u8,
    #[serde(default = "defaults::record_size")]
    pub record_size: u8,
    #[serde(default = "defaults::base_address")]
    pub base_address: u32,
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

mod defaults {
    pub fn image_path() -> String {
        "/tmp/tephra_image".into()
    }

    pub fn record_count() -> u8 {
        32
    }

    pub fn record_size() -> u8 {
        16
    }

    pub fn base_address() -> u32 {
        0
    }

    pub fn log_level() -> String {
        "info".into()
    }
}

impl Default for TephraConfig {
    fn default() -> Self {
        Self {
            image_path: defaults::image_path(),
            record_count: defaults::record_count(),
            record_size: defaults::record_size(),
            base_address: defaults::base_address(),
            log_level: defaults::log_level(),
        }
    }
}

impl TephraConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let tephra_config: TephraConfig = toml::from_str(&toml_to_str)?;
        Ok(tephra_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg: TephraConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.image_path, "/tmp/tephra_image");
        assert_eq!(cfg.record_count, 32);
        assert_eq!(cfg.record_size, 16);
        assert_eq!(cfg.base_address, 0);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let cfg: TephraConfig = toml::from_str(
            r#"
            image_path = "/var/lib/tephra/eeprom.bin"
            record_count = 64
            record_size = 8
            base_address = 256
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.image_path, "/var/lib/tephra/eeprom.bin");
        assert_eq!(cfg.record_count, 64);
        assert_eq!(cfg.record_size, 8);
        assert_eq!(cfg.base_address, 256);
        assert_eq!(cfg.log_level, "debug");
    }
}
