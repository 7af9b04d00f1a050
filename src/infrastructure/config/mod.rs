// ============================================================
// INTAKE CONFIGURATION
// ============================================================
// Defaults <- TOML file <- CSV_INTAKE_* environment variables

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::domain::csv::{BuiltinCsvType, SchemaDefinition, SchemaRegistry};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::HeaderReader;

pub const CONFIG_PATH_ENV: &str = "CSV_INTAKE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "csv_intake.toml";
const ENV_PREFIX: &str = "CSV_INTAKE_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Single ASCII character separating header fields
    pub delimiter: String,

    pub trim: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            trim: true,
        }
    }
}

impl ReaderConfig {
    fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(AppError::ConfigError(format!(
                "reader.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    pub fn header_reader(&self) -> Result<HeaderReader> {
        Ok(HeaderReader::new()
            .with_delimiter(self.delimiter_byte()?)
            .with_trim(self.trim))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchemaConfig {
    #[validate(length(min = 1))]
    pub type_key: String,

    #[serde(default)]
    pub required_headers: Vec<String>,
}

impl From<&SchemaConfig> for SchemaDefinition {
    fn from(config: &SchemaConfig) -> Self {
        SchemaDefinition::new(config.type_key.as_str(), config.required_headers.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reader: ReaderConfig,

    /// Order here is the identification tie-break order
    #[serde(default)]
    pub schemas: Vec<SchemaConfig>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            reader: ReaderConfig::default(),
            schemas: BuiltinCsvType::ALL
                .iter()
                .map(|kind| SchemaConfig {
                    type_key: kind.key().to_string(),
                    required_headers: kind
                        .required_headers()
                        .iter()
                        .map(|h| h.to_string())
                        .collect(),
                })
                .collect(),
        }
    }
}

impl IntakeConfig {
    /// Load from `CSV_INTAKE_CONFIG` (or `csv_intake.toml`) plus the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_from(&path)
    }

    /// A missing file falls back to defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: IntakeConfig = Self::figment(path).extract()?;
        config.validate()?;

        info!(
            path = %path.display(),
            schemas = config.schemas.len(),
            "Loaded intake configuration"
        );

        Ok(config)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(IntakeConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.reader.delimiter_byte()?;

        for schema in &self.schemas {
            schema.validate()?;
        }

        // Key uniqueness is owned by the registry
        self.build_registry()
            .map(|_| ())
            .map_err(|e| AppError::ConfigError(e.to_string()))
    }

    /// Registry in file order.
    pub fn build_registry(&self) -> Result<SchemaRegistry> {
        SchemaRegistry::new(self.schemas.iter().map(SchemaDefinition::from).collect())
    }
}
