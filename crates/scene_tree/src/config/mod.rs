//! Configuration system
//!
//! Runtime settings are plain serde structs. Files are read as TOML or RON,
//! chosen by extension.

pub use serde::{Deserialize, Serialize};

/// Serde-backed settings that can be read from and written to disk
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read and parse `path`
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text using the format implied by `path`
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        match Format::of(path)? {
            Format::Toml => toml::from_str(contents)
                .map_err(|e| ConfigError::Parse(format!("{path}: {e}"))),
            Format::Ron => {
                ron::from_str(contents).map_err(|e| ConfigError::Parse(format!("{path}: {e}")))
            }
        }
    }

    /// Serialize and write to `path`, replacing any existing file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let text = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialize(format!("{path}: {e}")))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(format!("{path}: {e}")))?,
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// On-disk formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &str) -> Result<Self, ConfigError> {
        match std::path::Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_string())),
        }
    }
}

/// Failures while reading or writing settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid for its format
    #[error("invalid config {0}")]
    Parse(String),

    /// The settings could not be encoded
    #[error("could not encode config {0}")]
    Serialize(String),

    /// The extension is neither `.toml` nor `.ron`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Settings read by the entity registry and its hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Name given to the root entity
    pub root_name: String,

    /// Prefix for generated entity names, followed by the entity serial
    pub name_prefix: String,

    /// Fallback `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            name_prefix: "entity".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl Config for RuntimeConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = RuntimeConfig::from_str_with_format("root_name = \"world\"\n", "runtime.toml").unwrap();
        assert_eq!(config.root_name, "world");
        assert_eq!(config.name_prefix, "entity");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_ron_parse() {
        let config = RuntimeConfig::from_str_with_format(
            "(root_name: \"scene\", name_prefix: \"node\", log_filter: \"debug\")",
            "runtime.ron",
        )
        .unwrap();
        assert_eq!(config.name_prefix, "node");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_unsupported_extension() {
        let result = RuntimeConfig::from_str_with_format("", "runtime.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RuntimeConfig::load_from_file("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("scene_tree_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let config = RuntimeConfig {
            root_name: "stage".to_string(),
            ..RuntimeConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = RuntimeConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
