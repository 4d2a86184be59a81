use crate::app::ResponseOrdering;
use crate::model::PosterUrls;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_POSTER_SIZE: &str = "w300";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/300x450?text=No+Image";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No TMDB API key configured")]
    MissingApiKey,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io(e) => format!("Could not read configuration: {}", e),
            ConfigError::Parse { path, source } => {
                format!("Configuration file {} is not valid JSON: {}", path.display(), source)
            }
            ConfigError::MissingApiKey => {
                "A TMDB API key is required: pass --api-key, set TMDB_API_KEY, or add \"api_key\" to the config file"
                    .to_string()
            }
            ConfigError::InvalidValue { field, reason } => {
                format!("Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Optional settings read from the JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub image_base: Option<String>,
    pub poster_size: Option<String>,
    pub placeholder_url: Option<String>,
    pub ordering: Option<ResponseOrdering>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read a config file; a missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `<config_dir>/config.json` for this application.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moviequest", "movie-quest")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Fill unset fields from `other`.
    fn or(self, other: FileConfig) -> FileConfig {
        FileConfig {
            api_key: self.api_key.or(other.api_key),
            api_base: self.api_base.or(other.api_base),
            image_base: self.image_base.or(other.image_base),
            poster_size: self.poster_size.or(other.poster_size),
            placeholder_url: self.placeholder_url.or(other.placeholder_url),
            ordering: self.ordering.or(other.ordering),
            request_timeout_secs: self.request_timeout_secs.or(other.request_timeout_secs),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    pub api_key: String,
    pub api_base: String,
    pub posters: PosterUrls,
    pub ordering: ResponseOrdering,
    pub request_timeout: Duration,
}

impl BrowserConfig {
    /// Merge layers, highest precedence first: CLI (which clap already
    /// merged with the environment), then the config file, then defaults.
    pub fn resolve(cli: FileConfig, file: FileConfig) -> Result<Self, ConfigError> {
        let merged = cli.or(file);

        let api_key = merged
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout_secs = merged.request_timeout_secs.unwrap_or(15);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_key,
            api_base: merged.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            posters: PosterUrls {
                image_base: merged
                    .image_base
                    .unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string()),
                size: merged
                    .poster_size
                    .unwrap_or_else(|| DEFAULT_POSTER_SIZE.to_string()),
                placeholder: merged
                    .placeholder_url
                    .unwrap_or_else(|| DEFAULT_PLACEHOLDER_URL.to_string()),
            },
            ordering: merged.ordering.unwrap_or_default(),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn with_key(key: &str) -> FileConfig {
        FileConfig {
            api_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_apply() {
        let config = BrowserConfig::resolve(with_key("k"), FileConfig::default()).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.posters.image_base, DEFAULT_IMAGE_BASE);
        assert_eq!(config.posters.size, "w300");
        assert_eq!(config.posters.placeholder, DEFAULT_PLACEHOLDER_URL);
        assert_eq!(config.ordering, ResponseOrdering::LatestRequest);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            poster_size: Some("w500".to_string()),
            ordering: Some(ResponseOrdering::LastResolved),
            ..Default::default()
        };
        let cli = FileConfig {
            api_key: Some("from-cli".to_string()),
            ..Default::default()
        };
        let config = BrowserConfig::resolve(cli, file).unwrap();
        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.posters.size, "w500");
        assert_eq!(config.ordering, ResponseOrdering::LastResolved);
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let err = BrowserConfig::resolve(FileConfig::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.user_message().contains("TMDB_API_KEY"));

        let err = BrowserConfig::resolve(with_key("  "), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut cli = with_key("k");
        cli.request_timeout_secs = Some(0);
        let err = BrowserConfig::resolve(cli, FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "request_timeout_secs", .. }));
    }

    #[test]
    fn test_load_file_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_key": "abc", "image_base": "https://cdn.example/t/p", "ordering": "last-resolved"}}"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.image_base.as_deref(), Some("https://cdn.example/t/p"));
        assert_eq!(config.ordering, Some(ResponseOrdering::LastResolved));
        assert_eq!(config.api_base, None);
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.user_message().contains(&file.path().display().to_string()));
    }
}
