//! Dashboard settings: JSON file, environment and command-line overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Settings file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";
/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "ROAD_DASHBOARD_CONFIG";
/// Overrides `data_path`.
pub const DATA_ENV: &str = "ROAD_DASHBOARD_DATA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV with the State/UT × Year accident statistics.
    pub data_path: PathBuf,
    /// Number of states in the ranking chart.
    pub top_n: usize,
    /// Folder that receives exported chart images.
    pub export_dir: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("VehicleRoadAccident2011-2022.csv"),
            top_n: 10,
            export_dir: PathBuf::from("exports"),
            window_width: 1500.0,
            window_height: 900.0,
        }
    }
}

impl DashboardConfig {
    /// Read a settings file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve settings for this process.
    ///
    /// An explicit `ROAD_DASHBOARD_CONFIG` file must exist; the default
    /// `dashboard.json` is optional. `ROAD_DASHBOARD_DATA` and then the first
    /// CLI argument override the data path.
    pub fn resolve(
        config_env: Option<String>,
        data_env: Option<String>,
        cli_data_path: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_env {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(path) = data_env.filter(|p| !p.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = cli_data_path {
            config.data_path = PathBuf::from(path);
        }
        if config.top_n == 0 {
            config.top_n = Self::default().top_n;
        }

        info!(data = %config.data_path.display(), top_n = config.top_n, "configuration resolved");
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var(CONFIG_ENV).ok(),
            std::env::var(DATA_ENV).ok(),
            std::env::args().nth(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = config_file(r#"{ "top_n": 5, "export_dir": "out" }"#);
        let config = DashboardConfig::from_file(file.path()).unwrap();

        assert_eq!(config.top_n, 5);
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert_eq!(config.data_path, DashboardConfig::default().data_path);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let file = config_file("{ top_n: ");
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = DashboardConfig::resolve(Some("/no/such/dashboard.json".into()), None, None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn cli_argument_wins_over_environment() {
        let file = config_file(r#"{ "data_path": "from-file.csv", "top_n": 0 }"#);
        let path = file.path().to_string_lossy().to_string();

        let config = DashboardConfig::resolve(Some(path.clone()), Some("from-env.csv".into()), None)
            .unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-env.csv"));
        assert_eq!(config.top_n, 10);

        let config = DashboardConfig::resolve(
            Some(path),
            Some("from-env.csv".into()),
            Some("from-cli.csv".into()),
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("from-cli.csv"));
    }
}
