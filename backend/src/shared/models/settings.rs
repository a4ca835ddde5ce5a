use std::{fs, path::PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

const SETTINGS_FILENAME: &str = "settings.json";
const SETTINGS_ENV_VAR: &str = "TASKLIST_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown default_time_zone '{0}'")]
    TimeZone(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub jwt_expiration_in_minutes: u64,
    pub cookie_max_age_days: u64,
    pub cookie_secure: bool,
    pub frontend_url: String,
    pub default_time_zone: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tcp_socket_binding: "0.0.0.0".to_string(),
            tcp_socket_port: 4000,
            database_path: "tasklist.redb".to_string(),
            jwt_secret: "change-me-before-deploying".to_string(),
            jwt_expiration_in_minutes: 5 * 24 * 60,
            cookie_max_age_days: 5,
            cookie_secure: false,
            frontend_url: "http://localhost:3000".to_string(),
            default_time_zone: "UTC".to_string(),
            log_filter: "tasklist_server=info,tower_http=info".to_string(),
        }
    }
}

impl Settings {
    /// Load `settings.json` from the working directory, or from the file
    /// named by `TASKLIST_SETTINGS`.
    pub fn load() -> Result<Settings, SettingsError> {
        let path = std::env::var(SETTINGS_ENV_VAR)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));
        let display = path.display().to_string();

        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: display.clone(),
            source,
        })?;
        Settings::from_json(&content).map_err(|e| match e {
            SettingsError::Parse { source, .. } => SettingsError::Parse { path: display, source },
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Settings, SettingsError> {
        let settings: Settings = serde_json::from_str(content).map_err(|source| SettingsError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        settings.default_zone()?;
        Ok(settings)
    }

    pub fn default_zone(&self) -> Result<Tz, SettingsError> {
        self.default_time_zone
            .parse::<Tz>()
            .map_err(|_| SettingsError::TimeZone(self.default_time_zone.clone()))
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}
