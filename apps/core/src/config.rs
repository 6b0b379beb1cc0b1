//! Environment-backed application configuration.

use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Complete runtime configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Bind address for the HTTP server.
    pub server_addr: String,
    /// Directory holding the SQLite database file.
    pub data_dir: PathBuf,
    /// Spreadsheet id; `None` disables the Sheets importer.
    pub sheets_id: Option<String>,
    /// API key for the Sheets values endpoint.
    pub sheets_api_key: Option<String>,
    /// Horizon window for the upcoming-events strategy, in days.
    pub event_horizon_days: i64,
    /// Emit bunyan-style JSON logs instead of the human format.
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from environment variables (with `.env` already
    /// applied by the caller). Only malformed values error; everything has
    /// a default and the Sheets pair is optional.
    pub fn from_env() -> Result<Self, AppError> {
        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        let sheets_id = env::var("GOOGLE_SHEETS_ID").ok().filter(|v| !v.is_empty());
        let sheets_api_key = env::var("GOOGLE_API_KEY").ok().filter(|v| !v.is_empty());

        let event_horizon_days = match env::var("EVENT_HORIZON_DAYS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::Config(format!("invalid EVENT_HORIZON_DAYS: {raw}")))?,
            Err(_) => 60,
        };

        let log_json = env::var("LOG_JSON").map(|v| v == "1" || v == "true").unwrap_or(false);

        Ok(Self {
            server_addr,
            data_dir,
            sheets_id,
            sheets_api_key,
            event_horizon_days,
            log_json,
        })
    }

    /// Both Sheets settings present means the importer is enabled.
    pub fn sheets_credentials(&self) -> Option<(&str, &str)> {
        match (&self.sheets_id, &self.sheets_api_key) {
            (Some(id), Some(key)) => Some((id.as_str(), key.as_str())),
            _ => None,
        }
    }
}
