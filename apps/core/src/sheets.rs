//! Google Sheets values-API client.
//!
//! Reads the configured spreadsheet tab by tab and turns each tab into
//! header-keyed rows for the importer. The first row of a tab is the
//! header; short data rows are padded with empty cells.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use crate::error::AppError;
use crate::importer::{Row, SheetRows};

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

/// Tab names in the deployed spreadsheet.
const TAB_SCHEDULES: &str = "Horarios";
const TAB_EVENTS: &str = "Eventos";
const TAB_MAJORS: &str = "Carreras";
const TAB_PROCEDURES: &str = "Tramites";
const TAB_SERVICES: &str = "Servicios";
const TAB_SUSPENSIONS: &str = "Avisos";

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Read-only client for one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    sheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(sheet_id: &str, api_key: &str) -> Result<Self, AppError> {
        Self::with_base_url(DEFAULT_API_BASE, sheet_id, api_key)
    }

    /// Same client against a different endpoint; tests point this at a
    /// local mock server.
    pub fn with_base_url(base: &str, sheet_id: &str, api_key: &str) -> Result<Self, AppError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base)?,
            sheet_id: sheet_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch one tab and convert it to header-keyed rows. An empty or
    /// missing tab yields no rows.
    pub async fn read_tab(&self, tab: &str) -> Result<Vec<Row>, AppError> {
        let url = self
            .base_url
            .join(&format!("{}/values/{}", self.sheet_id, tab))?;

        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: ValuesResponse = response.json().await?;
        Ok(rows_to_records(body.values))
    }

    /// Fetch every tab the importer consumes. A tab that fails to load is
    /// reported and imported as empty rather than failing the whole fetch.
    pub async fn fetch_all(&self) -> SheetRows {
        SheetRows {
            schedules: self.read_tab_or_empty(TAB_SCHEDULES).await,
            events: self.read_tab_or_empty(TAB_EVENTS).await,
            majors: self.read_tab_or_empty(TAB_MAJORS).await,
            procedures: self.read_tab_or_empty(TAB_PROCEDURES).await,
            services: self.read_tab_or_empty(TAB_SERVICES).await,
            suspensions: self.read_tab_or_empty(TAB_SUSPENSIONS).await,
        }
    }

    async fn read_tab_or_empty(&self, tab: &str) -> Vec<Row> {
        match self.read_tab(tab).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(tab, error = %e, "could not read sheet tab");
                Vec::new()
            }
        }
    }
}

/// Zip a values grid into header-keyed rows. Short rows are padded with
/// empty strings; extra cells beyond the header are dropped.
pub fn rows_to_records(values: Vec<Vec<Value>>) -> Vec<Row> {
    let mut iter = values.into_iter();
    let Some(header) = iter.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect();

    iter.map(|row| {
        let mut record = Map::new();
        for (i, key) in header.iter().enumerate() {
            let value = row.get(i).cloned().unwrap_or(Value::String(String::new()));
            record.insert(key.clone(), value);
        }
        record
    })
    .collect()
}
