// UniBot Campus Assistant Backend Entry Point
// Webhook in, classified intent, formatted reply out.

mod api;
mod brain;
mod config;
mod database;
mod error;
mod importer;
mod knowledge;
mod models;
mod responder;
mod sheets;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::knowledge::KnowledgeStore;
use crate::responder::ResponseEngine;
use crate::sheets::SheetsClient;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pool: SqlitePool,
    pub store: Arc<KnowledgeStore>,
    pub engine: ResponseEngine,
    pub sheets: Option<SheetsClient>,
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        let formatting =
            tracing_bunyan_formatter::BunyanFormattingLayer::new("unibot-core".into(), std::io::stdout);
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_bunyan_formatter::JsonStorageLayer)
            .with(formatting)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(config.log_json);

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;
    let db_path = config.data_dir.join("unibot.sqlite");
    let pool = database::init_db(&db_path)
        .await
        .context("initializing database")?;

    let store = Arc::new(KnowledgeStore::new());

    let sheets = match config.sheets_credentials() {
        Some((id, key)) => Some(SheetsClient::new(id, key).context("building sheets client")?),
        None => {
            warn!("GOOGLE_SHEETS_ID/GOOGLE_API_KEY not set; knowledge base starts empty");
            None
        }
    };

    // Initial load; failure is not fatal, the webhook refreshes later.
    if let Some(client) = &sheets {
        let rows = client.fetch_all().await;
        if rows.is_empty() {
            warn!("initial sheet fetch returned no rows");
        } else {
            store.replace(importer::build_knowledge(&rows));
        }
    }

    let state = AppState {
        engine: ResponseEngine::new(config.event_horizon_days),
        config: config.clone(),
        pool,
        store,
        sheets,
    };

    let app = api::create_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("binding {}", config.server_addr))?;
    info!("🚀 UniBot listening on http://{}", config.server_addr);

    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}
