//! HTTP surface: the WhatsApp webhooks plus a few read-only endpoints for
//! monitoring and debugging.

use axum::{
    extract::{Form, Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use validator::Validate;

use crate::brain::Intent;
use crate::database;
use crate::error::AppError;
use crate::importer::{build_knowledge, SheetRows};
use crate::models::{IncomingMessage, TwilioForm, User, WebhookReply};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .route("/webhook-twilio", post(twilio_handler))
        .route("/reload", post(reload_handler))
        .route("/health", get(health_handler))
        .route("/events", get(events_handler))
        .route("/schedules", get(schedules_handler))
        .route("/majors", get(majors_handler))
        .route("/users/:phone", get(user_handler))
        .route("/history/:phone", get(history_handler))
        .route("/stats", get(stats_handler))
        .with_state(app_state)
}

/// Shared message pipeline: upsert the user, persist the inbound message
/// with its classified intent, generate the reply, persist it.
async fn process_message(
    state: &AppState,
    phone: &str,
    content: &str,
    name: Option<&str>,
) -> Result<(String, Intent, User), AppError> {
    let user = database::touch_user(&state.pool, phone, name).await?;

    let kb = state.store.snapshot();
    let (reply, intent) = state.engine.generate(content, &kb);

    database::record_message(&state.pool, phone, content, false, Some(intent.label())).await?;
    database::record_message(&state.pool, phone, &reply, true, None).await?;

    info!(phone, intent = intent.label(), "message answered");
    Ok((reply, intent, user))
}

/// Pull fresh rows from Sheets (when configured) and publish the rebuilt
/// knowledge base.
async fn refresh_from_sheets(state: &AppState) -> bool {
    let Some(client) = &state.sheets else {
        return false;
    };
    let rows = client.fetch_all().await;
    if rows.is_empty() {
        warn!("sheet fetch returned no rows; keeping current knowledge base");
        return false;
    }
    state.store.replace(build_knowledge(&rows));
    true
}

// --- Webhook handlers ---

#[axum::debug_handler]
async fn webhook_handler(
    State(state): State<AppState>,
    Json(payload): Json<IncomingMessage>,
) -> Result<Json<WebhookReply>, (StatusCode, Json<serde_json::Value>)> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("Payload inválido: {e}")})),
        )
    })?;

    // Inline rows replace the knowledge base wholesale before answering.
    let rows = SheetRows {
        schedules: payload.schedule_rows.clone(),
        events: payload.event_rows.clone(),
        majors: payload.major_rows.clone(),
        procedures: payload.procedure_rows.clone(),
        services: payload.service_rows.clone(),
        suspensions: payload.suspension_rows.clone(),
    };
    if !rows.is_empty() {
        state.store.replace(build_knowledge(&rows));
    }

    let (reply, intent, user) =
        process_message(&state, &payload.phone, &payload.content, payload.name.as_deref())
            .await
            .map_err(|e| {
                error!(error = %e, "webhook processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": e.to_string()})),
                )
            })?;

    Ok(Json(WebhookReply {
        success: true,
        reply,
        intent: intent.label().to_string(),
        user: Some(user),
    }))
}

#[axum::debug_handler]
async fn twilio_handler(
    State(state): State<AppState>,
    Form(form): Form<TwilioForm>,
) -> impl IntoResponse {
    let phone = form.from.trim_start_matches("whatsapp:").to_string();

    if phone.is_empty() || form.body.is_empty() {
        return twiml("Error: Faltan datos requeridos");
    }

    // The deployed bot refreshes its data on every WhatsApp message so the
    // sheet is the live source of truth.
    refresh_from_sheets(&state).await;

    match process_message(&state, &phone, &form.body, None).await {
        Ok((reply, _, _)) => twiml(&reply),
        Err(e) => {
            error!(error = %e, "twilio webhook failed");
            twiml("Disculpa, hubo un error procesando tu mensaje. Por favor intenta de nuevo.")
        }
    }
}

/// Wrap a reply in a TwiML message response.
fn twiml(message: &str) -> ([(header::HeaderName, &'static str); 1], String) {
    let escaped = message
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    (
        [(header::CONTENT_TYPE, "application/xml")],
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>\n    <Message>{}</Message>\n</Response>",
            escaped
        ),
    )
}

#[axum::debug_handler]
async fn reload_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    if state.sheets.is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Importador de Sheets no configurado"})),
        ));
    }
    if refresh_from_sheets(&state).await {
        Ok(Json(json!({"success": true, "counts": state.store.snapshot().counts()})))
    } else {
        Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "No se pudieron leer datos de la hoja"})),
        ))
    }
}

// --- Read-only endpoints ---

#[axum::debug_handler]
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let counts = state.store.snapshot().counts();
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "sheets_configured": state.sheets.is_some(),
        "knowledge": counts,
    }))
}

#[derive(Deserialize)]
struct EventsQuery {
    days: Option<i64>,
}

#[axum::debug_handler]
async fn events_handler(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<serde_json::Value> {
    let kb = state.store.snapshot();
    let today = chrono::Local::now().date_naive();
    let horizon = query.days.unwrap_or(state.config.event_horizon_days);
    let events: Vec<serde_json::Value> = kb
        .upcoming_events(horizon, today)
        .into_iter()
        .map(|e| {
            json!({
                "name": e.name,
                "description": e.description,
                "starts": e.starts,
                "ends": e.ends,
                "location": e.location,
                "category": e.category,
                "days_until": e.days_until(today),
            })
        })
        .collect();

    Json(json!({"total": events.len(), "events": events}))
}

#[axum::debug_handler]
async fn schedules_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let kb = state.store.snapshot();
    let schedules: Vec<_> = kb.schedules().cloned().collect();
    Json(json!({"total": schedules.len(), "schedules": schedules}))
}

#[axum::debug_handler]
async fn majors_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let kb = state.store.snapshot();
    let majors: Vec<_> = kb.majors().cloned().collect();
    Json(json!({"total": majors.len(), "majors": majors}))
}

#[axum::debug_handler]
async fn user_handler(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<User>, (StatusCode, Json<serde_json::Value>)> {
    match database::get_user(&state.pool, &phone).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Usuario no encontrado"})),
        )),
        Err(e) => {
            error!(error = %e, "user lookup failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            ))
        }
    }
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[axum::debug_handler]
async fn history_handler(
    State(state): State<AppState>,
    Path(phone): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let limit = query.limit.unwrap_or(20);
    match database::user_messages(&state.pool, &phone, limit).await {
        Ok(messages) => Ok(Json(json!({
            "phone": phone,
            "total": messages.len(),
            "messages": messages,
        }))),
        Err(e) => {
            error!(error = %e, "history query failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            ))
        }
    }
}

#[axum::debug_handler]
async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<crate::models::Stats>, (StatusCode, Json<serde_json::Value>)> {
    match database::stats(&state.pool).await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            error!(error = %e, "stats query failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            ))
        }
    }
}
