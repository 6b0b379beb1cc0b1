use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::importer::Row;

/// A registered chatbot user, keyed by phone number.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Phone number in international format (the WhatsApp identity).
    pub phone: String,
    /// Display name, when the webhook provided one.
    pub name: Option<String>,
    /// Degree program the user self-reported.
    pub career: Option<String>,
    /// Current term number the user self-reported.
    pub term: Option<i64>,
    /// Unix timestamp of first contact.
    pub registered_at: i64,
    /// Unix timestamp of the most recent message.
    pub last_seen_at: i64,
}

/// One stored chat message, inbound or outbound.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Unique identifier (UUID).
    pub id: String,
    /// Phone number of the conversation partner.
    pub phone: String,
    /// The message text.
    pub content: String,
    /// True when the bot sent this message.
    pub from_bot: bool,
    /// Classified intent label for inbound messages.
    pub intent: Option<String>,
    /// Unix timestamp of when the message was stored.
    pub created_at: i64,
}

/// Inbound webhook payload. Inline sheet rows, when present, trigger a
/// wholesale knowledge reload before the reply is generated.
#[derive(Debug, Deserialize, Validate)]
pub struct IncomingMessage {
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub name: Option<String>,
    #[serde(default)]
    pub schedule_rows: Vec<Row>,
    #[serde(default)]
    pub event_rows: Vec<Row>,
    #[serde(default)]
    pub major_rows: Vec<Row>,
    #[serde(default)]
    pub procedure_rows: Vec<Row>,
    #[serde(default)]
    pub service_rows: Vec<Row>,
    #[serde(default)]
    pub suspension_rows: Vec<Row>,
}

/// JSON webhook response body.
#[derive(Debug, Serialize)]
pub struct WebhookReply {
    pub success: bool,
    pub reply: String,
    pub intent: String,
    pub user: Option<User>,
}

/// Twilio WhatsApp webhook form fields (subset we consume).
#[derive(Debug, Deserialize)]
pub struct TwilioForm {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Aggregated usage statistics.
#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_users: i64,
    pub total_messages: i64,
    pub messages_today: i64,
    pub active_users_today: i64,
}
