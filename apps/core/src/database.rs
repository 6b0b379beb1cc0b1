use chrono::{Local, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::models::{ChatMessage, Stats, User};

pub async fn init_db(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let db_url = format!("sqlite://{}", db_path.to_string_lossy());

    info!("Initializing database at: {}", db_url);

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// In-memory variant for tests.
pub async fn init_memory_db() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            phone TEXT PRIMARY KEY,
            name TEXT,
            career TEXT,
            term INTEGER,
            registered_at INTEGER NOT NULL,
            last_seen_at INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY,
            phone TEXT NOT NULL,
            content TEXT NOT NULL,
            from_bot INTEGER NOT NULL,
            intent TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_messages_phone ON messages(phone);
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

// --- Users ---

pub async fn get_user(pool: &SqlitePool, phone: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT phone, name, career, term, registered_at, last_seen_at
        FROM users
        WHERE phone = ?
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await
}

/// Register the user on first contact, or refresh `last_seen_at` (and the
/// name, when newly provided) on every later message.
pub async fn touch_user(
    pool: &SqlitePool,
    phone: &str,
    name: Option<&str>,
) -> Result<User, sqlx::Error> {
    let now = Utc::now().timestamp();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone, name, career, term, registered_at, last_seen_at)
        VALUES (?, ?, NULL, NULL, ?, ?)
        ON CONFLICT(phone) DO UPDATE SET
            last_seen_at = excluded.last_seen_at,
            name = COALESCE(users.name, excluded.name)
        RETURNING phone, name, career, term, registered_at, last_seen_at
        "#,
    )
    .bind(phone)
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Update the self-reported profile fields that were provided.
pub async fn update_profile(
    pool: &SqlitePool,
    phone: &str,
    career: Option<&str>,
    term: Option<i64>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET career = COALESCE(?, career),
            term = COALESCE(?, term)
        WHERE phone = ?
        RETURNING phone, name, career, term, registered_at, last_seen_at
        "#,
    )
    .bind(career)
    .bind(term)
    .bind(phone)
    .fetch_one(pool)
    .await
}

// --- Messages ---

pub async fn record_message(
    pool: &SqlitePool,
    phone: &str,
    content: &str,
    from_bot: bool,
    intent: Option<&str>,
) -> Result<ChatMessage, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now().timestamp();

    sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO messages (id, phone, content, from_bot, intent, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, phone, content, from_bot, intent, created_at
        "#,
    )
    .bind(&id)
    .bind(phone)
    .bind(content)
    .bind(from_bot)
    .bind(intent)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

/// The most recent messages for one user, oldest first.
pub async fn user_messages(
    pool: &SqlitePool,
    phone: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let mut messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT id, phone, content, from_bot, intent, created_at
        FROM messages
        WHERE phone = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(phone)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    messages.reverse();
    Ok(messages)
}

// --- Statistics ---

pub async fn stats(pool: &SqlitePool) -> Result<Stats, sqlx::Error> {
    // "Today" is the local calendar day, matching how suspensions and
    // greetings use the local clock.
    let midnight = Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(Local).single())
        .map(|dt| dt.timestamp())
        .unwrap_or(0);

    let total_users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    let total_messages: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
        .fetch_one(pool)
        .await?;
    let messages_today: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM messages WHERE created_at >= ?")
            .bind(midnight)
            .fetch_one(pool)
            .await?;
    let active_users_today: (i64,) = sqlx::query_as(
        "SELECT COUNT(DISTINCT phone) FROM messages WHERE created_at >= ? AND from_bot = 0",
    )
    .bind(midnight)
    .fetch_one(pool)
    .await?;

    Ok(Stats {
        total_users: total_users.0,
        total_messages: total_messages.0,
        messages_today: messages_today.0,
        active_users_today: active_users_today.0,
    })
}
