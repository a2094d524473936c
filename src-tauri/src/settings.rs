use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tauri::command;
use tauri_plugin_sql::{DbInstances, Migration, MigrationKind};

use crate::config::{
    OverlayConfig, KEY_CURSOR_POLL_MS, KEY_FIT_PADDING, KEY_JITTER_THRESHOLD,
    KEY_ROUTING_STRATEGY,
};

pub const DB_URL: &str = "sqlite:deskpin.db";

/// Default settings applied on first run.
const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    (KEY_FIT_PADDING, "28"),
    (KEY_JITTER_THRESHOLD, "2"),
    (KEY_CURSOR_POLL_MS, "16"),
    (KEY_ROUTING_STRATEGY, "auto"),
];

/// Schema migrations registered with `tauri-plugin-sql`.
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "create_settings",
        sql: "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        kind: MigrationKind::Up,
    }]
}

/// Helper to get the SQLite pool from the plugin's managed state.
async fn get_pool(
    db_instances: &tauri::State<'_, DbInstances>,
) -> Result<sqlx::Pool<sqlx::Sqlite>, String> {
    let instances = db_instances.0.read().await;
    let pool = instances
        .get(DB_URL)
        .ok_or_else(|| format!("Database '{}' not loaded", DB_URL))?;
    match pool {
        tauri_plugin_sql::DbPool::Sqlite(pool) => Ok(pool.clone()),
        #[allow(unreachable_patterns)]
        _ => Err("Expected SQLite database".to_string()),
    }
}

// --- Pool-based inner functions (testable without Tauri runtime) ---

async fn get_setting_inner(pool: &SqlitePool, key: &str) -> Result<Option<String>, String> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?1")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(|e| e.to_string())?;
    Ok(row.map(|r| r.get("value")))
}

async fn set_setting_inner(pool: &SqlitePool, key: &str, value: &str) -> Result<(), String> {
    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await
    .map_err(|e| e.to_string())?;
    Ok(())
}

async fn get_all_settings_inner(pool: &SqlitePool) -> Result<Vec<(String, String)>, String> {
    let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await
        .map_err(|e| e.to_string())?;
    Ok(rows.iter().map(|r| (r.get("key"), r.get("value"))).collect())
}

async fn seed_defaults_inner(pool: &SqlitePool) -> Result<(), String> {
    for (key, value) in DEFAULT_SETTINGS {
        sqlx::query(
            "INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn load_overlay_config_inner(pool: &SqlitePool) -> Result<OverlayConfig, String> {
    let rows = get_all_settings_inner(pool).await?;
    Ok(OverlayConfig::from_pairs(
        rows.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    ))
}

// --- Tauri commands (delegate to inner functions) ---

/// Read a single setting by key. Returns `None` if the key does not exist.
#[command]
pub async fn get_setting(
    db_instances: tauri::State<'_, DbInstances>,
    key: String,
) -> Result<Option<String>, String> {
    let pool = get_pool(&db_instances).await?;
    get_setting_inner(&pool, &key).await
}

/// Insert or update a setting. Emits `settings-changed`; overlay tunables
/// take effect on the next launch.
#[command]
pub async fn set_setting(
    app: tauri::AppHandle,
    db_instances: tauri::State<'_, DbInstances>,
    key: String,
    value: String,
) -> Result<(), String> {
    let pool = get_pool(&db_instances).await?;
    set_setting_inner(&pool, &key, &value).await?;

    use tauri::Emitter;
    let _ = app.emit(
        "settings-changed",
        serde_json::json!({ "key": key, "value": value }),
    );

    Ok(())
}

/// Return all settings as a list of (key, value) pairs.
#[command]
pub async fn get_all_settings(
    db_instances: tauri::State<'_, DbInstances>,
) -> Result<Vec<(String, String)>, String> {
    let pool = get_pool(&db_instances).await?;
    get_all_settings_inner(&pool).await
}

/// Seed defaults, then build the overlay configuration from the table.
pub async fn load_overlay_config(
    db_instances: &tauri::State<'_, DbInstances>,
) -> Result<OverlayConfig, String> {
    let pool = get_pool(db_instances).await?;
    seed_defaults_inner(&pool).await?;
    load_overlay_config_inner(&pool).await
}
