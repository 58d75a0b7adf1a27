use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectOptions, Database};

use crate::{config::AppConfig, db::connection, state::AppState};

/// In-memory sqlite state for route tests. The pool is pinned to a single
/// connection so every query sees the same in-memory database.
pub async fn test_state() -> Arc<AppState> {
    let cfg = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        log_level: "warn".to_string(),
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_min_idle: 1,
    };

    let mut options = ConnectOptions::new(cfg.database_url.clone());
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options).await.expect("connect sqlite");
    connection::sync_schema(&db).await.expect("sync schema");

    AppState::new(cfg, db)
}
