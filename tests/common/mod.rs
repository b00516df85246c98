#![allow(dead_code)]

use box_office::config::Config;
use box_office::AppState;
use tempfile::TempDir;

/// Свежая база во временном каталоге, уже с миграциями и стартовой афишей.
/// TempDir нужно держать живым до конца теста.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(config_for(&dir)).await.unwrap();
    (state, dir)
}

pub fn config_for(dir: &TempDir) -> Config {
    let db_path = dir.path().join("cinema.db");
    Config::local(
        format!("sqlite://{}", db_path.display()),
        dir.path().join("tickets"),
    )
}

pub async fn count(state: &AppState, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(&state.db.pool).await.unwrap()
}
