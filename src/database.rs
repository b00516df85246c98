use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::catalog;
use crate::error::Result;

// Колонки bookings, появившиеся после первой версии схемы.
// Старые базы догоняются через ALTER TABLE при старте.
const BOOKING_UPGRADE_COLUMNS: &[(&str, &str)] = &[
    ("ticket_type", "TEXT"),
    ("price_per_seat", "REAL"),
    ("total_price", "REAL"),
    ("is_canceled", "INTEGER NOT NULL DEFAULT 0"),
    ("canceled_at", "TIMESTAMP"),
];

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    /// Полная инициализация: схема, догоняющие колонки, стартовый каталог.
    pub async fn init(&self) -> Result<()> {
        self.run_migrations().await?;
        self.ensure_booking_columns().await?;
        catalog::seed_if_empty(self).await?;
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed");
        Ok(())
    }

    pub async fn ensure_booking_columns(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let added = add_missing_booking_columns(&mut conn).await?;
        if !added.is_empty() {
            info!("bookings table upgraded, added columns: {}", added.join(", "));
        }
        Ok(())
    }
}

// PRAGMA table_info -> (cid, name, type, notnull, dflt_value, pk)
async fn add_missing_booking_columns(conn: &mut SqliteConnection) -> Result<Vec<&'static str>> {
    let existing: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('bookings')")
        .fetch_all(&mut *conn)
        .await?;

    let mut added = Vec::new();
    for (name, ddl) in BOOKING_UPGRADE_COLUMNS {
        if existing.iter().any(|c| c == name) {
            continue;
        }
        sqlx::query(&format!("ALTER TABLE bookings ADD COLUMN {name} {ddl}"))
            .execute(&mut *conn)
            .await?;
        added.push(*name);
    }
    Ok(added)
}
