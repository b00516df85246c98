//! Статистика продаж по фильмам.
//!
//! Считаются только активные брони: отменённые не входят ни в билеты,
//! ни в выручку.

use serde::Serialize;
use sqlx::FromRow;
use tracing::debug;

use crate::database::Database;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct MovieStats {
    pub title: String,
    pub bookings: i64,
    pub tickets: i64,
    pub revenue: f64,
}

#[derive(Clone)]
pub struct StatsService {
    db: Database,
}

impl StatsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn by_movie(&self) -> Result<Vec<MovieStats>> {
        // число мест = число запятых + 1 (seats никогда не пустой)
        let rows = sqlx::query_as::<_, MovieStats>(
            r#"
            SELECT
                movie_title AS title,
                COUNT(*) AS bookings,
                SUM(LENGTH(seats) - LENGTH(REPLACE(seats, ',', '')) + 1) AS tickets,
                CAST(COALESCE(SUM(total_price), 0) AS REAL) AS revenue
            FROM bookings
            WHERE is_canceled = 0
            GROUP BY movie_id, movie_title
            ORDER BY tickets DESC, movie_title ASC
            "#
        )
        .fetch_all(&self.db.pool)
        .await?;

        debug!("stats: {} movies with active bookings", rows.len());
        Ok(rows)
    }
}
