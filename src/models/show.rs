use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub movie_id: String,
    pub hall: String,
    pub show_time: String,
}

/// Одна прожекция: (фильм, зал, время). Ключ для taken_seats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowKey {
    pub movie_id: String,
    pub hall: String,
    pub show_time: String,
}

impl ShowKey {
    pub fn new(movie_id: impl Into<String>, hall: impl Into<String>, show_time: impl Into<String>) -> Self {
        Self {
            movie_id: movie_id.into(),
            hall: hall.into(),
            show_time: show_time.into(),
        }
    }
}

impl fmt::Display for ShowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} · {} · {}", self.movie_id, self.hall, self.show_time)
    }
}
