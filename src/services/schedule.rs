//! Афиша: фильмы и прожекции.
//!
//! Фильмы только добавляются (slug из названия), прожекции тоже -
//! без проверки на пересечения по залу и времени.

use tracing::{info, warn};

use crate::database::Database;
use crate::error::{BoxOfficeError, Result};
use crate::models::{make_slug, Movie, MovieShowCount, Show, ShowKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedMovie {
    pub movie_id: String,
    pub inserted: bool,
}

#[derive(Clone)]
pub struct ScheduleService {
    db: Database,
}

impl ScheduleService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_movie_titles(&self) -> Result<Vec<String>> {
        let titles: Vec<String> = sqlx::query_scalar("SELECT title FROM movies ORDER BY title")
            .fetch_all(&self.db.pool)
            .await?;
        Ok(titles)
    }

    pub async fn find_movie(&self, title: &str) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT movie_id, title FROM movies WHERE title = ? LIMIT 1"
        )
        .bind(title.trim())
        .fetch_optional(&self.db.pool)
        .await?;
        Ok(movie)
    }

    pub async fn movie_id_for_title(&self, title: &str) -> Result<Option<String>> {
        Ok(self.find_movie(title).await?.map(|m| m.movie_id))
    }

    pub async fn halls_for_movie(&self, title: &str) -> Result<Vec<String>> {
        let halls: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT s.hall
            FROM shows s
            JOIN movies m ON s.movie_id = m.movie_id
            WHERE m.title = ?
            ORDER BY s.hall
            "#
        )
        .bind(title.trim())
        .fetch_all(&self.db.pool)
        .await?;
        Ok(halls)
    }

    pub async fn show_times(&self, title: &str, hall: &str) -> Result<Vec<String>> {
        let times: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT s.show_time
            FROM shows s
            JOIN movies m ON s.movie_id = m.movie_id
            WHERE m.title = ? AND s.hall = ?
            ORDER BY s.show_time
            "#
        )
        .bind(title.trim())
        .bind(hall.trim())
        .fetch_all(&self.db.pool)
        .await?;
        Ok(times)
    }

    /// Есть ли в афише прожекция с таким фильмом, залом и временем.
    pub async fn show_exists(&self, title: &str, hall: &str, time: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM shows s
                JOIN movies m ON s.movie_id = m.movie_id
                WHERE m.title = ? AND s.hall = ? AND s.show_time = ?
            )
            "#
        )
        .bind(title.trim())
        .bind(hall.trim())
        .bind(time.trim())
        .fetch_one(&self.db.pool)
        .await?;
        Ok(exists)
    }

    /// Ключ прожекции по тому, что выбрал кассир. `MovieNotFound`, если
    /// такого названия нет, `NoShowSelected`, если нет такой прожекции.
    pub async fn resolve_show(&self, title: &str, hall: &str, time: &str) -> Result<ShowKey> {
        let movie_id = self
            .movie_id_for_title(title)
            .await?
            .ok_or_else(|| BoxOfficeError::MovieNotFound(title.trim().to_string()))?;
        if !self.show_exists(title, hall, time).await? {
            warn!("resolve_show: no show {} · {} · {}", title.trim(), hall.trim(), time.trim());
            return Err(BoxOfficeError::NoShowSelected);
        }
        Ok(ShowKey::new(movie_id, hall.trim(), time.trim()))
    }

    /// Добавляет фильм. Если slug уже занят, строка не пишется и
    /// `inserted` будет false.
    pub async fn add_movie(&self, title: &str) -> Result<AddedMovie> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoxOfficeError::MissingTitle);
        }

        let movie_id = make_slug(title);
        let inserted = sqlx::query("INSERT OR IGNORE INTO movies (movie_id, title) VALUES (?, ?)")
            .bind(&movie_id)
            .bind(title)
            .execute(&self.db.pool)
            .await?
            .rows_affected()
            > 0;

        if inserted {
            info!("Movie added: {} ({})", title, movie_id);
        } else {
            let existing: Option<String> =
                sqlx::query_scalar("SELECT title FROM movies WHERE movie_id = ?")
                    .bind(&movie_id)
                    .fetch_optional(&self.db.pool)
                    .await?;
            match existing {
                Some(existing) if existing != title => warn!(
                    "add_movie: slug {} already used by {:?}, {:?} not added",
                    movie_id, existing, title
                ),
                _ => info!("add_movie: {} already exists", movie_id),
            }
        }

        Ok(AddedMovie { movie_id, inserted })
    }

    pub async fn add_show(&self, title: &str, hall: &str, time: &str) -> Result<Show> {
        let (title, hall, time) = (title.trim(), hall.trim(), time.trim());
        if title.is_empty() {
            return Err(BoxOfficeError::MissingTitle);
        }
        if hall.is_empty() || time.is_empty() {
            return Err(BoxOfficeError::MissingHallOrTime);
        }

        let movie_id = self
            .movie_id_for_title(title)
            .await?
            .ok_or_else(|| BoxOfficeError::MovieNotFound(title.to_string()))?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO shows (movie_id, hall, show_time) VALUES (?, ?, ?) RETURNING id"
        )
        .bind(&movie_id)
        .bind(hall)
        .bind(time)
        .fetch_one(&self.db.pool)
        .await?;

        info!("Showtime added: {} · {} · {}", title, hall, time);
        Ok(Show {
            id,
            movie_id,
            hall: hall.to_string(),
            show_time: time.to_string(),
        })
    }

    pub async fn movies_with_show_counts(&self) -> Result<Vec<MovieShowCount>> {
        let rows = sqlx::query_as::<_, MovieShowCount>(
            r#"
            SELECT m.title AS title, COUNT(s.id) AS shows
            FROM movies m
            LEFT JOIN shows s ON m.movie_id = s.movie_id
            GROUP BY m.movie_id, m.title
            ORDER BY m.title
            "#
        )
        .fetch_all(&self.db.pool)
        .await?;
        Ok(rows)
    }
}
