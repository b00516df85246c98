use tracing::info;

use crate::database::Database;
use crate::error::Result;

pub struct SeedMovie {
    pub id: &'static str,
    pub title: &'static str,
    pub halls: &'static [(&'static str, &'static [&'static str])],
}

// Стартовая афиша. Попадает в базу только если таблица movies пустая.
pub const SEED_MOVIES: &[SeedMovie] = &[
    SeedMovie {
        id: "true_romance",
        title: "True Romance",
        halls: &[("Hall 1", &["12:00", "16:30", "21:00"]), ("Hall 2", &["14:15", "19:45"])],
    },
    SeedMovie {
        id: "indiana_jones_3",
        title: "Indiana Jones and the Last Crusade",
        halls: &[("Hall 1", &["11:00", "15:00"]), ("Hall 3", &["18:30", "21:30"])],
    },
    SeedMovie {
        id: "godfather",
        title: "The Godfather",
        halls: &[("Hall 2", &["13:00", "17:30"]), ("VIP Hall", &["20:30"])],
    },
    SeedMovie {
        id: "pulp_fiction",
        title: "Pulp Fiction",
        halls: &[("Hall 3", &["12:30", "17:00", "22:15"])],
    },
    SeedMovie {
        id: "lost_highway",
        title: "Lost Highway",
        halls: &[("Hall 4", &["19:00", "23:30"])],
    },
];

/// Заливает стартовую афишу одной транзакцией, если фильмов ещё нет.
/// Возвращает true, если засеяли.
pub async fn seed_if_empty(db: &Database) -> Result<bool> {
    let mut tx = db.pool.begin().await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(&mut *tx)
        .await?;
    if count > 0 {
        return Ok(false);
    }

    let mut shows = 0usize;
    for movie in SEED_MOVIES {
        sqlx::query("INSERT OR IGNORE INTO movies (movie_id, title) VALUES (?, ?)")
            .bind(movie.id)
            .bind(movie.title)
            .execute(&mut *tx)
            .await?;

        for (hall, times) in movie.halls {
            for time in times.iter() {
                sqlx::query("INSERT INTO shows (movie_id, hall, show_time) VALUES (?, ?, ?)")
                    .bind(movie.id)
                    .bind(*hall)
                    .bind(*time)
                    .execute(&mut *tx)
                    .await?;
                shows += 1;
            }
        }
    }

    tx.commit().await?;
    info!("Seeded {} movies with {} shows", SEED_MOVIES.len(), shows);
    Ok(true)
}
