//! База первой версии: bookings без колонок цены и отмены.

mod common;

use box_office::database::Database;
use box_office::AppState;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn legacy_bookings_table_gets_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::config_for(&dir);

    {
        let legacy = Database::new(&config.database.url, 1).await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_code TEXT NOT NULL,
                movie_id TEXT NOT NULL,
                movie_title TEXT NOT NULL,
                hall TEXT NOT NULL,
                show_time TEXT NOT NULL,
                client_name TEXT NOT NULL,
                seats TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&legacy.pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO bookings (booking_code, movie_id, movie_title, hall, show_time, client_name, seats) \
             VALUES ('OLD00001', 'pulp_fiction', 'Pulp Fiction', 'Hall 3', '12:30', 'Honey Bunny', 'A1,A2')",
        )
        .execute(&legacy.pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE taken_seats (movie_id TEXT NOT NULL, hall TEXT NOT NULL, show_time TEXT NOT NULL, \
             seat_id TEXT NOT NULL, PRIMARY KEY (movie_id, hall, show_time, seat_id))",
        )
        .execute(&legacy.pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO taken_seats VALUES ('pulp_fiction', 'Hall 3', '12:30', 'A1'), ('pulp_fiction', 'Hall 3', '12:30', 'A2')",
        )
        .execute(&legacy.pool)
        .await
        .unwrap();
        legacy.pool.close().await;
    }

    let state = AppState::new(config).await.unwrap();

    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('bookings')")
        .fetch_all(&state.db.pool)
        .await
        .unwrap();
    for expected in ["ticket_type", "price_per_seat", "total_price", "is_canceled", "canceled_at"] {
        assert!(columns.iter().any(|c| c == expected), "missing column {expected}");
    }

    let old = state.bookings.find("OLD00001").await.unwrap();
    assert!(!old.is_canceled);
    assert_eq!(old.ticket_type, None);
    assert_eq!(old.total_price, None);

    // старую бронь можно отменить как обычную
    state.bookings.cancel("OLD00001").await.unwrap();
    assert_eq!(common::count(&state, "SELECT COUNT(*) FROM taken_seats").await, 0);
}

#[tokio::test]
async fn column_upgrade_is_idempotent() {
    let (state, _dir) = common::test_state().await;
    state.db.ensure_booking_columns().await.unwrap();
    state.db.ensure_booking_columns().await.unwrap();

    let columns = common::count(&state, "SELECT COUNT(*) FROM pragma_table_info('bookings')").await;
    assert_eq!(columns, 14);
}
