//! Бронирование и отмена.
//!
//! taken_seats дублирует то, что можно вывести из активных броней, поэтому
//! обе таблицы всегда пишутся в одной транзакции: бронь + её места при
//! подтверждении, удаление мест + флаг отмены при отмене.

use rand::Rng;
use sqlx::SqliteConnection;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::PricingConfig;
use crate::database::Database;
use crate::error::{BoxOfficeError, Result};
use crate::models::booking::round_price;
use crate::models::seat::join_seat_list;
use crate::models::{Booking, NewBooking, SeatId, ShowKey};
use crate::services::schedule::ScheduleService;
use crate::services::tickets::TicketRenderer;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 8;
// Схема не требует уникальности кода; при совпадении просто тянем новый
const CODE_ATTEMPTS: usize = 5;

const BOOKING_COLUMNS: &str = "id, booking_code, movie_id, movie_title, hall, show_time, \
    client_name, seats, ticket_type, price_per_seat, total_price, is_canceled, created_at, canceled_at";

/// Результат подтверждения. `ticket` пустой, если PDF не удалось записать -
/// бронь при этом уже сохранена.
#[derive(Debug, Clone)]
pub struct ConfirmedBooking {
    pub booking: Booking,
    pub ticket: Option<PathBuf>,
}

pub fn generate_booking_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Clone)]
pub struct BookingService {
    db: Database,
    schedule: ScheduleService,
    pricing: PricingConfig,
    tickets: TicketRenderer,
}

impl BookingService {
    pub fn new(db: Database, pricing: PricingConfig, tickets: TicketRenderer) -> Self {
        Self {
            schedule: ScheduleService::new(db.clone()),
            db,
            pricing,
            tickets,
        }
    }

    /// Все занятые места прожекции. Без кеша: каждый вызов читает таблицу заново.
    pub async fn taken_seats(&self, show: &ShowKey) -> Result<BTreeSet<SeatId>> {
        let mut conn = self.db.pool.acquire().await?;
        taken_seats_in(&mut conn, show).await
    }

    pub async fn confirm(&self, request: NewBooking) -> Result<ConfirmedBooking> {
        let request = request.normalized();
        request.check()?;
        if request.hall.is_empty() || request.show_time.is_empty() {
            return Err(BoxOfficeError::NoShowSelected);
        }

        let movie = self
            .schedule
            .find_movie(&request.movie_title)
            .await?
            .ok_or_else(|| BoxOfficeError::MovieNotFound(request.movie_title.clone()))?;
        if !self
            .schedule
            .show_exists(&movie.title, &request.hall, &request.show_time)
            .await?
        {
            warn!(
                "confirm: no show {} · {} · {}",
                movie.title, request.hall, request.show_time
            );
            return Err(BoxOfficeError::NoShowSelected);
        }
        let show = ShowKey::new(&movie.movie_id, &request.hall, &request.show_time);

        let price_per_seat = round_price(request.ticket_type.price(&self.pricing));
        let total_price = round_price(price_per_seat * request.seats.len() as f64);

        let mut tx = self.db.pool.begin().await?;

        // Повторная проверка внутри транзакции: выбор кассира мог устареть
        let taken = taken_seats_in(&mut tx, &show).await?;
        let clash: Vec<SeatId> = request.seats.iter().copied().filter(|s| taken.contains(s)).collect();
        if !clash.is_empty() {
            warn!("confirm: seats {} already taken for {}", join_seat_list(&clash, ","), show);
            return Err(BoxOfficeError::SeatsTaken(clash));
        }

        let code = free_booking_code(&mut tx, generate_booking_code).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (
                booking_code, movie_id, movie_title,
                hall, show_time, client_name, seats,
                ticket_type, price_per_seat, total_price
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#
        )
        .bind(&code)
        .bind(&movie.movie_id)
        .bind(&movie.title)
        .bind(&show.hall)
        .bind(&show.show_time)
        .bind(&request.client_name)
        .bind(request.seats_column())
        .bind(request.ticket_type.as_str())
        .bind(price_per_seat)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        for seat in &request.seats {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO taken_seats (movie_id, hall, show_time, seat_id)
                VALUES (?, ?, ?, ?)
                "#
            )
            .bind(&show.movie_id)
            .bind(&show.hall)
            .bind(&show.show_time)
            .bind(seat.to_string())
            .execute(&mut *tx)
            .await?;
        }

        let booking = booking_by_id(&mut tx, id).await?;
        tx.commit().await?;

        info!(
            "Booking {} confirmed: {} · seats {} · client {:?} · total {:.2}",
            booking.booking_code, show, booking.seats, booking.client_name, total_price
        );

        let ticket = match self.tickets.issue(&booking) {
            Ok(path) => Some(path),
            Err(e) => {
                error!("confirm: ticket for {} not rendered: {}", booking.booking_code, e);
                None
            }
        };

        Ok(ConfirmedBooking { booking, ticket })
    }

    /// Отмена по коду. Если код встречается несколько раз, берётся последняя бронь.
    pub async fn cancel(&self, code: &str) -> Result<Booking> {
        let code = normalize_code(code);
        let mut tx = self.db.pool.begin().await?;

        let booking = latest_by_code(&mut tx, &code)
            .await?
            .ok_or(BoxOfficeError::NotFound)?;
        if booking.is_canceled {
            return Err(BoxOfficeError::AlreadyCanceled);
        }

        let mut released = 0u64;
        for seat in booking.seats.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            released += sqlx::query(
                r#"
                DELETE FROM taken_seats
                WHERE movie_id = ? AND hall = ? AND show_time = ? AND seat_id = ?
                "#
            )
            .bind(&booking.movie_id)
            .bind(&booking.hall)
            .bind(&booking.show_time)
            .bind(seat)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }

        sqlx::query(
            r#"
            UPDATE bookings
            SET is_canceled = 1,
                canceled_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#
        )
        .bind(booking.id)
        .execute(&mut *tx)
        .await?;

        let booking = booking_by_id(&mut tx, booking.id).await?;
        tx.commit().await?;

        info!(
            "Booking {} canceled, {} seats released for {}",
            booking.booking_code,
            released,
            booking.show_key()
        );
        Ok(booking)
    }

    pub async fn find(&self, code: &str) -> Result<Booking> {
        let mut conn = self.db.pool.acquire().await?;
        latest_by_code(&mut conn, &normalize_code(code))
            .await?
            .ok_or(BoxOfficeError::NotFound)
    }

    /// Все брони прожекции, включая отменённые, новые сверху.
    pub async fn list_for_show(&self, show: &ShowKey) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE movie_id = ? AND hall = ? AND show_time = ? \
             ORDER BY id DESC"
        ))
        .bind(&show.movie_id)
        .bind(&show.hall)
        .bind(&show.show_time)
        .fetch_all(&self.db.pool)
        .await?;
        Ok(bookings)
    }
}

/* ---------- helpers ---------- */

async fn taken_seats_in(conn: &mut SqliteConnection, show: &ShowKey) -> Result<BTreeSet<SeatId>> {
    let rows: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT seat_id FROM taken_seats
        WHERE movie_id = ? AND hall = ? AND show_time = ?
        "#
    )
    .bind(&show.movie_id)
    .bind(&show.hall)
    .bind(&show.show_time)
    .fetch_all(&mut *conn)
    .await?;

    let mut seats = BTreeSet::new();
    for raw in rows {
        match raw.parse::<SeatId>() {
            Ok(seat) => {
                seats.insert(seat);
            }
            Err(_) => warn!("taken_seats: skipping unknown seat {:?} for {}", raw, show),
        }
    }
    Ok(seats)
}

async fn free_booking_code(
    conn: &mut SqliteConnection,
    mut draw: impl FnMut() -> String,
) -> Result<String> {
    for _ in 0..CODE_ATTEMPTS {
        let code = draw();
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE booking_code = ?)"
        )
        .bind(&code)
        .fetch_one(&mut *conn)
        .await?;
        if !exists {
            return Ok(code);
        }
        warn!("booking code {} already used, drawing another", code);
    }
    Err(BoxOfficeError::BookingCodeExhausted(CODE_ATTEMPTS))
}

async fn latest_by_code(conn: &mut SqliteConnection, code: &str) -> Result<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_code = ? ORDER BY id DESC LIMIT 1"
    ))
    .bind(code)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(booking)
}

async fn booking_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Booking> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"
    ))
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Connection;

    async fn bookings_table(codes: &[&str]) -> SqliteConnection {
        let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
        sqlx::query("CREATE TABLE bookings (id INTEGER PRIMARY KEY, booking_code TEXT NOT NULL)")
            .execute(&mut conn)
            .await
            .unwrap();
        for code in codes {
            sqlx::query("INSERT INTO bookings (booking_code) VALUES (?)")
                .bind(*code)
                .execute(&mut conn)
                .await
                .unwrap();
        }
        conn
    }

    fn draws(codes: &[&'static str]) -> impl FnMut() -> String {
        let mut codes = codes.to_vec().into_iter();
        move || codes.next().unwrap_or("ZZZZZZZZ").to_string()
    }

    #[tokio::test]
    async fn used_code_is_redrawn() {
        let mut conn = bookings_table(&["AAAAAAAA", "BBBBBBBB"]).await;
        let code = free_booking_code(&mut conn, draws(&["AAAAAAAA", "BBBBBBBB", "CCCCCCCC"]))
            .await
            .unwrap();
        assert_eq!(code, "CCCCCCCC");
    }

    #[tokio::test]
    async fn every_draw_is_checked() {
        let mut conn = bookings_table(&["AAAAAAAA"]).await;
        let mut drawn = 0;
        let err = free_booking_code(&mut conn, || {
            drawn += 1;
            "AAAAAAAA".to_string()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, BoxOfficeError::BookingCodeExhausted(CODE_ATTEMPTS)));
        assert_eq!(drawn, CODE_ATTEMPTS);
    }

    #[test]
    fn codes_are_eight_uppercase_alphanumerics() {
        for _ in 0..100 {
            let code = generate_booking_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn normalizes_typed_codes() {
        assert_eq!(normalize_code("  ab12cd34 "), "AB12CD34");
    }
}
