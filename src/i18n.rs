//! Тексты для кассира на двух языках (EN / BG).
//!
//! Доменные ошибки не пробрасываются пользователю как есть - касса
//! показывает их строкой статуса через [`Lang::status`].

use serde::Deserialize;
use std::str::FromStr;

use crate::error::BoxOfficeError;
use crate::models::seat::join_seat_list;
use crate::models::{Booking, TicketType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Bg,
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "bg" => Ok(Lang::Bg),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

pub struct Messages {
    pub app_title: &'static str,
    pub subtitle: &'static str,
    pub movie_label: &'static str,
    pub hall_label: &'static str,
    pub time_label: &'static str,
    pub client_summary: &'static str,
    pub seats_summary: &'static str,
    pub ticket_type_label: &'static str,
    pub total_label: &'static str,
    pub seat_legend: &'static str,

    pub status_missing_name: &'static str,
    pub status_missing_seats: &'static str,
    pub status_booked: &'static str,
    pub status_no_show: &'static str,
    pub status_seat_taken: &'static str,
    pub status_seats_taken: &'static str,
    pub status_invalid_seat: &'static str,
    pub status_invalid_ticket_type: &'static str,
    pub status_movie_not_found: &'static str,
    pub status_booking_not_found: &'static str,
    pub status_already_canceled: &'static str,
    pub status_canceled: &'static str,
    pub status_missing_title: &'static str,
    pub status_missing_hall_time: &'static str,
    pub status_movie_added: &'static str,
    pub status_movie_exists: &'static str,
    pub status_show_added: &'static str,
    pub status_internal_error: &'static str,

    pub stats_title: &'static str,
    pub stats_movie_column: &'static str,
    pub stats_tickets_column: &'static str,
    pub admin_shows_column: &'static str,
}

pub const EN: Messages = Messages {
    app_title: "Cinema Ticket System",
    subtitle: "Cashier desktop · Select movie, hall, time, seats.",
    movie_label: "Movie",
    hall_label: "Hall",
    time_label: "Screening time",
    client_summary: "Client",
    seats_summary: "Seats",
    ticket_type_label: "Ticket type",
    total_label: "Total",
    seat_legend: "[ ] free   [x] selected   [#] taken",

    status_missing_name: "Client name is required.",
    status_missing_seats: "Please select at least one seat.",
    status_booked: "Booking confirmed: {movie} · {hall} · {time}\nClient: {client} | Seats: {seats} | Code: {code}",
    status_no_show: "Select movie, hall and time first.",
    status_seat_taken: "Seat {seat} is already taken.",
    status_seats_taken: "Seats already taken: {seats}. Pick other seats.",
    status_invalid_seat: "Unknown seat: {seat}.",
    status_invalid_ticket_type: "Unknown ticket type: {value}. Use one of: {types}.",
    status_movie_not_found: "Movie not found in DB.",
    status_booking_not_found: "Booking not found.",
    status_already_canceled: "Booking is already canceled.",
    status_canceled: "Booking {code} canceled. Seats released: {seats}",
    status_missing_title: "Enter movie title.",
    status_missing_hall_time: "Hall and time are required.",
    status_movie_added: "Movie added: {title} (id: {id})",
    status_movie_exists: "Movie not added: id {id} already exists.",
    status_show_added: "Showtime added: {title} · {hall} · {time}",
    status_internal_error: "Something went wrong, see the log.",

    stats_title: "Statistics",
    stats_movie_column: "Movie",
    stats_tickets_column: "Tickets",
    admin_shows_column: "Shows",
};

pub const BG: Messages = Messages {
    app_title: "Система за кино билети",
    subtitle: "Касиерски режим · Избери филм, зала, час и места.",
    movie_label: "Филм",
    hall_label: "Зала",
    time_label: "Час на прожекция",
    client_summary: "Клиент",
    seats_summary: "Места",
    ticket_type_label: "Вид билет",
    total_label: "Общо",
    seat_legend: "[ ] свободно   [x] избрано   [#] заето",

    status_missing_name: "Въведи име на клиента.",
    status_missing_seats: "Избери поне едно място.",
    status_booked: "Резервацията е потвърдена: {movie} · {hall} · {time}\nКлиент: {client} | Места: {seats} | Код: {code}",
    status_no_show: "Първо избери филм, зала и час.",
    status_seat_taken: "Място {seat} вече е заето.",
    status_seats_taken: "Вече заети места: {seats}. Избери други.",
    status_invalid_seat: "Непознато място: {seat}.",
    status_invalid_ticket_type: "Непознат вид билет: {value}. Избери от: {types}.",
    status_movie_not_found: "Филмът не е намерен в базата.",
    status_booking_not_found: "Резервацията не е намерена.",
    status_already_canceled: "Резервацията вече е отказана.",
    status_canceled: "Резервация {code} е отказана. Освободени места: {seats}",
    status_missing_title: "Въведи заглавие на филма.",
    status_missing_hall_time: "Залата и часът са задължителни.",
    status_movie_added: "Добавен филм: {title} (id: {id})",
    status_movie_exists: "Филмът не е добавен: id {id} вече съществува.",
    status_show_added: "Добавена прожекция: {title} · {hall} · {time}",
    status_internal_error: "Възникна грешка, виж лога.",

    stats_title: "Статистика",
    stats_movie_column: "Филм",
    stats_tickets_column: "Билети",
    admin_shows_column: "Прожекции",
};

fn fill(template: &str, pairs: &[(&str, &str)]) -> String {
    pairs.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

impl Lang {
    pub fn messages(&self) -> &'static Messages {
        match self {
            Lang::En => &EN,
            Lang::Bg => &BG,
        }
    }

    pub fn booked(&self, booking: &Booking) -> String {
        let seats = booking.seats.replace(',', ", ");
        fill(
            self.messages().status_booked,
            &[
                ("movie", booking.movie_title.as_str()),
                ("hall", booking.hall.as_str()),
                ("time", booking.show_time.as_str()),
                ("client", booking.client_name.as_str()),
                ("seats", seats.as_str()),
                ("code", booking.booking_code.as_str()),
            ],
        )
    }

    pub fn canceled(&self, booking: &Booking) -> String {
        let seats = booking.seats.replace(',', ", ");
        fill(self.messages().status_canceled, &[("code", booking.booking_code.as_str()), ("seats", seats.as_str())])
    }

    pub fn movie_added(&self, title: &str, movie_id: &str) -> String {
        fill(self.messages().status_movie_added, &[("title", title), ("id", movie_id)])
    }

    pub fn movie_exists(&self, movie_id: &str) -> String {
        fill(self.messages().status_movie_exists, &[("id", movie_id)])
    }

    pub fn show_added(&self, title: &str, hall: &str, time: &str) -> String {
        fill(self.messages().status_show_added, &[("title", title), ("hall", hall), ("time", time)])
    }

    /// Строка статуса для ошибки. Инфраструктурные ошибки сводятся
    /// к общему сообщению, подробности - в логе.
    pub fn status(&self, err: &BoxOfficeError) -> String {
        let m = self.messages();
        match err {
            BoxOfficeError::NotFound => m.status_booking_not_found.to_string(),
            BoxOfficeError::AlreadyCanceled => m.status_already_canceled.to_string(),
            BoxOfficeError::MissingClientName => m.status_missing_name.to_string(),
            BoxOfficeError::NoSeatsSelected => m.status_missing_seats.to_string(),
            BoxOfficeError::MissingTitle => m.status_missing_title.to_string(),
            BoxOfficeError::MissingHallOrTime => m.status_missing_hall_time.to_string(),
            BoxOfficeError::MovieNotFound(_) => m.status_movie_not_found.to_string(),
            BoxOfficeError::NoShowSelected => m.status_no_show.to_string(),
            BoxOfficeError::InvalidSeat(seat) => fill(m.status_invalid_seat, &[("seat", seat.trim())]),
            BoxOfficeError::InvalidTicketType(value) => {
                let types = TicketType::ALL.map(|t| t.as_str()).join(", ");
                fill(m.status_invalid_ticket_type, &[("value", value.trim()), ("types", types.as_str())])
            }
            BoxOfficeError::SeatTaken(seat) => fill(m.status_seat_taken, &[("seat", seat.to_string().as_str())]),
            BoxOfficeError::SeatsTaken(seats) => {
                fill(m.status_seats_taken, &[("seats", join_seat_list(seats, ", ").as_str())])
            }
            BoxOfficeError::BookingCodeExhausted(_)
            | BoxOfficeError::Database(_)
            | BoxOfficeError::Migration(_)
            | BoxOfficeError::Pdf(_)
            | BoxOfficeError::Io(_)
            | BoxOfficeError::Config(_) => m.status_internal_error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatId;

    #[test]
    fn parses_language_codes() {
        assert_eq!("BG".parse::<Lang>().unwrap(), Lang::Bg);
        assert_eq!(" en ".parse::<Lang>().unwrap(), Lang::En);
        assert!("de".parse::<Lang>().is_err());
    }

    #[test]
    fn status_texts_follow_language() {
        assert_eq!(Lang::En.status(&BoxOfficeError::MissingClientName), "Client name is required.");
        assert_eq!(Lang::Bg.status(&BoxOfficeError::NoSeatsSelected), "Избери поне едно място.");
    }

    #[test]
    fn seats_taken_lists_every_seat() {
        let seats: Vec<SeatId> = vec!["A1".parse().unwrap(), "A2".parse().unwrap()];
        let text = Lang::En.status(&BoxOfficeError::SeatsTaken(seats));
        assert_eq!(text, "Seats already taken: A1, A2. Pick other seats.");
    }

    #[test]
    fn unknown_ticket_type_lists_valid_ones() {
        let text = Lang::En.status(&BoxOfficeError::InvalidTicketType(" vip ".into()));
        assert_eq!(text, "Unknown ticket type: vip. Use one of: regular, student, child.");
    }

    #[test]
    fn no_placeholder_left_unfilled() {
        let text = Lang::Bg.show_added("Lost Highway", "Hall 4", "19:00");
        assert_eq!(text, "Добавена прожекция: Lost Highway · Hall 4 · 19:00");
        assert!(!text.contains('{'));
    }
}
