use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::config::PricingConfig;
use crate::error::BoxOfficeError;
use crate::models::seat::{join_seat_list, SeatId};
use crate::models::ShowKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    #[default]
    Regular,
    Student,
    Child,
}

impl TicketType {
    pub const ALL: [TicketType; 3] = [TicketType::Regular, TicketType::Student, TicketType::Child];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Regular => "regular",
            TicketType::Student => "student",
            TicketType::Child => "child",
        }
    }

    pub fn price(&self, pricing: &PricingConfig) -> f64 {
        match self {
            TicketType::Regular => pricing.regular,
            TicketType::Student => pricing.student,
            TicketType::Child => pricing.child,
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = BoxOfficeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Ok(TicketType::Regular),
            "student" => Ok(TicketType::Student),
            "child" => Ok(TicketType::Child),
            _ => Err(BoxOfficeError::InvalidTicketType(s.to_string())),
        }
    }
}

// Строка таблицы bookings. ticket_type и цены nullable - в старых базах
// этих колонок не было, и для старых записей там NULL.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: i64,
    pub booking_code: String,
    pub movie_id: String,
    pub movie_title: String,
    pub hall: String,
    pub show_time: String,
    pub client_name: String,
    pub seats: String,
    pub ticket_type: Option<String>,
    pub price_per_seat: Option<f64>,
    pub total_price: Option<f64>,
    pub is_canceled: bool,
    pub created_at: Option<NaiveDateTime>,
    pub canceled_at: Option<NaiveDateTime>,
}

impl Booking {
    pub fn show_key(&self) -> ShowKey {
        ShowKey::new(&self.movie_id, &self.hall, &self.show_time)
    }
}

/// Запрос на бронирование от кассы. Фильм передаётся названием,
/// как его выбирает кассир.
#[derive(Debug, Clone, Validate)]
pub struct NewBooking {
    pub movie_title: String,
    pub hall: String,
    pub show_time: String,
    #[validate(length(min = 1))]
    pub client_name: String,
    #[validate(length(min = 1))]
    pub seats: Vec<SeatId>,
    pub ticket_type: TicketType,
}

impl NewBooking {
    /// Обрезает пробелы, сортирует и убирает дубли мест.
    pub fn normalized(mut self) -> Self {
        self.movie_title = self.movie_title.trim().to_string();
        self.hall = self.hall.trim().to_string();
        self.show_time = self.show_time.trim().to_string();
        self.client_name = self.client_name.trim().to_string();
        self.seats.sort();
        self.seats.dedup();
        self
    }

    pub fn check(&self) -> Result<(), BoxOfficeError> {
        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            if fields.contains_key("client_name") {
                return Err(BoxOfficeError::MissingClientName);
            }
            if fields.contains_key("seats") {
                return Err(BoxOfficeError::NoSeatsSelected);
            }
        }
        Ok(())
    }

    pub fn seats_column(&self) -> String {
        join_seat_list(&self.seats, ",")
    }
}

/// Округление до центов, чтобы 3 × 9.1 не превращалось в 27.299999.
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(client: &str, seats: &[&str]) -> NewBooking {
        NewBooking {
            movie_title: " Pulp Fiction ".into(),
            hall: "Hall 3".into(),
            show_time: "12:30".into(),
            client_name: client.into(),
            seats: seats.iter().map(|s| s.parse().unwrap()).collect(),
            ticket_type: TicketType::Regular,
        }
    }

    #[test]
    fn normalized_trims_sorts_and_dedups() {
        let req = request("  Ana ", &["A10", "A2", "A2"]).normalized();
        assert_eq!(req.movie_title, "Pulp Fiction");
        assert_eq!(req.client_name, "Ana");
        assert_eq!(req.seats_column(), "A2,A10");
    }

    #[test]
    fn check_reports_missing_name_before_seats() {
        let err = request("   ", &[]).normalized().check().unwrap_err();
        assert!(matches!(err, BoxOfficeError::MissingClientName));

        let err = request("Ana", &[]).normalized().check().unwrap_err();
        assert!(matches!(err, BoxOfficeError::NoSeatsSelected));

        assert!(request("Ana", &["C3"]).normalized().check().is_ok());
    }

    #[test]
    fn ticket_type_parse_and_price() {
        let pricing = PricingConfig::default();
        assert_eq!("Student".parse::<TicketType>().unwrap(), TicketType::Student);
        assert!("vip".parse::<TicketType>().is_err());
        assert_eq!(TicketType::Child.price(&pricing), 7.0);
        assert_eq!(round_price(3.0 * 9.1), 27.3);
    }
}
