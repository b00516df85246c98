use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BoxOfficeError;

// Геометрия зала: ряды A–H, места 1–12. Одинаковая для всех залов.
pub const ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
pub const NUM_COLUMNS: u8 = 12;

/// Место в сетке зала, например `A5`.
///
/// Порядок - построчный: `A2 < A10 < B1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: u8,
    column: u8,
}

impl SeatId {
    pub fn new(row: char, column: u8) -> Option<Self> {
        let row = ROWS.iter().position(|r| *r == row.to_ascii_uppercase())?;
        if column == 0 || column > NUM_COLUMNS {
            return None;
        }
        Some(SeatId { row: row as u8, column })
    }

    pub fn row(&self) -> char {
        ROWS[self.row as usize]
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    /// Все места зала в построчном порядке.
    pub fn all() -> impl Iterator<Item = SeatId> {
        (0..ROWS.len() as u8)
            .flat_map(|row| (1..=NUM_COLUMNS).map(move |column| SeatId { row, column }))
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.column)
    }
}

impl FromStr for SeatId {
    type Err = BoxOfficeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let row = chars.next().ok_or_else(|| BoxOfficeError::InvalidSeat(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BoxOfficeError::InvalidSeat(s.to_string()));
        }
        let column: u8 = digits.parse().map_err(|_| BoxOfficeError::InvalidSeat(s.to_string()))?;
        SeatId::new(row, column).ok_or_else(|| BoxOfficeError::InvalidSeat(s.to_string()))
    }
}

impl TryFrom<String> for SeatId {
    type Error = BoxOfficeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// Строка `A1,A2` из колонки bookings.seats. Пустые куски пропускаются.
pub fn parse_seat_list(raw: &str) -> Result<Vec<SeatId>, BoxOfficeError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SeatId::from_str)
        .collect()
}

pub fn join_seat_list(seats: &[SeatId], separator: &str) -> String {
    seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitive_and_trimmed() {
        let seat: SeatId = " b7 ".parse().unwrap();
        assert_eq!(seat.row(), 'B');
        assert_eq!(seat.column(), 7);
        assert_eq!(seat.to_string(), "B7");
    }

    #[test]
    fn rejects_outside_grid() {
        for bad in ["", "A", "A0", "A13", "I1", "11", "AA1", "A-1", "A+5", "A999"] {
            assert!(bad.parse::<SeatId>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn orders_row_major() {
        let mut seats = parse_seat_list("B1, A10,A2").unwrap();
        seats.sort();
        assert_eq!(join_seat_list(&seats, ","), "A2,A10,B1");
    }

    #[test]
    fn grid_has_every_seat_once() {
        let all: Vec<SeatId> = SeatId::all().collect();
        assert_eq!(all.len(), ROWS.len() * NUM_COLUMNS as usize);
        assert_eq!(all.first().map(ToString::to_string).as_deref(), Some("A1"));
        assert_eq!(all.last().map(ToString::to_string).as_deref(), Some("H12"));
    }
}
