use crate::models::SeatId;

// Все ошибки кассы. Доменные варианты показываются кассиру как статус,
// инфраструктурные (БД, PDF, IO) уходят в лог.
#[derive(Debug, thiserror::Error)]
pub enum BoxOfficeError {
    #[error("booking not found")]
    NotFound,
    #[error("booking already canceled")]
    AlreadyCanceled,
    #[error("client name is required")]
    MissingClientName,
    #[error("no seats selected")]
    NoSeatsSelected,
    #[error("movie title is required")]
    MissingTitle,
    #[error("hall and time are required")]
    MissingHallOrTime,
    #[error("movie not found: {0}")]
    MovieNotFound(String),
    #[error("no show selected")]
    NoShowSelected,
    #[error("invalid seat: {0:?}")]
    InvalidSeat(String),
    #[error("unknown ticket type: {0:?}")]
    InvalidTicketType(String),
    #[error("seat {0} is already taken")]
    SeatTaken(SeatId),
    #[error("seats already taken: {}", join_seats(.0))]
    SeatsTaken(Vec<SeatId>),
    #[error("no free booking code after {0} attempts")]
    BookingCodeExhausted(usize),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

fn join_seats(seats: &[SeatId]) -> String {
    seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl From<printpdf::Error> for BoxOfficeError {
    fn from(e: printpdf::Error) -> Self {
        BoxOfficeError::Pdf(e.to_string())
    }
}

pub type Result<T, E = BoxOfficeError> = std::result::Result<T, E>;

impl BoxOfficeError {
    /// Ошибки, которые кассир может исправить сам - их показываем статусом,
    /// остальные идут наверх и в лог.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            BoxOfficeError::BookingCodeExhausted(_)
                | BoxOfficeError::Database(_)
                | BoxOfficeError::Migration(_)
                | BoxOfficeError::Pdf(_)
                | BoxOfficeError::Io(_)
                | BoxOfficeError::Config(_)
        )
    }
}
