pub mod booking;
pub mod movie;
pub mod seat;
pub mod show;

pub use booking::{Booking, NewBooking, TicketType};
pub use movie::{make_slug, Movie, MovieShowCount};
pub use seat::SeatId;
pub use show::{Show, ShowKey};
