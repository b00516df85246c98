pub mod booking;
pub mod schedule;
pub mod selection;
pub mod stats;
pub mod tickets;

pub use booking::{BookingService, ConfirmedBooking};
pub use schedule::{AddedMovie, ScheduleService};
pub use selection::{SeatSelection, SeatState};
pub use stats::{MovieStats, StatsService};
pub use tickets::TicketRenderer;
