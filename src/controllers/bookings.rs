use crate::controllers::ShowArgs;
use crate::error::{BoxOfficeError, Result};
use crate::i18n::Lang;
use crate::models::{Booking, NewBooking, SeatId, TicketType};
use crate::services::{ConfirmedBooking, SeatSelection};
use crate::AppState;

/* ---------- SEATS ---------- */

pub async fn seat_map(state: &AppState, lang: Lang, show: &ShowArgs) -> Result<String> {
    let key = state.schedule.resolve_show(&show.movie, &show.hall, &show.time).await?;
    let taken = state.bookings.taken_seats(&key).await?;

    let mut selection = SeatSelection::new();
    selection.set_show(Some(key), taken);

    let m = lang.messages();
    Ok(format!(
        "{}: {} · {}: {} · {}: {}\n{}{}\n",
        m.movie_label,
        show.movie.trim(),
        m.hall_label,
        show.hall.trim(),
        m.time_label,
        show.time.trim(),
        selection.render_grid(),
        m.seat_legend
    ))
}

/* ---------- BOOKINGS ---------- */

/// Бронь одной командой: выбор мест проходит те же проверки, что и в сессии
/// (занятое место выбрать нельзя), затем подтверждение.
pub async fn book(
    state: &AppState,
    lang: Lang,
    show: &ShowArgs,
    client: &str,
    seats: &[String],
    ticket_type: &str,
) -> Result<String> {
    let ticket_type: TicketType = ticket_type.parse()?;
    let key = state.schedule.resolve_show(&show.movie, &show.hall, &show.time).await?;

    let taken = state.bookings.taken_seats(&key).await?;

    let mut selection = SeatSelection::new();
    selection.set_show(Some(key), taken);
    for raw in seats {
        let seat: SeatId = raw.parse()?;
        if !selection.selected().contains(&seat) {
            selection.toggle(seat)?;
        }
    }

    let confirmed = state
        .bookings
        .confirm(NewBooking {
            movie_title: show.movie.clone(),
            hall: show.hall.clone(),
            show_time: show.time.clone(),
            client_name: client.to_string(),
            seats: selection.selected(),
            ticket_type,
        })
        .await?;
    selection.clear();

    Ok(confirmed_text(lang, &confirmed))
}

pub async fn cancel(state: &AppState, lang: Lang, code: &str) -> Result<String> {
    let booking = state.bookings.cancel(code).await?;
    Ok(lang.canceled(&booking))
}

pub async fn lookup(state: &AppState, lang: Lang, code: &str, json: bool) -> Result<String> {
    let booking = state.bookings.find(code).await?;
    if json {
        return serde_json::to_string_pretty(&booking)
            .map_err(|e| BoxOfficeError::Io(std::io::Error::other(e)));
    }
    Ok(booking_details(lang, &booking))
}

/* ---------- formatting ---------- */

pub fn confirmed_text(lang: Lang, confirmed: &ConfirmedBooking) -> String {
    let mut text = lang.booked(&confirmed.booking);
    if let Some(path) = &confirmed.ticket {
        text.push_str(&format!("\nPDF: {}", path.display()));
    }
    text
}

pub fn booking_details(lang: Lang, booking: &Booking) -> String {
    let m = lang.messages();
    let mut out = format!(
        "{}{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n",
        booking.booking_code,
        if booking.is_canceled { " (canceled)" } else { "" },
        m.movie_label,
        booking.movie_title,
        m.hall_label,
        booking.hall,
        m.time_label,
        booking.show_time,
        m.client_summary,
        booking.client_name,
        m.seats_summary,
        booking.seats.replace(',', ", "),
    );
    if let Some(ticket_type) = &booking.ticket_type {
        out.push_str(&format!("{}: {}\n", m.ticket_type_label, ticket_type));
    }
    if let Some(total) = booking.total_price {
        out.push_str(&format!("{}: {:.2}\n", m.total_label, total));
    }
    if let Some(created) = booking.created_at {
        out.push_str(&format!("Created: {}\n", created.format("%Y-%m-%d %H:%M")));
    }
    if let Some(canceled) = booking.canceled_at {
        out.push_str(&format!("Canceled: {}\n", canceled.format("%Y-%m-%d %H:%M")));
    }
    out
}
