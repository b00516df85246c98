mod common;

use box_office::models::{NewBooking, TicketType};
use pretty_assertions::assert_eq;

fn request(title: &str, hall: &str, time: &str, seats: &[&str], ticket_type: TicketType) -> NewBooking {
    NewBooking {
        movie_title: title.into(),
        hall: hall.into(),
        show_time: time.into(),
        client_name: "Walk-in".into(),
        seats: seats.iter().map(|s| s.parse().unwrap()).collect(),
        ticket_type,
    }
}

#[tokio::test]
async fn stats_count_tickets_of_active_bookings_only() {
    let (state, _dir) = common::test_state().await;

    state
        .bookings
        .confirm(request("Pulp Fiction", "Hall 3", "12:30", &["A1", "A2", "A3"], TicketType::Regular))
        .await
        .unwrap();
    state
        .bookings
        .confirm(request("Lost Highway", "Hall 4", "23:30", &["H12"], TicketType::Child))
        .await
        .unwrap();
    let canceled = state
        .bookings
        .confirm(request("Lost Highway", "Hall 4", "19:00", &["B1", "B2"], TicketType::Regular))
        .await
        .unwrap()
        .booking;
    state.bookings.cancel(&canceled.booking_code).await.unwrap();

    let stats = state.stats.by_movie().await.unwrap();
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].title, "Pulp Fiction");
    assert_eq!(stats[0].bookings, 1);
    assert_eq!(stats[0].tickets, 3);
    assert_eq!(stats[0].revenue, 36.0);

    assert_eq!(stats[1].title, "Lost Highway");
    assert_eq!(stats[1].bookings, 1);
    assert_eq!(stats[1].tickets, 1);
    assert_eq!(stats[1].revenue, 7.0);
}

#[tokio::test]
async fn stats_are_empty_without_bookings() {
    let (state, _dir) = common::test_state().await;
    assert!(state.stats.by_movie().await.unwrap().is_empty());
}
