//! Concurrent reservations and payments against one store.
//!
//! Overlapping requests must never both win; disjoint requests must all win.
//! Concurrent payments of one booking have exactly one winner.

mod common;

use futures::future::join_all;
use std::collections::BTreeSet;

use ticket_booking::{
    models::{PaymentStatus, SeatLabel},
    Error,
};

fn label(s: &str) -> SeatLabel {
    s.parse().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_pair_has_exactly_one_winner() {
    let app = common::pooled_app(2).await;
    let ledger = app.state.ledger.clone();

    let (first, second) = tokio::join!(
        ledger.reserve(1, "alice", &["A1", "A2"]),
        ledger.reserve(1, "bob", &["A2", "A3"]),
    );

    let (winner_seats, loser) = match (first, second) {
        (Ok(r), Err(e)) => (r.seats, e),
        (Err(e), Ok(r)) => (r.seats, e),
        other => panic!("expected exactly one success, got {other:?}"),
    };
    match loser {
        Error::SeatUnavailable { seats, .. } => assert_eq!(seats, vec![label("A2")]),
        other => panic!("expected SeatUnavailable, got {other:?}"),
    }

    let available = ledger.available_seats(1).await.unwrap();
    assert_eq!(available.len(), 60 - winner_seats.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_racers_for_one_seat_on_a_connection_pool() {
    let app = common::pooled_app(5).await;
    let ledger = app.state.ledger.clone();

    // Everyone wants C5 plus a seat of their own in row D.
    let tasks = (1..=10u16).map(|i| {
        let ledger = ledger.clone();
        tokio::spawn(async move {
            let own = format!("D{i}");
            ledger.reserve(1, &format!("user{i}"), &["C5".to_string(), own]).await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in &results {
        if let Err(e) = result {
            match e {
                Error::SeatUnavailable { seats, .. } => assert_eq!(seats, &vec![label("C5")]),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    // Only the winner's two seats are gone; losers' row-D seats are still free.
    let available = ledger.available_seats(1).await.unwrap();
    assert_eq!(available.len(), 58);
    let grid = ledger.grid(1).await.unwrap();
    let taken: BTreeSet<_> = grid.labels().filter(|l| !available.contains(l)).collect();
    let expected: BTreeSet<_> = winners[0].seats.iter().copied().collect();
    assert_eq!(taken, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_requests_all_succeed() {
    let app = common::pooled_app(5).await;
    let ledger = app.state.ledger.clone();

    let rows = ['A', 'B', 'C', 'D', 'E', 'F'];
    let tasks = rows.into_iter().map(|row| {
        let ledger = ledger.clone();
        let seats: Vec<String> = (1..=10).map(|c| format!("{row}{c}")).collect();
        tokio::spawn(async move { ledger.reserve(2, &format!("user-{row}"), seats.as_slice()).await })
    });

    for joined in join_all(tasks).await {
        let reservation = joined.unwrap().unwrap();
        assert_eq!(reservation.seats.len(), 10);
    }

    assert!(ledger.available_seats(2).await.unwrap().is_empty());
    match ledger.reserve(2, "late", &["A1"]).await {
        Err(Error::SeatUnavailable { seats, .. }) => assert_eq!(seats, vec![label("A1")]),
        other => panic!("expected SeatUnavailable, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_payments_have_one_winner() {
    let app = common::pooled_app(5).await;
    let ledger = app.state.ledger.clone();
    let reservation = ledger.reserve(1, "alice", &["B2"]).await.unwrap();
    let booking_id = reservation.booking_id.to_string();

    let tasks = (0..8).map(|i| {
        let ledger = ledger.clone();
        let booking_id = booking_id.clone();
        let payment_type = if i % 2 == 0 { "Cash" } else { "Card" };
        tokio::spawn(async move { ledger.complete_payment(&booking_id, payment_type).await })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let receipts: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(receipts.len(), 1);
    for result in &results {
        if let Err(e) = result {
            assert!(
                matches!(e, Error::PaymentAlreadyCompleted(id) if *id == booking_id),
                "unexpected error {e:?}"
            );
        }
    }

    let booking = ledger.booking(&booking_id).await.unwrap();
    assert_eq!(booking.payment_status, PaymentStatus::Completed);
    assert_eq!(booking.payment_type, Some(receipts[0].payment_type));
}
