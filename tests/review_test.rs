// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Review ledger integration tests.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use seaside_booking::storage::KeyValueStore;
use seaside_booking::{
    BookingError, JsonRepository, ManualClock, MemoryStore, Review, ReviewLedger, RoomId, Session,
};
use std::sync::Arc;

// === Helper Functions ===

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap(),
    ))
}

fn open_reviews(store: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> ReviewLedger {
    ReviewLedger::new(Arc::new(JsonRepository::<Review>::new(store)), clock)
}

fn signed_in(email: &str) -> Session {
    let session = Session::restore(Arc::new(MemoryStore::new()));
    session.login(email, "password").unwrap();
    session
}

fn room(id: &str) -> RoomId {
    RoomId::from(id)
}

// === Tests ===

#[test]
fn review_requires_login() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    let session = Session::restore(Arc::new(MemoryStore::new()));

    let result = reviews.add_review(&session, &room("1"), 5, "Great");
    assert_eq!(result, Err(BookingError::NotAuthenticated));
    assert_eq!(reviews.review_count(&room("1")), 0);
}

#[test]
fn review_records_author_and_date() {
    let clock = start_clock();
    let reviews = open_reviews(Arc::new(MemoryStore::new()), clock.clone());
    let session = signed_in("abebe@example.com");

    let review = reviews.add_review(&session, &room("1"), 4, "Lovely view").unwrap();
    assert_eq!(review.user_name, "abebe");
    assert_eq!(review.user_id, session.current().unwrap().id);
    assert_eq!(review.date, Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap());
    assert_eq!(reviews.user_review(&session, &room("1")), Some(review));
}

#[test]
fn second_review_replaces_first() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    let session = signed_in("guest@example.com");

    reviews.add_review(&session, &room("1"), 2, "Noisy").unwrap();
    reviews.add_review(&session, &room("1"), 5, "Better on a second stay").unwrap();

    let room_reviews = reviews.room_reviews(&room("1"));
    assert_eq!(room_reviews.len(), 1);
    assert_eq!(room_reviews[0].rating, 5);
    assert_eq!(room_reviews[0].comment, "Better on a second stay");
    assert_eq!(reviews.list_all().len(), 1);
}

#[test]
fn same_user_can_review_different_rooms() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    let session = signed_in("guest@example.com");

    reviews.add_review(&session, &room("1"), 3, "").unwrap();
    reviews.add_review(&session, &room("2"), 4, "").unwrap();

    assert_eq!(reviews.review_count(&room("1")), 1);
    assert_eq!(reviews.review_count(&room("2")), 1);
    assert_eq!(reviews.list_all().len(), 2);
}

#[test]
fn rating_is_mean_rounded_to_one_decimal() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    for (email, rating) in [("a@x.com", 5), ("b@x.com", 3), ("c@x.com", 4)] {
        reviews
            .add_review(&signed_in(email), &room("3"), rating, "")
            .unwrap();
    }
    assert_eq!(reviews.room_rating(&room("3")), dec!(4.0));

    reviews
        .add_review(&signed_in("d@x.com"), &room("4"), 5, "")
        .unwrap();
    reviews
        .add_review(&signed_in("e@x.com"), &room("4"), 4, "")
        .unwrap();
    reviews
        .add_review(&signed_in("f@x.com"), &room("4"), 4, "")
        .unwrap();
    // 13 / 3 = 4.333...
    assert_eq!(reviews.room_rating(&room("4")), dec!(4.3));
}

#[test]
fn rating_rounds_half_away_from_zero() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    // 4.25 rounds to 4.3
    for (email, rating) in [("a@x.com", 5), ("b@x.com", 4), ("c@x.com", 4), ("d@x.com", 4)] {
        reviews
            .add_review(&signed_in(email), &room("5"), rating, "")
            .unwrap();
    }
    assert_eq!(reviews.room_rating(&room("5")), dec!(4.3));
}

#[test]
fn unreviewed_room_has_zero_rating() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());
    assert_eq!(reviews.room_rating(&room("6")), Decimal::ZERO);
    assert_eq!(reviews.review_count(&room("6")), 0);
    assert!(reviews.room_reviews(&room("6")).is_empty());
}

#[test]
fn out_of_range_ratings_are_clamped() {
    let reviews = open_reviews(Arc::new(MemoryStore::new()), start_clock());

    let high = reviews
        .add_review(&signed_in("a@x.com"), &room("1"), 9, "")
        .unwrap();
    let low = reviews
        .add_review(&signed_in("b@x.com"), &room("1"), -3, "")
        .unwrap();

    assert_eq!(high.rating, 5);
    assert_eq!(low.rating, 1);
}

#[test]
fn room_reviews_are_newest_first() {
    let clock = start_clock();
    let reviews = open_reviews(Arc::new(MemoryStore::new()), clock.clone());

    reviews
        .add_review(&signed_in("first@x.com"), &room("2"), 3, "first")
        .unwrap();
    clock.advance(Duration::hours(1));
    reviews
        .add_review(&signed_in("second@x.com"), &room("2"), 4, "second")
        .unwrap();
    clock.advance(Duration::hours(1));
    reviews
        .add_review(&signed_in("third@x.com"), &room("2"), 5, "third")
        .unwrap();

    let comments: Vec<String> = reviews
        .room_reviews(&room("2"))
        .into_iter()
        .map(|r| r.comment)
        .collect();
    assert_eq!(comments, vec!["third", "second", "first"]);

    let oldest_first: Vec<String> = reviews.list_all().into_iter().map(|r| r.comment).collect();
    assert_eq!(oldest_first, vec!["first", "second", "third"]);
}

#[test]
fn reviews_survive_reopening() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let session = signed_in("guest@example.com");

    let saved = {
        let reviews = open_reviews(Arc::clone(&store), start_clock());
        reviews.add_review(&session, &room("1"), 2, "ok").unwrap();
        reviews.add_review(&session, &room("1"), 4, "better").unwrap();
        reviews.list_all()
    };

    let reopened = open_reviews(store, start_clock());
    assert_eq!(reopened.list_all(), saved);
    assert_eq!(reopened.user_review(&session, &room("1")).unwrap().rating, 4);
}
