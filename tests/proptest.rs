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

//! Property-based tests for availability and the cart.
//!
//! These tests verify invariants that should hold for any set of bookings
//! and any sequence of cart edits.

use chrono::{Days, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use seaside_booking::availability::{available_rooms, is_available, ranges_overlap};
use seaside_booking::{
    Booking, BookingId, BookingStatus, Cart, CartEntry, ConfirmationNumber, RoomId, UserId,
};
use std::collections::HashMap;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn at(offset: u32) -> NaiveDate {
    base() + Days::new(offset.into())
}

/// A non-empty half-open range as day offsets `(start, end)`.
fn arb_range() -> impl Strategy<Value = (u32, u32)> {
    (0u32..60, 1u32..15).prop_map(|(start, len)| (start, start + len))
}

fn arb_room() -> impl Strategy<Value = String> {
    (1u32..=4).prop_map(|n| n.to_string())
}

fn arb_status() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        3 => Just(BookingStatus::Confirmed),
        1 => Just(BookingStatus::Cancelled),
        1 => Just(BookingStatus::Completed),
    ]
}

fn arb_booking() -> impl Strategy<Value = Booking> {
    (arb_room(), arb_range(), arb_status()).prop_map(|(room, (start, end), status)| Booking {
        id: BookingId::generate(),
        user_id: UserId::from("u1"),
        room_id: RoomId::from(room.as_str()),
        room_name: format!("Room {room}"),
        price: Decimal::from(100),
        image: String::new(),
        check_in: at(start),
        check_out: at(end),
        guests: 1,
        nights: end - start,
        status,
        booking_date: Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap(),
        confirmation_number: ConfirmationNumber::from("SH1"),
    })
}

#[derive(Debug, Clone)]
enum CartOp {
    Add { room: String, price: u32, nights: u32 },
    Remove { room: String },
}

fn arb_cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        3 => (arb_room(), 1u32..1000, 1u32..10)
            .prop_map(|(room, price, nights)| CartOp::Add { room, price, nights }),
        1 => arb_room().prop_map(|room| CartOp::Remove { room }),
    ]
}

fn cart_entry(room: &str, price: u32, nights: u32) -> CartEntry {
    CartEntry {
        room_id: RoomId::from(room),
        room_name: format!("Room {room}"),
        price: Decimal::from(price),
        image: String::new(),
        check_in: at(0),
        check_out: at(nights),
        guests: 1,
        nights,
    }
}

// =============================================================================
// Overlap Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Overlap does not depend on argument order.
    #[test]
    fn overlap_is_symmetric((a, b) in arb_range(), (c, d) in arb_range()) {
        prop_assert_eq!(
            ranges_overlap(at(a), at(b), at(c), at(d)),
            ranges_overlap(at(c), at(d), at(a), at(b))
        );
    }

    /// Two ranges overlap exactly when they share a night.
    #[test]
    fn overlap_means_a_shared_night((a, b) in arb_range(), (c, d) in arb_range()) {
        let shared = (a..b).any(|night| (c..d).contains(&night));
        prop_assert_eq!(ranges_overlap(at(a), at(b), at(c), at(d)), shared);
    }

    /// A range always overlaps itself, and never the range starting at its end.
    #[test]
    fn back_to_back_ranges_do_not_overlap((a, b) in arb_range(), len in 1u32..15) {
        prop_assert!(ranges_overlap(at(a), at(b), at(a), at(b)));
        prop_assert!(!ranges_overlap(at(a), at(b), at(b), at(b + len)));
    }
}

// =============================================================================
// Availability Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Availability ignores the order of the booking list.
    #[test]
    fn availability_ignores_booking_order(
        (bookings, shuffled) in prop::collection::vec(arb_booking(), 0..20)
            .prop_flat_map(|bookings| (Just(bookings.clone()), Just(bookings).prop_shuffle())),
        room in arb_room(),
        (start, end) in arb_range(),
    ) {
        let room = RoomId::from(room.as_str());
        prop_assert_eq!(
            is_available(&room, at(start), at(end), &bookings),
            is_available(&room, at(start), at(end), &shuffled)
        );
    }

    /// A room is free exactly when no confirmed booking of it overlaps.
    #[test]
    fn availability_matches_confirmed_overlaps(
        bookings in prop::collection::vec(arb_booking(), 0..20),
        room in arb_room(),
        (start, end) in arb_range(),
    ) {
        let room = RoomId::from(room.as_str());
        let blocked = bookings.iter().any(|b| {
            b.room_id == room
                && b.status == BookingStatus::Confirmed
                && b.check_in < at(end)
                && at(start) < b.check_out
        });
        prop_assert_eq!(is_available(&room, at(start), at(end), &bookings), !blocked);
    }

    /// `available_rooms` is the candidate list filtered by `is_available`.
    #[test]
    fn available_rooms_agrees_with_is_available(
        bookings in prop::collection::vec(arb_booking(), 0..20),
        (start, end) in arb_range(),
    ) {
        let candidates: Vec<RoomId> = ["1", "2", "3", "4"].into_iter().map(RoomId::from).collect();
        let expected: Vec<RoomId> = candidates
            .iter()
            .filter(|room| is_available(room, at(start), at(end), &bookings))
            .cloned()
            .collect();
        prop_assert_eq!(available_rooms(at(start), at(end), &bookings, &candidates), expected);
    }
}

// =============================================================================
// Cart Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// After any edits the cart holds one entry per room, the latest one added,
    /// and its total is the sum of the line totals.
    #[test]
    fn cart_keeps_latest_entry_per_room(ops in prop::collection::vec(arb_cart_op(), 0..40)) {
        let mut cart = Cart::new();
        let mut expected: HashMap<String, (u32, u32)> = HashMap::new();

        for op in ops {
            match op {
                CartOp::Add { room, price, nights } => {
                    cart.add(cart_entry(&room, price, nights));
                    expected.insert(room, (price, nights));
                }
                CartOp::Remove { room } => {
                    cart.remove(&RoomId::from(room.as_str()));
                    expected.remove(&room);
                }
            }
        }

        prop_assert_eq!(cart.count(), expected.len());
        for (room, (price, nights)) in &expected {
            let entry = cart.get(&RoomId::from(room.as_str()));
            prop_assert!(entry.is_some());
            let entry = entry.unwrap();
            prop_assert_eq!(entry.price, Decimal::from(*price));
            prop_assert_eq!(entry.nights, *nights);
        }

        let total: Decimal = expected
            .values()
            .map(|(price, nights)| Decimal::from(*price) * Decimal::from(*nights))
            .sum();
        prop_assert_eq!(cart.total(), total);
    }
}
