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

//! Availability checker integration tests.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use seaside_booking::availability::{available_rooms, is_available};
use seaside_booking::{Booking, BookingId, BookingStatus, ConfirmationNumber, RoomId, UserId};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

fn make_booking(room_id: &str, check_in: u32, check_out: u32, status: BookingStatus) -> Booking {
    Booking {
        id: BookingId::generate(),
        user_id: UserId::from("u1"),
        room_id: RoomId::from(room_id),
        room_name: format!("Room {room_id}"),
        price: dec!(100),
        image: String::new(),
        check_in: day(check_in),
        check_out: day(check_out),
        guests: 2,
        nights: check_out - check_in,
        status,
        booking_date: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
        confirmation_number: ConfirmationNumber::from("SH1"),
    }
}

fn room(id: &str) -> RoomId {
    RoomId::from(id)
}

#[test]
fn no_bookings_means_available() {
    assert!(is_available(&room("1"), day(1), day(5), &[]));
}

#[test]
fn exact_same_range_is_unavailable() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(!is_available(&room("1"), day(10), day(13), &bookings));
}

#[test]
fn checkout_on_existing_checkin_is_available() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(is_available(&room("1"), day(7), day(10), &bookings));
}

#[test]
fn checkin_on_existing_checkout_is_available() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(is_available(&room("1"), day(13), day(14), &bookings));
}

#[test]
fn start_inside_existing_is_unavailable() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(!is_available(&room("1"), day(12), day(15), &bookings));
}

#[test]
fn end_inside_existing_is_unavailable() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(!is_available(&room("1"), day(8), day(11), &bookings));
}

#[test]
fn enclosing_existing_is_unavailable() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(!is_available(&room("1"), day(5), day(20), &bookings));
}

#[test]
fn inside_existing_is_unavailable() {
    let bookings = [make_booking("1", 10, 20, BookingStatus::Confirmed)];
    assert!(!is_available(&room("1"), day(12), day(14), &bookings));
}

#[test]
fn other_rooms_do_not_block() {
    let bookings = [make_booking("2", 10, 13, BookingStatus::Confirmed)];
    assert!(is_available(&room("1"), day(10), day(13), &bookings));
}

#[test]
fn cancelled_and_completed_bookings_do_not_block() {
    let bookings = [
        make_booking("1", 10, 13, BookingStatus::Cancelled),
        make_booking("1", 10, 13, BookingStatus::Completed),
    ];
    assert!(is_available(&room("1"), day(10), day(13), &bookings));
}

#[test]
fn available_rooms_filters_candidates_in_order() {
    let bookings = [
        make_booking("2", 10, 13, BookingStatus::Confirmed),
        make_booking("4", 1, 11, BookingStatus::Confirmed),
        make_booking("5", 13, 15, BookingStatus::Confirmed),
    ];
    let candidates: Vec<RoomId> = ["1", "2", "3", "4", "5", "6"].into_iter().map(room).collect();

    let free = available_rooms(day(11), day(13), &bookings, &candidates);
    assert_eq!(free, vec![room("1"), room("3"), room("5"), room("6")]);
}

#[test]
fn available_rooms_with_no_candidates() {
    let bookings = [make_booking("1", 10, 13, BookingStatus::Confirmed)];
    assert!(available_rooms(day(1), day(2), &bookings, &[]).is_empty());
}
