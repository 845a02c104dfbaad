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

//! Room availability.
//!
//! Stays are half-open date ranges `[check_in, check_out)`: the check-out day
//! itself is not occupied, so one guest may check in on the day another checks
//! out. Only `confirmed` bookings block a room.

use crate::base::RoomId;
use crate::booking::{Booking, BookingStatus};
use crate::error::BookingError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated stay: `check_out` is strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UncheckedStay")]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedStay {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<UncheckedStay> for StayDates {
    type Error = BookingError;

    fn try_from(stay: UncheckedStay) -> Result<Self, Self::Error> {
        Self::new(stay.check_in, stay.check_out)
    }
}

impl StayDates {
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStay`] unless `check_out > check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidStay);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> u32 {
        // Positive by construction.
        (self.check_out - self.check_in).num_days() as u32
    }

    pub fn overlaps(&self, other: &StayDates) -> bool {
        ranges_overlap(self.check_in, self.check_out, other.check_in, other.check_out)
    }
}

/// `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
pub fn ranges_overlap(a: NaiveDate, b: NaiveDate, c: NaiveDate, d: NaiveDate) -> bool {
    a < d && c < b
}

/// Returns `true` if no confirmed booking for `room_id` overlaps
/// `[check_in, check_out)`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use seaside_booking::{RoomId, availability};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
/// assert!(availability::is_available(&RoomId::from("1"), day(1), day(3), &[]));
/// ```
pub fn is_available(
    room_id: &RoomId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    bookings: &[Booking],
) -> bool {
    !bookings
        .iter()
        .filter(|booking| booking.status == BookingStatus::Confirmed && &booking.room_id == room_id)
        .any(|booking| ranges_overlap(check_in, check_out, booking.check_in, booking.check_out))
}

/// Narrows `candidates` to the rooms free for `[check_in, check_out)`,
/// preserving their order.
pub fn available_rooms(
    check_in: NaiveDate,
    check_out: NaiveDate,
    bookings: &[Booking],
    candidates: &[RoomId],
) -> Vec<RoomId> {
    candidates
        .iter()
        .filter(|room_id| is_available(room_id, check_in, check_out, bookings))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn stay_requires_positive_nights() {
        assert_eq!(StayDates::new(day(5), day(5)), Err(BookingError::InvalidStay));
        assert_eq!(StayDates::new(day(6), day(5)), Err(BookingError::InvalidStay));
        assert_eq!(StayDates::new(day(5), day(8)).unwrap().nights(), 3);
    }

    #[test]
    fn half_open_overlap() {
        // back-to-back
        assert!(!ranges_overlap(day(1), day(3), day(3), day(5)));
        assert!(!ranges_overlap(day(3), day(5), day(1), day(3)));
        // partial, inner, enclosing
        assert!(ranges_overlap(day(1), day(4), day(3), day(5)));
        assert!(ranges_overlap(day(2), day(3), day(1), day(5)));
        assert!(ranges_overlap(day(1), day(9), day(3), day(5)));
    }

    #[test]
    fn stay_overlap_matches_range_rule() {
        let a = StayDates::new(day(1), day(3)).unwrap();
        let b = StayDates::new(day(3), day(4)).unwrap();
        let c = StayDates::new(day(2), day(4)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn deserialized_stay_is_validated() {
        let stay: StayDates =
            serde_json::from_str(r#"{"checkIn":"2025-06-05","checkOut":"2025-06-08"}"#).unwrap();
        assert_eq!(stay.nights(), 3);

        let inverted =
            serde_json::from_str::<StayDates>(r#"{"checkIn":"2025-06-08","checkOut":"2025-06-05"}"#);
        assert!(inverted.is_err());
        let empty =
            serde_json::from_str::<StayDates>(r#"{"checkIn":"2025-06-05","checkOut":"2025-06-05"}"#);
        assert!(empty.is_err());
    }
}
