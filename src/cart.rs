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

//! Cart of pending room selections.
//!
//! The cart holds at most one entry per room; adding a room that is already
//! present replaces its entry.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use seaside_booking::{Cart, CartEntry, RoomId};
//!
//! let mut cart = Cart::new();
//! cart.add(CartEntry {
//!     room_id: RoomId::from("4"),
//!     room_name: "Garden View Room".into(),
//!     price: dec!(149),
//!     image: String::new(),
//!     check_in: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!     check_out: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
//!     guests: 2,
//!     nights: 2,
//! });
//! assert_eq!(cart.total(), dec!(298));
//! ```

use crate::availability::StayDates;
use crate::base::RoomId;
use crate::catalog::Room;
use crate::error::BookingError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One room selection.
///
/// `nights` is expected to equal `check_out - check_in` in days; only
/// [`CartEntry::for_room`] checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub room_id: RoomId,
    pub room_name: String,
    /// Price per night.
    pub price: Decimal,
    pub image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: u32,
}

impl CartEntry {
    /// Builds a selection for `room`, checking the guest count against the
    /// room's capacity.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidGuests`] - No guests.
    /// - [`BookingError::TooManyGuests`] - More guests than the room sleeps.
    pub fn for_room(room: &Room, stay: StayDates, guests: u32) -> Result<Self, BookingError> {
        if guests == 0 {
            return Err(BookingError::InvalidGuests);
        }
        if guests > room.max_guests {
            return Err(BookingError::TooManyGuests {
                max: room.max_guests,
            });
        }

        Ok(Self {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            price: room.price,
            image: room.image.clone(),
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            guests,
            nights: stay.nights(),
        })
    }

    /// `price * nights`.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.nights)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, replacing any entry for the same room.
    pub fn add(&mut self, entry: CartEntry) {
        self.entries.retain(|existing| existing.room_id != entry.room_id);
        self.entries.push(entry);
    }

    /// Drops the entry for `room_id`, if any.
    pub fn remove(&mut self, room_id: &RoomId) {
        self.entries.retain(|entry| &entry.room_id != room_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of `price * nights` over every entry.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| &entry.room_id == room_id)
    }
}
