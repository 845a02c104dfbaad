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

//! Booking ledger.
//!
//! Bookings follow a one-way state machine:
//!
//! ```text
//!  Confirmed ──cancel──► Cancelled
//! ```
//!
//! [`BookingStatus::Completed`] is part of the stored format but no operation
//! produces it.
//!
//! # Notifications
//!
//! Every created or cancelled booking triggers a notification once the ledger
//! change is persisted. Delivery failures are logged and never undo the change.

use crate::admin::AdminSummary;
use crate::availability;
use crate::base::{BookingId, ConfirmationNumber, RoomId, UserId};
use crate::cart::CartEntry;
use crate::clock::Clock;
use crate::error::{BookingError, StorageError};
use crate::notification::Notifier;
use crate::session::{Identity, Session};
use crate::storage::{Record, Repository};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    /// Never produced; kept so stored records carrying it still load.
    Completed,
}

impl BookingStatus {
    /// The status after a cancellation, or `None` if this status cannot be
    /// cancelled.
    pub fn cancel(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Cancelled),
            Self::Cancelled | Self::Completed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub room_name: String,
    /// Price per night.
    pub price: Decimal,
    pub image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: u32,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    pub confirmation_number: ConfirmationNumber,
}

impl Booking {
    fn confirmed(
        entry: &CartEntry,
        user_id: &UserId,
        booking_date: DateTime<Utc>,
        confirmation_number: &ConfirmationNumber,
    ) -> Self {
        Self {
            id: BookingId::generate(),
            user_id: user_id.clone(),
            room_id: entry.room_id.clone(),
            room_name: entry.room_name.clone(),
            price: entry.price,
            image: entry.image.clone(),
            check_in: entry.check_in,
            check_out: entry.check_out,
            guests: entry.guests,
            nights: entry.nights,
            status: BookingStatus::Confirmed,
            booking_date,
            confirmation_number: confirmation_number.clone(),
        }
    }

    /// `price * nights`.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.nights)
    }
}

/// Stored shape of a [`Booking`]: camelCase fields, dates as RFC 3339
/// date-times.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBooking {
    id: BookingId,
    user_id: UserId,
    room_id: RoomId,
    room_name: String,
    price: Decimal,
    image: String,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    guests: u32,
    nights: u32,
    status: BookingStatus,
    booking_date: DateTime<Utc>,
    confirmation_number: ConfirmationNumber,
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Record for Booking {
    const KEY: &'static str = "bookings";
    type Stored = StoredBooking;

    fn to_stored(&self) -> StoredBooking {
        StoredBooking {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            room_id: self.room_id.clone(),
            room_name: self.room_name.clone(),
            price: self.price,
            image: self.image.clone(),
            check_in: midnight_utc(self.check_in),
            check_out: midnight_utc(self.check_out),
            guests: self.guests,
            nights: self.nights,
            status: self.status,
            booking_date: self.booking_date,
            confirmation_number: self.confirmation_number.clone(),
        }
    }

    fn from_stored(stored: StoredBooking) -> Self {
        Self {
            id: stored.id,
            user_id: stored.user_id,
            room_id: stored.room_id,
            room_name: stored.room_name,
            price: stored.price,
            image: stored.image,
            check_in: stored.check_in.date_naive(),
            check_out: stored.check_out.date_naive(),
            guests: stored.guests,
            nights: stored.nights,
            status: stored.status,
            booking_date: stored.booking_date,
            confirmation_number: stored.confirmation_number,
        }
    }
}

/// Issues `SH<milliseconds>` confirmation numbers.
///
/// Numbers are strictly increasing per generator: a batch submitted in the
/// same millisecond as the previous one is stamped one millisecond later.
#[derive(Debug, Default)]
pub struct ConfirmationGenerator {
    last: AtomicI64,
}

impl ConfirmationGenerator {
    pub const PREFIX: &'static str = "SH";

    pub fn new() -> Self {
        Self::default()
    }

    /// Continues after the highest number among `issued`, so a reopened
    /// ledger never reissues a stored confirmation number.
    pub fn resume<'a>(issued: impl IntoIterator<Item = &'a ConfirmationNumber>) -> Self {
        let last = issued
            .into_iter()
            .filter_map(|number| number.as_str().strip_prefix(Self::PREFIX)?.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            last: AtomicI64::new(last),
        }
    }

    pub fn next(&self, now: DateTime<Utc>) -> ConfirmationNumber {
        let millis = now.timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = millis.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return ConfirmationNumber(format!("{}{candidate}", Self::PREFIX)),
                Err(actual) => last = actual,
            }
        }
    }
}

/// Persisted list of every booking across all users.
///
/// # Invariants
///
/// - Bookings created by one call to [`BookingLedger::add_booking`] share one
///   confirmation number.
/// - A booking only ever moves from `Confirmed` to `Cancelled`.
/// - Only the owner or an admin can cancel a booking.
pub struct BookingLedger {
    bookings: RwLock<Vec<Booking>>,
    repository: Arc<dyn Repository<Booking>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    confirmations: ConfirmationGenerator,
}

impl BookingLedger {
    /// Opens the ledger, loading previously persisted bookings.
    pub fn new(
        repository: Arc<dyn Repository<Booking>>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let bookings = repository.load();
        debug!(count = bookings.len(), "loaded bookings");
        let confirmations =
            ConfirmationGenerator::resume(bookings.iter().map(|b| &b.confirmation_number));
        Self {
            bookings: RwLock::new(bookings),
            repository,
            notifier,
            clock,
            confirmations,
        }
    }

    /// Books every entry for the signed-in user under one new confirmation
    /// number.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotAuthenticated`] - Nobody is signed in.
    /// - [`BookingError::EmptyCart`] - `entries` is empty.
    /// - [`BookingError::Storage`] - The new ledger could not be persisted;
    ///   nothing was booked.
    pub async fn add_booking(
        &self,
        session: &Session,
        entries: &[CartEntry],
    ) -> Result<ConfirmationNumber, BookingError> {
        let identity = session.require_identity()?;
        if entries.is_empty() {
            return Err(BookingError::EmptyCart);
        }

        let now = self.clock.now();
        let confirmation_number = self.confirmations.next(now);
        let created: Vec<Booking> = entries
            .iter()
            .map(|entry| Booking::confirmed(entry, &identity.id, now, &confirmation_number))
            .collect();

        {
            let mut bookings = self.bookings.write();
            let mut next = bookings.clone();
            next.extend(created.iter().cloned());
            self.repository.save(&next)?;
            *bookings = next;
        }

        info!(
            user = %identity.id,
            confirmation = %confirmation_number,
            count = created.len(),
            "bookings confirmed"
        );

        for booking in &created {
            if let Err(e) = self
                .notifier
                .send_booking_confirmation(booking, &identity)
                .await
            {
                warn!(booking = %booking.id, error = %e, "failed to send confirmation");
            }
        }

        Ok(confirmation_number)
    }

    /// Cancels a booking.
    ///
    /// Returns the booking as it stands afterwards, or `None` if no booking has
    /// this ID. Cancelling an already cancelled booking changes nothing and
    /// sends no notification.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotAuthenticated`] - Nobody is signed in.
    /// - [`BookingError::NotOwner`] - The caller is neither the owner nor an admin.
    /// - [`BookingError::Storage`] - The change could not be persisted.
    pub async fn cancel_booking(
        &self,
        session: &Session,
        booking_id: &BookingId,
    ) -> Result<Option<Booking>, BookingError> {
        let identity = session.require_identity()?;

        let cancelled = {
            let mut bookings = self.bookings.write();
            let Some(index) = bookings.iter().position(|b| &b.id == booking_id) else {
                debug!(booking = %booking_id, "cancel of unknown booking ignored");
                return Ok(None);
            };

            let booking = &bookings[index];
            if booking.user_id != identity.id && !identity.is_admin() {
                return Err(BookingError::NotOwner);
            }
            let Some(status) = booking.status.cancel() else {
                return Ok(Some(booking.clone()));
            };

            let mut next = bookings.clone();
            next[index].status = status;
            self.repository.save(&next)?;
            *bookings = next;
            bookings[index].clone()
        };

        info!(user = %identity.id, booking = %cancelled.id, "booking cancelled");
        self.notify_cancellation(&cancelled, &identity).await;
        Ok(Some(cancelled))
    }

    async fn notify_cancellation(&self, booking: &Booking, recipient: &Identity) {
        if let Err(e) = self
            .notifier
            .send_booking_cancellation(booking, recipient)
            .await
        {
            warn!(booking = %booking.id, error = %e, "failed to send cancellation");
        }
    }

    /// The signed-in user's bookings, excluding cancelled ones.
    pub fn user_bookings(&self, session: &Session) -> Vec<Booking> {
        let Some(identity) = session.current() else {
            return Vec::new();
        };
        self.bookings
            .read()
            .iter()
            .filter(|b| b.user_id == identity.id && b.status != BookingStatus::Cancelled)
            .cloned()
            .collect()
    }

    /// Every booking in creation order, cancelled ones included.
    pub fn list_all(&self) -> Vec<Booking> {
        self.bookings.read().clone()
    }

    pub fn get(&self, booking_id: &BookingId) -> Option<Booking> {
        self.bookings
            .read()
            .iter()
            .find(|b| &b.id == booking_id)
            .cloned()
    }

    pub fn by_confirmation(&self, confirmation_number: &ConfirmationNumber) -> Vec<Booking> {
        self.bookings
            .read()
            .iter()
            .filter(|b| &b.confirmation_number == confirmation_number)
            .cloned()
            .collect()
    }

    /// Checks `[check_in, check_out)` for `room_id` against the ledger.
    pub fn is_available(&self, room_id: &RoomId, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        availability::is_available(room_id, check_in, check_out, &self.bookings.read())
    }

    /// Rooms among `candidates` free for `[check_in, check_out)`.
    pub fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        candidates: &[RoomId],
    ) -> Vec<RoomId> {
        availability::available_rooms(check_in, check_out, &self.bookings.read(), candidates)
    }

    pub fn summary(&self) -> AdminSummary {
        AdminSummary::from_bookings(&self.bookings.read())
    }

    /// Forgets every booking, in memory and in storage.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut bookings = self.bookings.write();
        self.repository.clear()?;
        bookings.clear();
        Ok(())
    }
}
