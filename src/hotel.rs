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

//! One guest's view of the hotel: a session, its cart and the shared ledgers.

use crate::admin::AdminSummary;
use crate::availability::StayDates;
use crate::base::{BookingId, RoomId};
use crate::booking::{Booking, BookingLedger};
use crate::cart::{Cart, CartEntry};
use crate::catalog::{Room, RoomCatalog};
use crate::checkout::{Checkout, CheckoutReceipt};
use crate::clock::{Clock, SystemClock};
use crate::config::SimulationConfig;
use crate::error::BookingError;
use crate::notification::{EmailNotifier, Notifier};
use crate::payment::{PaymentGateway, PaymentMethod, SimulatedGateway};
use crate::review::{Review, ReviewLedger};
use crate::session::{Identity, Session};
use crate::storage::{JsonRepository, KeyValueStore};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct Hotel {
    catalog: RoomCatalog,
    session: Session,
    cart: Mutex<Cart>,
    bookings: Arc<BookingLedger>,
    reviews: ReviewLedger,
    checkout: Checkout,
}

impl Hotel {
    /// Opens the hotel over `store` with the simulated gateway and notifier.
    pub fn open(store: Arc<dyn KeyValueStore>, config: &SimulationConfig) -> Self {
        Self::with_collaborators(
            store,
            Arc::new(SystemClock),
            Arc::new(EmailNotifier::new(config.email_latency)),
            Arc::new(SimulatedGateway::new(
                config.payment_latency,
                config.payment_failure_rate,
            )),
        )
    }

    pub fn with_collaborators(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let bookings = Arc::new(BookingLedger::new(
            Arc::new(JsonRepository::<Booking>::new(Arc::clone(&store))),
            notifier,
            Arc::clone(&clock),
        ));
        let reviews = ReviewLedger::new(
            Arc::new(JsonRepository::<Review>::new(Arc::clone(&store))),
            clock,
        );
        Self {
            catalog: RoomCatalog::seaside(),
            session: Session::restore(store),
            cart: Mutex::new(Cart::new()),
            checkout: Checkout::new(Arc::clone(&bookings), gateway),
            bookings,
            reviews,
        }
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn bookings(&self) -> &BookingLedger {
        &self.bookings
    }

    pub fn reviews(&self) -> &ReviewLedger {
        &self.reviews
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Identity, BookingError> {
        self.session.login(email, password)
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<Identity, BookingError> {
        self.session.register(name, email, password)
    }

    /// Signs out and clears the stored bookings.
    pub fn logout(&self) -> Result<(), BookingError> {
        self.session.logout()?;
        self.bookings.clear()?;
        Ok(())
    }

    /// Rooms sleeping at least `guests` that are free for `stay`.
    pub fn search(&self, stay: StayDates, guests: u32) -> Vec<&Room> {
        let candidates: Vec<RoomId> = self
            .catalog
            .rooms()
            .iter()
            .filter(|room| room.max_guests >= guests)
            .map(|room| room.id.clone())
            .collect();
        self.bookings
            .available_rooms(stay.check_in(), stay.check_out(), &candidates)
            .iter()
            .filter_map(|room_id| self.catalog.get(room_id))
            .collect()
    }

    /// Puts `room_id` for `stay` in the cart, replacing any earlier selection
    /// of the same room.
    ///
    /// # Errors
    ///
    /// - [`BookingError::RoomNotFound`] - Unknown room.
    /// - [`BookingError::InvalidGuests`] / [`BookingError::TooManyGuests`] -
    ///   Guest count does not fit the room.
    /// - [`BookingError::RoomUnavailable`] - The dates overlap a confirmed booking.
    pub fn add_to_cart(
        &self,
        room_id: &RoomId,
        stay: StayDates,
        guests: u32,
    ) -> Result<CartEntry, BookingError> {
        let room = self
            .catalog
            .get(room_id)
            .ok_or_else(|| BookingError::RoomNotFound(room_id.clone()))?;
        let entry = CartEntry::for_room(room, stay, guests)?;
        if !self
            .bookings
            .is_available(room_id, stay.check_in(), stay.check_out())
        {
            return Err(BookingError::RoomUnavailable(room_id.clone()));
        }
        self.cart.lock().add(entry.clone());
        Ok(entry)
    }

    pub fn remove_from_cart(&self, room_id: &RoomId) {
        self.cart.lock().remove(room_id);
    }

    pub fn cart(&self) -> Cart {
        self.cart.lock().clone()
    }

    pub fn cart_total(&self) -> Decimal {
        self.cart.lock().total()
    }

    /// Pays for and books the cart. See [`Checkout::submit`].
    ///
    /// The cart is snapshotted before payment. Afterwards only the booked
    /// entries are removed; a room added or changed while the payment was
    /// pending stays in the cart.
    pub async fn checkout(&self, method: &PaymentMethod) -> Result<CheckoutReceipt, BookingError> {
        let snapshot = self.cart();
        let mut pending = snapshot.clone();
        let receipt = self.checkout.submit(&self.session, &mut pending, method).await?;

        let mut cart = self.cart.lock();
        for entry in snapshot.entries() {
            if cart.get(&entry.room_id) == Some(entry) {
                cart.remove(&entry.room_id);
            }
        }
        Ok(receipt)
    }

    pub fn my_bookings(&self) -> Vec<Booking> {
        self.bookings.user_bookings(&self.session)
    }

    pub async fn cancel_booking(&self, booking_id: &BookingId) -> Result<Option<Booking>, BookingError> {
        self.bookings.cancel_booking(&self.session, booking_id).await
    }

    pub fn add_review(&self, room_id: &RoomId, rating: i32, comment: &str) -> Result<Review, BookingError> {
        if self.catalog.get(room_id).is_none() {
            return Err(BookingError::RoomNotFound(room_id.clone()));
        }
        self.reviews.add_review(&self.session, room_id, rating, comment)
    }

    /// Booking totals and revenue. Admins only.
    pub fn admin_summary(&self) -> Result<AdminSummary, BookingError> {
        self.session.require_admin()?;
        Ok(self.bookings.summary())
    }
}
