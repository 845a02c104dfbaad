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

//! Checkout: turns the cart into bookings once payment succeeds.

use crate::base::ConfirmationNumber;
use crate::booking::{Booking, BookingLedger};
use crate::cart::Cart;
use crate::error::BookingError;
use crate::payment::{PaymentGateway, PaymentMethod, Receipt};
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub confirmation_number: ConfirmationNumber,
    pub payment: Receipt,
    pub bookings: Vec<Booking>,
}

pub struct Checkout {
    ledger: Arc<BookingLedger>,
    gateway: Arc<dyn PaymentGateway>,
    /// Held from the availability re-check until the bookings are recorded,
    /// across the payment await.
    in_flight: Mutex<()>,
}

impl Checkout {
    pub fn new(ledger: Arc<BookingLedger>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            ledger,
            gateway,
            in_flight: Mutex::new(()),
        }
    }

    /// Charges the cart total and books every cart entry.
    ///
    /// The cart is cleared only when the bookings are recorded; on any error
    /// it is left as it was so the guest can retry. Submissions through one
    /// `Checkout` run one at a time, so a second submission of the same stay
    /// sees the first one's bookings and fails with `RoomUnavailable` before
    /// anything is charged.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotAuthenticated`] - Nobody is signed in.
    /// - [`BookingError::EmptyCart`] - Nothing to book.
    /// - [`BookingError::RoomUnavailable`] - An entry overlaps a confirmed booking.
    /// - [`BookingError::PaymentFailed`] - The charge was declined.
    /// - [`BookingError::Storage`] - Payment went through but the bookings
    ///   could not be persisted.
    pub async fn submit(
        &self,
        session: &Session,
        cart: &mut Cart,
        method: &PaymentMethod,
    ) -> Result<CheckoutReceipt, BookingError> {
        let identity = session.require_identity()?;
        if cart.is_empty() {
            return Err(BookingError::EmptyCart);
        }

        let _in_flight = self.in_flight.lock().await;
        for entry in cart.entries() {
            if !self
                .ledger
                .is_available(&entry.room_id, entry.check_in, entry.check_out)
            {
                return Err(BookingError::RoomUnavailable(entry.room_id.clone()));
            }
        }

        let total = cart.total();
        let payment = self.gateway.charge(total, method).await?;

        let confirmation_number = match self.ledger.add_booking(session, cart.entries()).await {
            Ok(number) => number,
            Err(e) => {
                warn!(payment = %payment.id, error = %e, "payment taken but booking failed");
                return Err(e);
            }
        };
        cart.clear();

        info!(
            user = %identity.id,
            confirmation = %confirmation_number,
            %total,
            "checkout complete"
        );
        Ok(CheckoutReceipt {
            bookings: self.ledger.by_confirmation(&confirmation_number),
            confirmation_number,
            payment,
        })
    }
}
