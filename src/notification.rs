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

//! Booking notifications.
//!
//! [`EmailNotifier`] stands in for an email service: it composes the message,
//! waits a fixed latency, logs it and keeps it in an outbox.

use crate::booking::Booking;
use crate::error::NotificationError;
use crate::session::Identity;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_booking_confirmation(
        &self,
        booking: &Booking,
        recipient: &Identity,
    ) -> Result<(), NotificationError>;

    async fn send_booking_cancellation(
        &self,
        booking: &Booking,
        recipient: &Identity,
    ) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

const DATE_FORMAT: &str = "%-m/%-d/%Y";

impl Email {
    pub fn booking_confirmation(booking: &Booking, recipient: &Identity) -> Self {
        let body = format!(
            "Dear {name},\n\
             \n\
             Thank you for your booking at Seaside Hotel!\n\
             \n\
             Booking Details:\n\
             - Confirmation Number: {confirmation}\n\
             - Room: {room}\n\
             - Check-in: {check_in}\n\
             - Check-out: {check_out}\n\
             - Guests: {guests}\n\
             - Nights: {nights}\n\
             - Total Amount: ${total}\n\
             \n\
             We look forward to welcoming you!\n\
             \n\
             Best regards,\n\
             Seaside Hotel Team",
            name = recipient.name,
            confirmation = booking.confirmation_number,
            room = booking.room_name,
            check_in = booking.check_in.format(DATE_FORMAT),
            check_out = booking.check_out.format(DATE_FORMAT),
            guests = booking.guests,
            nights = booking.nights,
            total = booking.line_total(),
        );

        Self {
            to: recipient.email.clone(),
            subject: format!("Booking Confirmation - {}", booking.confirmation_number),
            body,
        }
    }

    pub fn booking_cancellation(booking: &Booking, recipient: &Identity) -> Self {
        let body = format!(
            "Dear {name},\n\
             \n\
             Your booking has been cancelled.\n\
             \n\
             Cancelled Booking Details:\n\
             - Confirmation Number: {confirmation}\n\
             - Room: {room}\n\
             - Check-in: {check_in}\n\
             - Check-out: {check_out}\n\
             \n\
             If you have any questions, please contact us.\n\
             \n\
             Best regards,\n\
             Seaside Hotel Team",
            name = recipient.name,
            confirmation = booking.confirmation_number,
            room = booking.room_name,
            check_in = booking.check_in.format(DATE_FORMAT),
            check_out = booking.check_out.format(DATE_FORMAT),
        );

        Self {
            to: recipient.email.clone(),
            subject: format!("Booking Cancelled - {}", booking.confirmation_number),
            body,
        }
    }
}

#[derive(Debug, Default)]
pub struct EmailNotifier {
    latency: Duration,
    outbox: Mutex<Vec<Email>>,
}

impl EmailNotifier {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Every message sent so far, oldest first.
    pub fn sent(&self) -> Vec<Email> {
        self.outbox.lock().clone()
    }

    async fn deliver(&self, email: Email) -> Result<(), NotificationError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        info!(to = %email.to, subject = %email.subject, "email sent");
        self.outbox.lock().push(email);
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_booking_confirmation(
        &self,
        booking: &Booking,
        recipient: &Identity,
    ) -> Result<(), NotificationError> {
        self.deliver(Email::booking_confirmation(booking, recipient))
            .await
    }

    async fn send_booking_cancellation(
        &self,
        booking: &Booking,
        recipient: &Identity,
    ) -> Result<(), NotificationError> {
        self.deliver(Email::booking_cancellation(booking, recipient))
            .await
    }
}
