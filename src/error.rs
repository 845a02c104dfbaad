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

//! Error types for bookings, reviews, payments, notifications and storage.

use crate::base::RoomId;
use thiserror::Error;

/// Booking and review processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A mutation was attempted without a signed-in identity
    #[error("user must be logged in")]
    NotAuthenticated,

    /// The caller does not own the referenced booking
    #[error("booking belongs to another user")]
    NotOwner,

    /// The operation requires the admin role
    #[error("admin role required")]
    Forbidden,

    /// Checkout or booking with nothing selected
    #[error("cart is empty")]
    EmptyCart,

    /// Check-out is not after check-in
    #[error("check-out must be after check-in")]
    InvalidStay,

    /// Guest count is zero
    #[error("at least one guest is required")]
    InvalidGuests,

    /// Guest count exceeds what the room sleeps
    #[error("room sleeps at most {max} guests")]
    TooManyGuests { max: u32 },

    /// Room ID is not in the catalog
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// Requested dates overlap a confirmed booking
    #[error("room {0} is not available for the selected dates")]
    RoomUnavailable(RoomId),

    #[error("payment failed: {0}")]
    PaymentFailed(#[from] PaymentError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Payment gateway errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// The provider refused the charge; the caller may retry
    #[error("payment {reference} was declined")]
    Declined { reference: String },
}

/// Notification delivery errors. These are logged, never surfaced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("could not deliver message to {recipient}: {reason}")]
    Delivery { recipient: String, reason: String },
}

/// Persistent storage errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage i/o failed for `{key}`: {message}")]
    Io { key: String, message: String },

    #[error("could not encode `{key}`: {message}")]
    Encode { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(BookingError::NotAuthenticated.to_string(), "user must be logged in");
        assert_eq!(BookingError::NotOwner.to_string(), "booking belongs to another user");
        assert_eq!(BookingError::EmptyCart.to_string(), "cart is empty");
        assert_eq!(
            BookingError::InvalidStay.to_string(),
            "check-out must be after check-in"
        );
        assert_eq!(
            BookingError::TooManyGuests { max: 2 }.to_string(),
            "room sleeps at most 2 guests"
        );
        assert_eq!(
            BookingError::RoomUnavailable(RoomId::from("4")).to_string(),
            "room 4 is not available for the selected dates"
        );
    }

    #[test]
    fn payment_errors_convert_into_booking_errors() {
        let declined = PaymentError::Declined {
            reference: "pi_1_abc".into(),
        };
        let error: BookingError = declined.clone().into();
        assert_eq!(error, BookingError::PaymentFailed(declined));
        assert_eq!(error.to_string(), "payment failed: payment pi_1_abc was declined");
    }

    #[test]
    fn storage_errors_are_transparent() {
        let error: BookingError = StorageError::Io {
            key: "bookings".into(),
            message: "disk full".into(),
        }
        .into();
        assert_eq!(error.to_string(), "storage i/o failed for `bookings`: disk full");
    }
}
