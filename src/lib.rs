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

//! # Seaside Booking
//!
//! This library is the booking core of the Seaside Hotel site: a room cart,
//! date-range availability, a booking ledger with cancellations, and per-room
//! reviews. State is persisted as JSON records in a key-value store; payments
//! and emails go through pluggable, simulated collaborators.
//!
//! ## Core Components
//!
//! - [`Cart`]: Pending room selections, one per room
//! - [`availability`]: Half-open date-range overlap checks against confirmed bookings
//! - [`BookingLedger`]: Booking records, created in checkout batches and cancelled by their owner
//! - [`ReviewLedger`]: One review per user and room, with average ratings
//! - [`Checkout`]: Charges the cart total and turns the cart into bookings
//! - [`Hotel`]: Wires a session, its cart and the ledgers together
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use seaside_booking::{Hotel, MemoryStore, PaymentMethod, RoomId, SimulationConfig, StayDates};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let hotel = Hotel::open(Arc::new(MemoryStore::new()), &SimulationConfig::instant());
//! hotel.login("guest@example.com", "secret").unwrap();
//!
//! let stay = StayDates::new(
//!     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
//! ).unwrap();
//! hotel.add_to_cart(&RoomId::from("4"), stay, 2).unwrap();
//! assert_eq!(hotel.cart_total(), dec!(298));
//!
//! let receipt = hotel
//!     .checkout(&PaymentMethod::Card { token: "tok_visa".into() })
//!     .await
//!     .unwrap();
//! assert_eq!(receipt.bookings.len(), 1);
//! assert!(hotel.cart().is_empty());
//! # });
//! ```
//!
//! ## Thread Safety
//!
//! Ledgers are `Send + Sync`. No parking_lot lock is held across an
//! `.await`: ledger changes are persisted first, then notifications are sent.
//! [`Checkout`] holds an async mutex from its availability re-check through
//! payment to booking.

pub mod admin;
pub mod availability;
mod base;
pub mod booking;
pub mod cart;
pub mod catalog;
pub mod checkout;
mod clock;
pub mod config;
pub mod error;
mod hotel;
pub mod notification;
pub mod payment;
pub mod review;
pub mod session;
pub mod storage;

pub use admin::AdminSummary;
pub use availability::StayDates;
pub use base::{BookingId, ConfirmationNumber, ReviewId, RoomId, UserId};
pub use booking::{Booking, BookingLedger, BookingStatus};
pub use cart::{Cart, CartEntry};
pub use catalog::{Room, RoomCatalog, RoomFilter};
pub use checkout::{Checkout, CheckoutReceipt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SimulationConfig;
pub use error::{BookingError, NotificationError, PaymentError, StorageError};
pub use hotel::Hotel;
pub use notification::{Email, EmailNotifier, Notifier};
pub use payment::{MobileMoneyProvider, PaymentGateway, PaymentMethod, Receipt, SimulatedGateway};
pub use review::{Review, ReviewLedger};
pub use session::{Identity, Role, Session};
pub use storage::{FileStore, JsonRepository, KeyValueStore, MemoryStore, Repository};
