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

//! Aggregate booking figures for the admin dashboard.

use crate::booking::{Booking, BookingStatus};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_bookings: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    /// Sum of `price * nights` over confirmed bookings.
    pub revenue: Decimal,
}

impl AdminSummary {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        bookings.iter().fold(
            Self {
                total_bookings: bookings.len(),
                ..Self::default()
            },
            |mut summary, booking| {
                match booking.status {
                    BookingStatus::Confirmed => {
                        summary.confirmed += 1;
                        summary.revenue += booking.line_total();
                    }
                    BookingStatus::Cancelled => summary.cancelled += 1,
                    BookingStatus::Completed => {}
                }
                summary
            },
        )
    }
}
