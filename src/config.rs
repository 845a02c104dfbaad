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

//! Simulation settings for the stand-in payment gateway and email notifier.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub payment_latency: Duration,
    /// Share of charges declined, `0.0..=1.0`.
    pub payment_failure_rate: f64,
    pub email_latency: Duration,
}

impl SimulationConfig {
    pub const DEFAULT_PAYMENT_LATENCY_MS: u64 = 2000;
    pub const DEFAULT_PAYMENT_FAILURE_RATE: f64 = 0.1;
    pub const DEFAULT_EMAIL_LATENCY_MS: u64 = 500;

    /// No latency and no declined payments.
    pub fn instant() -> Self {
        Self {
            payment_latency: Duration::ZERO,
            payment_failure_rate: 0.0,
            email_latency: Duration::ZERO,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            payment_latency: Duration::from_millis(Self::DEFAULT_PAYMENT_LATENCY_MS),
            payment_failure_rate: Self::DEFAULT_PAYMENT_FAILURE_RATE,
            email_latency: Duration::from_millis(Self::DEFAULT_EMAIL_LATENCY_MS),
        }
    }
}
