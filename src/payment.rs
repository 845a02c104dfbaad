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

//! Payment processing.
//!
//! The booking flow only sees [`PaymentGateway`]. [`SimulatedGateway`] waits a
//! fixed latency and then declines a configurable share of charges at random,
//! regardless of the payment details.

use crate::error::PaymentError;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Currency of every charge.
pub const CURRENCY: &str = "ETB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileMoneyProvider {
    Telebirr,
    MPesa,
    CbeBirr,
}

impl MobileMoneyProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Telebirr => "telebirr",
            Self::MPesa => "m_pesa",
            Self::CbeBirr => "cbe_birr",
        }
    }
}

impl fmt::Display for MobileMoneyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MobileMoneyProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telebirr" => Ok(Self::Telebirr),
            "m_pesa" => Ok(Self::MPesa),
            "cbe_birr" => Ok(Self::CbeBirr),
            other => Err(format!("unknown mobile money provider `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// A tokenized card.
    Card { token: String },
    MobileMoney {
        provider: MobileMoneyProvider,
        phone: String,
    },
}

impl PaymentMethod {
    /// Identifier matching [`available_payment_methods`].
    pub fn id(&self) -> &'static str {
        match self {
            Self::Card { .. } => "card",
            Self::MobileMoney { provider, .. } => provider.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentMethodOption {
    pub id: &'static str,
    pub name: &'static str,
}

/// Payment methods offered at checkout.
pub fn available_payment_methods() -> &'static [PaymentMethodOption] {
    const METHODS: &[PaymentMethodOption] = &[
        PaymentMethodOption {
            id: "card",
            name: "Credit/Debit Card",
        },
        PaymentMethodOption {
            id: "telebirr",
            name: "Telebirr",
        },
        PaymentMethodOption {
            id: "m_pesa",
            name: "M-Pesa",
        },
        PaymentMethodOption {
            id: "cbe_birr",
            name: "CBE Birr",
        },
    ];
    METHODS
}

/// Proof of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` to `method`.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::InvalidAmount`] - `amount` is not positive.
    /// - [`PaymentError::Declined`] - The provider refused the charge.
    async fn charge(
        &self,
        amount: Decimal,
        method: &PaymentMethod,
    ) -> Result<Receipt, PaymentError>;
}

#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedGateway {
    /// `failure_rate` is clamped into `0.0..=1.0`.
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            latency,
            failure_rate,
        }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }
}

fn reference(method: &PaymentMethod) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    let prefix = match method {
        PaymentMethod::Card { .. } => "pi",
        PaymentMethod::MobileMoney { provider, .. } => provider.as_str(),
    };
    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        amount: Decimal,
        method: &PaymentMethod,
    ) -> Result<Receipt, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reference = reference(method);
        let declined = rand::thread_rng().gen_bool(self.failure_rate);
        if declined {
            warn!(%reference, %amount, method = method.id(), "payment declined");
            return Err(PaymentError::Declined { reference });
        }

        info!(%reference, %amount, method = method.id(), "payment succeeded");
        Ok(Receipt {
            id: reference,
            amount,
            currency: CURRENCY.to_owned(),
        })
    }
}
