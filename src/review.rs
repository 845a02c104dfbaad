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

//! Review ledger.
//!
//! Each user holds at most one review per room; submitting again replaces the
//! earlier review. Reviews are indexed by `(user, room)` in a [`DashMap`] so
//! the upsert is a single entry insert.

use crate::base::{ReviewId, RoomId, UserId};
use crate::clock::Clock;
use crate::error::{BookingError, StorageError};
use crate::session::Session;
use crate::storage::{Record, Repository};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl Record for Review {
    const KEY: &'static str = "reviews";
    // Already camelCase with an RFC 3339 `date`.
    type Stored = Review;

    fn to_stored(&self) -> Review {
        self.clone()
    }

    fn from_stored(stored: Review) -> Self {
        stored
    }
}

type ReviewKey = (UserId, RoomId);

pub struct ReviewLedger {
    reviews: DashMap<ReviewKey, Review>,
    /// Serializes upsert-and-save so each save sees every earlier upsert.
    writes: Mutex<()>,
    repository: Arc<dyn Repository<Review>>,
    clock: Arc<dyn Clock>,
}

impl ReviewLedger {
    /// Opens the ledger, loading previously persisted reviews. If the stored
    /// list holds several reviews for one user and room, the last one wins.
    pub fn new(repository: Arc<dyn Repository<Review>>, clock: Arc<dyn Clock>) -> Self {
        let reviews = DashMap::new();
        for review in repository.load() {
            reviews.insert((review.user_id.clone(), review.room_id.clone()), review);
        }
        debug!(count = reviews.len(), "loaded reviews");
        Self {
            reviews,
            writes: Mutex::new(()),
            repository,
            clock,
        }
    }

    /// Adds or replaces the signed-in user's review of `room_id`.
    ///
    /// `rating` is clamped into `1..=5`.
    ///
    /// # Errors
    ///
    /// - [`BookingError::NotAuthenticated`] - Nobody is signed in.
    /// - [`BookingError::Storage`] - The review could not be persisted; the
    ///   previous review, if any, is kept.
    pub fn add_review(
        &self,
        session: &Session,
        room_id: &RoomId,
        rating: i32,
        comment: &str,
    ) -> Result<Review, BookingError> {
        let identity = session.require_identity()?;
        let review = Review {
            id: ReviewId::generate(),
            room_id: room_id.clone(),
            user_id: identity.id.clone(),
            user_name: identity.name.clone(),
            rating: rating.clamp(i32::from(MIN_RATING), i32::from(MAX_RATING)) as u8,
            comment: comment.to_owned(),
            date: self.clock.now(),
        };

        let key = (identity.id, room_id.clone());
        let _guard = self.writes.lock();
        let previous = self.reviews.insert(key.clone(), review.clone());
        if let Err(e) = self.persist() {
            match previous {
                Some(previous) => {
                    self.reviews.insert(key, previous);
                }
                None => {
                    self.reviews.remove(&key);
                }
            }
            return Err(e.into());
        }

        info!(room = %room_id, user = %review.user_id, rating = review.rating, "review saved");
        Ok(review)
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.repository.save(&self.list_all())
    }

    /// Every review, oldest first.
    pub fn list_all(&self) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        reviews.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        reviews
    }

    /// Reviews of `room_id`, newest first.
    pub fn room_reviews(&self, room_id: &RoomId) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|entry| &entry.key().1 == room_id)
            .map(|entry| entry.value().clone())
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        reviews
    }

    /// The signed-in user's review of `room_id`.
    pub fn user_review(&self, session: &Session, room_id: &RoomId) -> Option<Review> {
        let identity = session.current()?;
        self.reviews
            .get(&(identity.id, room_id.clone()))
            .map(|entry| entry.value().clone())
    }

    pub fn review_count(&self, room_id: &RoomId) -> usize {
        self.reviews
            .iter()
            .filter(|entry| &entry.key().1 == room_id)
            .count()
    }

    /// Mean rating of `room_id` rounded to one decimal place, or zero when the
    /// room has no reviews. Check [`ReviewLedger::review_count`] before showing
    /// it.
    pub fn room_rating(&self, room_id: &RoomId) -> Decimal {
        let (sum, count) = self
            .reviews
            .iter()
            .filter(|entry| &entry.key().1 == room_id)
            .fold((0u32, 0u32), |(sum, count), entry| {
                (sum + u32::from(entry.value().rating), count + 1)
            });
        if count == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(sum) / Decimal::from(count))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }
}
