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

//! The hotel's rooms.

use crate::base::RoomId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub description: String,
    /// Price per night.
    pub price: Decimal,
    pub image: String,
    pub max_guests: u32,
    pub beds: u32,
    pub amenities: Vec<String>,
}

/// Room search criteria. The default matches every room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomFilter {
    pub min_price: Decimal,
    pub max_price: Decimal,
    /// Rooms sleeping more than this are excluded.
    pub max_guests: u32,
    /// Every listed amenity must match one of the room's amenities
    /// (case-insensitive substring).
    pub amenities: Vec<String>,
}

impl Default for RoomFilter {
    fn default() -> Self {
        Self {
            min_price: Decimal::ZERO,
            max_price: dec!(1000),
            max_guests: 10,
            amenities: Vec::new(),
        }
    }
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        if room.price < self.min_price || room.price > self.max_price {
            return false;
        }
        if room.max_guests > self.max_guests {
            return false;
        }
        let room_amenities: Vec<String> =
            room.amenities.iter().map(|a| a.to_lowercase()).collect();
        self.amenities.iter().all(|wanted| {
            let wanted = wanted.to_lowercase();
            room_amenities.iter().any(|have| have.contains(&wanted))
        })
    }
}

#[derive(Debug, Clone)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// The six rooms and suites of Seaside Hotel.
    pub fn seaside() -> Self {
        Self::new(vec![
            room(
                "1",
                "Ocean View Suite",
                "Spacious suite with breathtaking ocean views, private balcony, and luxury amenities.",
                dec!(299),
                "https://images.unsplash.com/photo-1611892440504-42a792e24d32?w=800&h=600&fit=crop",
                4,
                2,
                &["WiFi", "Ocean View", "Balcony", "Mini Bar", "Room Service"],
            ),
            room(
                "2",
                "Deluxe Beachfront Room",
                "Elegant room steps away from the beach with modern comforts and stunning views.",
                dec!(199),
                "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=800&h=600&fit=crop",
                2,
                1,
                &["WiFi", "Beach Access", "Room Service", "TV", "Coffee Maker"],
            ),
            room(
                "3",
                "Presidential Suite",
                "Ultimate luxury experience with panoramic views, private terrace, and premium services.",
                dec!(599),
                "https://images.unsplash.com/photo-1631049307264-da0ec9d70304?w=800&h=600&fit=crop",
                6,
                3,
                &["WiFi", "Private Terrace", "Jacuzzi", "Butler Service", "Wine Cellar"],
            ),
            room(
                "4",
                "Garden View Room",
                "Peaceful room overlooking our lush gardens.",
                dec!(149),
                "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800&h=600&fit=crop",
                2,
                1,
                &["WiFi", "Garden View", "TV", "Coffee Maker"],
            ),
            room(
                "5",
                "Family Suite",
                "Spacious accommodation designed for families with separate living area and multiple bedrooms.",
                dec!(349),
                "https://images.unsplash.com/photo-1618773928121-c32242e63f39?w=800&h=600&fit=crop",
                6,
                3,
                &["WiFi", "Kitchenette", "Living Room", "TV", "Crib Available"],
            ),
            room(
                "6",
                "Penthouse Suite",
                "Exclusive top-floor suite with 360-degree views, private elevator access, and premium amenities.",
                dec!(799),
                "https://images.unsplash.com/photo-1596394516093-501ba68a0ba6?w=800&h=600&fit=crop",
                4,
                2,
                &["WiFi", "Private Elevator", "Rooftop Terrace", "Jacuzzi", "Butler Service"],
            ),
        ])
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == room_id)
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|room| room.id.clone()).collect()
    }

    pub fn filter(&self, filter: &RoomFilter) -> Vec<&Room> {
        self.rooms.iter().filter(|room| filter.matches(room)).collect()
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::seaside()
    }
}

#[allow(clippy::too_many_arguments)]
fn room(
    id: &str,
    name: &str,
    description: &str,
    price: Decimal,
    image: &str,
    max_guests: u32,
    beds: u32,
    amenities: &[&str],
) -> Room {
    Room {
        id: RoomId::from(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price,
        image: image.to_owned(),
        max_guests,
        beds,
        amenities: amenities.iter().map(|a| (*a).to_owned()).collect(),
    }
}
