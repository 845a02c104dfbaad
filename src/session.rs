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

//! Session store.
//!
//! Holds at most one signed-in [`Identity`] and persists it under the
//! `user` key. Any credentials are accepted.

use crate::base::UserId;
use crate::error::{BookingError, StorageError};
use crate::storage::KeyValueStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Storage key of the signed-in identity.
pub const USER_KEY: &str = "user";

/// Signing in with this address grants the admin role.
pub const ADMIN_EMAIL: &str = "admin@seasidehotel.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub struct Session {
    identity: RwLock<Option<Identity>>,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Opens a session, restoring a previously persisted identity.
    ///
    /// A corrupt identity record is removed and the session starts signed out.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let identity = match store.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt identity record");
                    if let Err(e) = store.remove(USER_KEY) {
                        warn!(error = %e, "failed to remove identity record");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read identity record");
                None
            }
        };

        Self {
            identity: RwLock::new(identity),
            store,
        }
    }

    /// Signs in. The display name is the part of the email before `@`.
    pub fn login(&self, email: &str, _password: &str) -> Result<Identity, BookingError> {
        let name = email.split('@').next().unwrap_or(email).to_owned();
        let role = if email == ADMIN_EMAIL {
            Role::Admin
        } else {
            Role::User
        };
        self.sign_in(Identity {
            id: UserId::generate(),
            email: email.to_owned(),
            name,
            role,
        })
    }

    /// Creates an account and signs in. Registered users never get the admin role.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<Identity, BookingError> {
        self.sign_in(Identity {
            id: UserId::generate(),
            email: email.to_owned(),
            name: name.to_owned(),
            role: Role::User,
        })
    }

    fn sign_in(&self, identity: Identity) -> Result<Identity, BookingError> {
        let json = serde_json::to_string(&identity).map_err(|e| StorageError::Encode {
            key: USER_KEY.to_owned(),
            message: e.to_string(),
        })?;
        self.store.set(USER_KEY, &json)?;
        info!(user = %identity.id, role = ?identity.role, "signed in");
        *self.identity.write() = Some(identity.clone());
        Ok(identity)
    }

    /// Signs out and forgets the persisted identity.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.remove(USER_KEY)?;
        if let Some(identity) = self.identity.write().take() {
            info!(user = %identity.id, "signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Returns the signed-in identity or [`BookingError::NotAuthenticated`].
    pub fn require_identity(&self) -> Result<Identity, BookingError> {
        self.current().ok_or(BookingError::NotAuthenticated)
    }

    /// Like [`Session::require_identity`], additionally requiring the admin role.
    pub fn require_admin(&self) -> Result<Identity, BookingError> {
        let identity = self.require_identity()?;
        if !identity.is_admin() {
            return Err(BookingError::Forbidden);
        }
        Ok(identity)
    }
}
