//! User profiles

use crate::document::DocumentId;
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

/// Role that decides which home screen a user lands on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// Manages places, drivers and complaints
    Admin,
    /// Files complaints and looks up places
    #[default]
    Customer,
}

/// Profile stored under `users/{uid}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Principal uid (document key)
    #[serde(skip)]
    pub uid: DocumentId,
    /// Display name
    pub name: String,
    /// Mobile number
    #[serde(default)]
    pub mobile: String,
    /// Sign-in email
    pub email: String,
    /// Role
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl UserProfile {
    /// Whether the profile has administrator rights
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

impl Entity for UserProfile {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &DocumentId {
        &self.uid
    }

    fn set_id(&mut self, id: DocumentId) {
        self.uid = id;
    }
}
