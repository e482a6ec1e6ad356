//! Users referenced by task assignees.

use serde::{Deserialize, Serialize};

/// A user of the task service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by the user service.
    pub id: String,
    /// Display name (`first_name last_name`).
    pub name: String,
    /// Contact e-mail.
    pub email: String,
}

/// Finds a user by id in a slice.
#[must_use]
pub fn find_user<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|u| u.id == id)
}
