use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Authenticated principal persisted in the session slot.
///
/// The role label is display-only; access decisions run off `privileges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    email: String,
    role: String,
    privileges: BTreeSet<String>,
}

impl UserIdentity {
    /// Creates a user identity from directory data.
    #[must_use]
    pub fn new<I, S>(
        subject: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        privileges: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            email: email.into(),
            role: role.into(),
            privileges: privileges.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the human-readable role label.
    #[must_use]
    pub fn role(&self) -> &str {
        self.role.as_str()
    }

    /// Returns the raw privilege tokens held by the identity.
    #[must_use]
    pub fn privileges(&self) -> &BTreeSet<String> {
        &self.privileges
    }
}
