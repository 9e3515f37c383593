//! The identity mirror for the external authentication collaborator.
//!
//! The mirrored profile is kept for the external provider's benefit and is
//! never consulted for authorization decisions; the allow-list handles those.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A mirrored identity-provider profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The provider-assigned user ID.
    pub id: String,
    /// The email on the provider's record.
    pub email: Option<String>,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// A URL to the user's avatar.
    pub profile_image_url: Option<String>,
    /// When the mirror record was first written.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the mirror record was last refreshed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The profile fields supplied when mirroring a provider record.
///
/// The storage backend stamps the timestamps: `created_at` on first insert,
/// `updated_at` on every upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    /// The provider-assigned user ID.
    pub id: String,
    /// The email on the provider's record.
    pub email: Option<String>,
    /// The user's given name.
    pub first_name: Option<String>,
    /// The user's family name.
    pub last_name: Option<String>,
    /// A URL to the user's avatar.
    pub profile_image_url: Option<String>,
}
