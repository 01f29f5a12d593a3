//! The session token stored, encrypted, in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

/// Identifies the logged in user until `expires_at`.
///
/// Serialized as JSON with the expiry as a Unix timestamp in seconds, e.g.
/// `{"user_id":1,"expires_at":1705031640}`.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    /// The user the session belongs to.
    pub user_id: UserID,

    /// When the session ends. Checked on every request, independent of the
    /// cookie's own expiry.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}
