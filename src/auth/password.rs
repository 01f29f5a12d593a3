//! Password rules and bcrypt hashing.
//!
//! A raw password becomes a [ValidatedPassword] once it passes the rules, and
//! only a [ValidatedPassword] can be hashed into a [PasswordHash].

use std::fmt::Display;

use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum number of characters a password must have.
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub(super) fn is_too_short(raw_password: &str) -> bool {
    raw_password.chars().count() < PASSWORD_MIN_LENGTH
}

/// Digits from any script count, e.g. "١٢٣٤٥٦٧٨" is entirely numeric.
pub(super) fn is_entirely_numeric(raw_password: &str) -> bool {
    !raw_password.is_empty() && raw_password.chars().all(char::is_numeric)
}

/// A password that follows the password rules but has not been hashed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check `raw_password` against the password rules, in order.
    ///
    /// # Errors
    ///
    /// Returns [Error::PasswordTooShort] for fewer than [PASSWORD_MIN_LENGTH]
    /// characters, then [Error::PasswordEntirelyNumeric] for passwords made up
    /// of digits only.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        if is_too_short(raw_password) {
            Err(Error::PasswordTooShort(PASSWORD_MIN_LENGTH))
        } else if is_entirely_numeric(raw_password) {
            Err(Error::PasswordEntirelyNumeric)
        } else {
            Ok(Self(raw_password.to_owned()))
        }
    }

    /// Wrap `raw_password` without checking the rules.
    ///
    /// For callers that have already applied the rules themselves, such as the
    /// registration form, and for test fixtures.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash of a password, as stored in the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost recommended for production use.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// Tests should pass a low cost such as 4 to keep them fast.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for an out of range cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        let hash = bcrypt::hash(password.0, cost)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        Ok(Self(hash))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Validate `raw_password` and hash it.
    ///
    /// # Errors
    ///
    /// Returns the rule error from [ValidatedPassword::new] or the hashing error from [PasswordHash::new].
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password)?, cost)
    }

    /// Whether `raw_password` is the password this hash was made from.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
