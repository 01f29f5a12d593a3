//! The state shared by every request handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db::initialize, timezone::get_local_offset};

/// The state of the web server.
///
/// Handlers do not take this directly. Each one declares a smaller state
/// struct with the fields it needs and a [FromRef] impl to extract it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection shared by every request handler.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Set up the app state around `db_connection`, creating any missing tables.
    ///
    /// The cookie key is derived from `cookie_secret`, so sessions survive a
    /// restart as long as the secret stays the same.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a
    /// canonical timezone name, or an SQL error if the tables cannot be created.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the key for signing and encrypting cookies from `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{AppState, create_cookie_key};

    #[test]
    fn same_secret_gives_same_cookie_key() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "hunter2", "Etc/UTC")
            .unwrap();

        assert_eq!(
            state.cookie_key.master(),
            create_cookie_key("hunter2").master()
        );
        assert_ne!(
            state.cookie_key.master(),
            create_cookie_key("hunter3").master()
        );
    }

    #[test]
    fn creates_tables() {
        let state =
            AppState::new(Connection::open_in_memory().unwrap(), "secret", "Etc/UTC").unwrap();

        let connection = state.db_connection.lock().unwrap();
        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                AND name IN ('user', 'category', 'expense', 'budget')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 4);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(
            Connection::open_in_memory().unwrap(),
            "secret",
            "Middle/Earth",
        );

        assert!(matches!(
            result,
            Err(Error::InvalidTimezoneError(timezone)) if timezone == "Middle/Earth"
        ));
    }
}
