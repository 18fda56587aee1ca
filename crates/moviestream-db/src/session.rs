//! Typed session records on top of a `KeyValueStore`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;

/// Key holding the registered user as JSON.
pub const USER_DATA_KEY: &str = "userData";

/// Key holding the logged-in flag.
pub const LOGGED_IN_KEY: &str = "isLoggedIn";

/// Stored value of a set logged-in flag.
const LOGGED_IN_VALUE: &str = "true";

/// The single registered user. Stored as plaintext JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address (login identifier).
    pub email: String,
    /// Password, compared verbatim.
    pub password: String,
}

/// Explicit load/save/clear access to the session keys.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wraps a key-value store.
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Loads the registered user.
    ///
    /// Returns `Ok(None)` when nothing is stored and `Err` when the stored
    /// value is not a valid record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the JSON is malformed.
    pub fn load_user(&self) -> Result<Option<UserRecord>> {
        let Some(raw) = self.kv.get(USER_DATA_KEY)? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw).context("stored user data is malformed")?;
        Ok(Some(user))
    }

    /// Saves the registered user, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_user(&self, user: &UserRecord) -> Result<()> {
        let raw = serde_json::to_string(user).context("failed to serialize user data")?;
        self.kv.set(USER_DATA_KEY, &raw)
    }

    /// Removes the registered user.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear_user(&self) -> Result<()> {
        self.kv.remove(USER_DATA_KEY)
    }

    /// Whether the logged-in flag is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.kv.get(LOGGED_IN_KEY)?.as_deref() == Some(LOGGED_IN_VALUE))
    }

    /// Sets the logged-in flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_logged_in(&self) -> Result<()> {
        self.kv.set(LOGGED_IN_KEY, LOGGED_IN_VALUE)
    }

    /// Clears the logged-in flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear_session(&self) -> Result<()> {
        self.kv.remove(LOGGED_IN_KEY)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::SqliteKvStore;
    use crate::connection::open_in_memory;

    fn session() -> SessionStore<SqliteKvStore> {
        SessionStore::new(SqliteKvStore::new(open_in_memory().unwrap()))
    }

    fn ada() -> UserRecord {
        UserRecord {
            first_name: String::from("Ada"),
            last_name: String::from("Lovelace"),
            email: String::from("ada@example.com"),
            password: String::from("engine"),
        }
    }

    #[test]
    fn test_user_round_trip() {
        // Arrange
        let store = session();

        // Act
        store.save_user(&ada()).unwrap();

        // Assert
        assert_eq!(store.load_user().unwrap(), Some(ada()));
    }

    #[test]
    fn test_user_json_uses_camel_case_keys() {
        // Arrange
        let store = session();

        // Act
        store.save_user(&ada()).unwrap();
        let raw = store.kv.get(USER_DATA_KEY).unwrap().unwrap();

        // Assert
        assert!(raw.contains("\"firstName\":\"Ada\""));
        assert!(raw.contains("\"lastName\":\"Lovelace\""));
    }

    #[test]
    fn test_malformed_user_is_error() {
        // Arrange
        let store = session();
        store.kv.set(USER_DATA_KEY, "not json").unwrap();

        // Act
        let result = store.load_user();

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_clear_user() {
        // Arrange
        let store = session();
        store.save_user(&ada()).unwrap();

        // Act
        store.clear_user().unwrap();

        // Assert
        assert_eq!(store.load_user().unwrap(), None);
    }

    #[test]
    fn test_logged_in_flag() {
        // Arrange
        let store = session();
        assert!(!store.is_logged_in().unwrap());

        // Act
        store.set_logged_in().unwrap();
        let after_set = store.is_logged_in().unwrap();
        store.clear_session().unwrap();

        // Assert
        assert!(after_set);
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_other_flag_values_are_not_logged_in() {
        // Arrange
        let store = session();

        // Act
        store.kv.set(LOGGED_IN_KEY, "false").unwrap();

        // Assert
        assert!(!store.is_logged_in().unwrap());
    }
}
