//! Local registration and login against the session store.

use anyhow::{Result, bail};
use moviestream_db::{KeyValueStore, SessionStore, UserRecord};

/// Title of the denial dialog.
pub const ACCESS_DENIED_TITLE: &str = "Access Denied";

/// Body of the denial dialog.
pub const ACCESS_DENIED_MESSAGE: &str = "Invalid email or password. Please try again.";

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the logged-in flag is now set.
    Granted,
    /// No account, malformed record, or wrong credentials.
    Denied,
}

/// Stores `user` as the registered account, replacing any previous one.
///
/// Does not log the user in.
///
/// # Errors
///
/// Returns an error if a field is blank or the store cannot be written.
pub fn register<S: KeyValueStore>(store: &SessionStore<S>, user: &UserRecord) -> Result<()> {
    for (field, value) in [
        ("first name", &user.first_name),
        ("last name", &user.last_name),
        ("email", &user.email),
        ("password", &user.password),
    ] {
        if value.trim().is_empty() {
            bail!("{field} is required");
        }
    }
    store.save_user(user)?;
    tracing::debug!(email = %user.email, "user registered");
    Ok(())
}

/// Compares `email` and `password` against the stored registration.
///
/// Absent, malformed, and mismatching records all yield `Denied` without
/// touching the logged-in flag.
///
/// # Errors
///
/// Returns an error only if the store itself fails.
pub fn login<S: KeyValueStore>(
    store: &SessionStore<S>,
    email: &str,
    password: &str,
) -> Result<LoginOutcome> {
    let user = match store.load_user() {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("stored user data unreadable: {e:#}");
            None
        }
    };

    let matches = user.is_some_and(|u| u.email == email && u.password == password);
    if !matches {
        tracing::warn!("login denied");
        return Ok(LoginOutcome::Denied);
    }

    store.set_logged_in()?;
    Ok(LoginOutcome::Granted)
}

/// Fails unless a parseable user record exists and the logged-in flag is set.
///
/// # Errors
///
/// Returns an error describing why access is refused.
pub fn require_session<S: KeyValueStore>(store: &SessionStore<S>) -> Result<UserRecord> {
    let user = match store.load_user() {
        Ok(Some(user)) => user,
        Ok(None) | Err(_) => bail!("not registered; run `moviestream register` first"),
    };
    if !store.is_logged_in()? {
        bail!("not logged in; run `moviestream login` first");
    }
    Ok(user)
}

/// Clears the logged-in flag. The registration is kept.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn logout<S: KeyValueStore>(store: &SessionStore<S>) -> Result<()> {
    store.clear_session()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use moviestream_db::{SqliteKvStore, USER_DATA_KEY, open_in_memory};
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn store() -> SessionStore<SqliteKvStore> {
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
    fn test_register_does_not_log_in() {
        // Arrange
        let store = store();

        // Act
        register(&store, &ada()).unwrap();

        // Assert
        assert_eq!(store.load_user().unwrap(), Some(ada()));
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_register_rejects_blank_fields() {
        // Arrange
        let store = store();
        let user = UserRecord {
            last_name: String::from(" "),
            ..ada()
        };

        // Act
        let err = register(&store, &user).unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "last name is required");
        assert_eq!(store.load_user().unwrap(), None);
    }

    #[test]
    fn test_register_overwrites_previous_account() {
        // Arrange
        let store = store();
        register(&store, &ada()).unwrap();
        let grace = UserRecord {
            first_name: String::from("Grace"),
            email: String::from("grace@example.com"),
            ..ada()
        };

        // Act
        register(&store, &grace).unwrap();

        // Assert
        assert_eq!(store.load_user().unwrap(), Some(grace));
    }

    #[test]
    fn test_login_with_matching_credentials() {
        // Arrange
        let store = store();
        register(&store, &ada()).unwrap();

        // Act
        let outcome = login(&store, "ada@example.com", "engine").unwrap();

        // Assert
        assert_eq!(outcome, LoginOutcome::Granted);
        assert!(store.is_logged_in().unwrap());
    }

    #[test]
    fn test_login_mismatch_leaves_flag_unset() {
        // Arrange
        let store = store();
        register(&store, &ada()).unwrap();

        // Act
        let wrong_password = login(&store, "ada@example.com", "Engine").unwrap();
        let wrong_email = login(&store, "ADA@example.com", "engine").unwrap();

        // Assert
        assert_eq!(wrong_password, LoginOutcome::Denied);
        assert_eq!(wrong_email, LoginOutcome::Denied);
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_login_without_account_is_denied() {
        // Arrange
        let store = store();

        // Act
        let outcome = login(&store, "ada@example.com", "engine").unwrap();

        // Assert
        assert_eq!(outcome, LoginOutcome::Denied);
    }

    #[test]
    fn test_login_with_malformed_record_is_denied() {
        // Arrange
        let kv = SqliteKvStore::new(open_in_memory().unwrap());
        kv.set(USER_DATA_KEY, "{\"email\":").unwrap();
        let store = SessionStore::new(kv);

        // Act
        let outcome = login(&store, "ada@example.com", "engine").unwrap();

        // Assert
        assert_eq!(outcome, LoginOutcome::Denied);
        assert!(!store.is_logged_in().unwrap());
    }

    #[test]
    fn test_denied_login_emits_warning() {
        // Arrange
        let store = store();
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::msg("login denied")),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            login(&store, "nobody@example.com", "x").unwrap();
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_require_session_needs_flag_and_record() {
        // Arrange
        let store = store();

        // Act & Assert: nothing stored
        assert!(require_session(&store).is_err());

        // Act & Assert: registered but not logged in
        register(&store, &ada()).unwrap();
        let err = require_session(&store).unwrap_err();
        assert!(err.to_string().contains("not logged in"));

        // Act & Assert: logged in
        login(&store, "ada@example.com", "engine").unwrap();
        assert_eq!(require_session(&store).unwrap(), ada());
    }

    #[test]
    fn test_require_session_rejects_malformed_record() {
        // Arrange
        let kv = SqliteKvStore::new(open_in_memory().unwrap());
        kv.set(USER_DATA_KEY, "garbage").unwrap();
        let store = SessionStore::new(kv);
        store.set_logged_in().unwrap();

        // Act
        let result = require_session(&store);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_logout_keeps_registration() {
        // Arrange
        let store = store();
        register(&store, &ada()).unwrap();
        login(&store, "ada@example.com", "engine").unwrap();

        // Act
        logout(&store).unwrap();

        // Assert
        assert!(!store.is_logged_in().unwrap());
        assert_eq!(store.load_user().unwrap(), Some(ada()));
    }
}
