//! Login check for the game server
//!
//! The client transforms the password itself before sending it, so the
//! server compares the received bytes against the stored credential as-is.

use crate::accounts::find_credential;
use crate::error::ServiceError;
use crate::store::Store;
use log::debug;
use shared::LoginOutcome;

/// Unknown user and wrong credential both answer [`LoginOutcome::Rejected`].
pub fn login<S: Store>(
    store: &mut S,
    username: &str,
    credential: &[u8],
) -> Result<LoginOutcome, ServiceError> {
    if username.is_empty() || credential.is_empty() {
        return Ok(LoginOutcome::Rejected);
    }

    match find_credential(store, username)? {
        Some((player_id, stored)) if stored == credential => {
            debug!("Player '{}' ({}) logged in", username, player_id);
            Ok(LoginOutcome::Accepted { player_id })
        }
        _ => {
            debug!("Login rejected for '{}'", username);
            Ok(LoginOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::find_account_id;
    use crate::registration::register;
    use crate::sqlite::SqliteStore;
    use crate::testing::{Recording, Unreachable};
    use shared::{hash, RegistrationRequest};

    fn registered(name: &str, password: &str) -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        let request = RegistrationRequest {
            username: name,
            password,
            confirm_password: password,
        };
        assert!(register(&mut store, &request).unwrap().is_accepted());
        store
    }

    #[test]
    fn test_client_hashed_password_accepted() {
        let mut store = registered("alice", "hunter2");
        let id = find_account_id(&mut store, "alice").unwrap().unwrap();

        assert_eq!(
            login(&mut store, "alice", &hash("hunter2")).unwrap(),
            LoginOutcome::Accepted { player_id: id }
        );
    }

    #[test]
    fn test_plaintext_password_rejected() {
        let mut store = registered("alice", "hunter2");
        assert_eq!(
            login(&mut store, "alice", b"hunter2").unwrap(),
            LoginOutcome::Rejected
        );
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_alike() {
        let mut store = registered("alice", "hunter2");
        assert_eq!(
            login(&mut store, "alice", &hash("hunter3")).unwrap(),
            LoginOutcome::Rejected
        );
        assert_eq!(
            login(&mut store, "mallory", &hash("hunter2")).unwrap(),
            LoginOutcome::Rejected
        );
    }

    #[test]
    fn test_blank_login_skips_store() {
        let mut store = Recording::new(registered("alice", "pw"));
        assert_eq!(login(&mut store, "", &hash("pw")).unwrap(), LoginOutcome::Rejected);
        assert_eq!(login(&mut store, "alice", &[]).unwrap(), LoginOutcome::Rejected);
        assert!(store.statements.is_empty());
    }

    #[test]
    fn test_store_failure_is_fault() {
        assert!(login(&mut Unreachable, "alice", &hash("pw")).is_err());
    }
}
