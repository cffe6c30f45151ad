//! Player signup
//!
//! Validation runs in a fixed order and stops at the first failure:
//! blank fields, then password confirmation, then name availability. Only a
//! request passing all three touches the store with writes, creating the
//! account row and its `player_data` anchor row as one atomic unit.
//!
//! The availability check is kept for its cheap early answer, but the unique
//! index on `users.name` is what actually guarantees uniqueness: a concurrent
//! signup that slips between the check and the insert hits the constraint
//! and is reported as [`RegistrationOutcome::UsernameTaken`] like any other
//! duplicate.

use crate::accounts::find_account_id;
use crate::error::ServiceError;
use crate::store::{Store, StoreError};
use log::{debug, info};
use shared::{transform, RegistrationOutcome, RegistrationRequest, FIXED_SHIFT};

const INSERT_ACCOUNT: &str = "INSERT INTO users (name, passwd) VALUES (?1, ?2)";
const INSERT_PLAYER_DATA: &str = "INSERT INTO player_data (id) VALUES (?1)";

pub fn register<S: Store>(
    store: &mut S,
    request: &RegistrationRequest<'_>,
) -> Result<RegistrationOutcome, ServiceError> {
    if request.username.is_empty() || request.password.is_empty() {
        debug!("Registration rejected: blank credential");
        return Ok(RegistrationOutcome::BlankCredential);
    }

    if request.password != request.confirm_password {
        debug!("Registration of '{}' rejected: confirmation mismatch", request.username);
        return Ok(RegistrationOutcome::ConfirmationMismatch);
    }

    if find_account_id(store, request.username)?.is_some() {
        debug!("Registration of '{}' rejected: name taken", request.username);
        return Ok(RegistrationOutcome::UsernameTaken);
    }

    let credential = transform(request.password.as_bytes(), FIXED_SHIFT)?;

    let created = store.atomically(|store| {
        match store.execute(
            INSERT_ACCOUNT,
            &[request.username.into(), credential.into()],
        ) {
            Ok(_) => {}
            Err(StoreError::Conflict(detail)) => {
                debug!("Lost registration race for '{}': {}", request.username, detail);
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        let player_id = find_account_id(store, request.username)?.ok_or_else(|| {
            StoreError::Decode(format!("account '{}' missing after insert", request.username))
        })?;
        store.execute(INSERT_PLAYER_DATA, &[player_id.into()])?;
        Ok(Some(player_id))
    })?;

    match created {
        Some(player_id) => {
            info!("Registered player '{}' as {}", request.username, player_id);
            Ok(RegistrationOutcome::Accepted)
        }
        None => Ok(RegistrationOutcome::UsernameTaken),
    }
}
