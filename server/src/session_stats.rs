//! Writes a finished session's statistics
//!
//! The session values replace the player's `stats_current` rows and are
//! folded into `stats_global` according to each stat's [`MergePolicy`].
//! Max/min stats only merge non-zero values, since zero means "did not
//! happen this session" (no win, no loss). Lifetime sums saturate at
//! `i64::MAX` instead of overflowing.
//!
//! Requests arriving over the network go through [`record_for_login`], which
//! checks the player's credential first; [`record_session`] trusts its
//! `player_id`.

use crate::error::ServiceError;
use crate::login::login;
use crate::store::{Store, StoreError, Value};
use log::{debug, info};
use shared::{LoginOutcome, MergePolicy, SessionOutcome, StatKind};

const FIND_PLAYER: &str = "SELECT id FROM player_data WHERE id = ?1";

const REPLACE_CURRENT: &str = "INSERT INTO stats_current (player_id, stats_id, value)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(player_id, stats_id) DO UPDATE SET value = excluded.value";

const GLOBAL_VALUE: &str =
    "SELECT value FROM stats_global WHERE player_id = ?1 AND stats_id = ?2";

const REPLACE_GLOBAL: &str = "INSERT INTO stats_global (player_id, stats_id, value)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(player_id, stats_id) DO UPDATE SET value = excluded.value";

const MERGE_GLOBAL_MAX: &str = "INSERT INTO stats_global (player_id, stats_id, value)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(player_id, stats_id) DO UPDATE SET value = MAX(value, excluded.value)";

const MERGE_GLOBAL_MIN: &str = "INSERT INTO stats_global (player_id, stats_id, value)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(player_id, stats_id) DO UPDATE SET value = MIN(value, excluded.value)";

/// Records a session for the account matching `username` and `credential`.
pub fn record_for_login<S: Store>(
    store: &mut S,
    username: &str,
    credential: &[u8],
    values: &[(StatKind, i64)],
) -> Result<SessionOutcome, ServiceError> {
    match login(store, username, credential)? {
        LoginOutcome::Accepted { player_id } => record_session(store, player_id, values),
        LoginOutcome::Rejected => {
            debug!("Session for '{}' refused: bad credential", username);
            Ok(SessionOutcome::Rejected)
        }
    }
}

pub fn record_session<S: Store>(
    store: &mut S,
    player_id: i64,
    values: &[(StatKind, i64)],
) -> Result<SessionOutcome, ServiceError> {
    if store.query(FIND_PLAYER, &[player_id.into()])?.is_empty() {
        return Ok(SessionOutcome::UnknownPlayer);
    }

    store.atomically(|store| {
        for &(kind, value) in values {
            let params: [Value; 3] = [player_id.into(), kind.id().into(), value.into()];
            store.execute(REPLACE_CURRENT, &params)?;

            match kind.merge_policy() {
                MergePolicy::Sum => {
                    let total = saturating_total(store, player_id, kind, value)?;
                    let params: [Value; 3] = [player_id.into(), kind.id().into(), total.into()];
                    store.execute(REPLACE_GLOBAL, &params)?;
                }
                MergePolicy::Max if value != 0 => {
                    store.execute(MERGE_GLOBAL_MAX, &params)?;
                }
                MergePolicy::Min if value != 0 => {
                    store.execute(MERGE_GLOBAL_MIN, &params)?;
                }
                _ => {}
            }
        }
        Ok::<_, StoreError>(())
    })?;

    info!("Recorded {} stats for player {}", values.len(), player_id);
    Ok(SessionOutcome::Recorded {
        values: values.len(),
    })
}

fn saturating_total<S: Store>(
    store: &mut S,
    player_id: i64,
    kind: StatKind,
    value: i64,
) -> Result<i64, StoreError> {
    let rows = store.query(GLOBAL_VALUE, &[player_id.into(), kind.id().into()])?;
    match rows.first() {
        Some(row) => Ok(row.get_i64("value")?.saturating_add(value)),
        None => Ok(value),
    }
}
