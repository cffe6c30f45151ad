//! Per-player statistics report
//!
//! A report has two sections read from two tables with identical shape:
//! `stats_global` (lifetime totals) and `stats_current` (the last session).
//! Each section lists `(name, value)` pairs joined from `stats_definitions`,
//! ordered by definition id so the same player always renders the same way.

use crate::accounts::find_account_id;
use crate::error::ServiceError;
use crate::store::{Store, StoreError};
use log::debug;
use shared::{StatEntry, StatsLookup, StatsReport};

/// Stat value tables. Table names only ever come from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTable {
    Global,
    Current,
}

impl StatTable {
    pub fn table_name(self) -> &'static str {
        match self {
            StatTable::Global => "stats_global",
            StatTable::Current => "stats_current",
        }
    }

    fn section_query(self) -> &'static str {
        match self {
            StatTable::Global => {
                "SELECT sd.name AS name, s.value AS value
                 FROM stats_global AS s
                 JOIN stats_definitions AS sd ON sd.id = s.stats_id
                 WHERE s.player_id = ?1
                 ORDER BY sd.id, sd.name"
            }
            StatTable::Current => {
                "SELECT sd.name AS name, s.value AS value
                 FROM stats_current AS s
                 JOIN stats_definitions AS sd ON sd.id = s.stats_id
                 WHERE s.player_id = ?1
                 ORDER BY sd.id, sd.name"
            }
        }
    }
}

/// Looks up both stat sections for `username`.
///
/// An unknown user is [`StatsLookup::NotFound`], not an error.
pub fn get_stats<S: Store>(store: &mut S, username: &str) -> Result<StatsLookup, ServiceError> {
    let Some(player_id) = find_account_id(store, username)? else {
        debug!("No stats for unknown user '{}'", username);
        return Ok(StatsLookup::NotFound);
    };

    let report = StatsReport {
        global: load_section(store, player_id, StatTable::Global)?,
        current: load_section(store, player_id, StatTable::Current)?,
    };

    debug!(
        "Stats for '{}' ({}): {} global, {} current",
        username,
        player_id,
        report.global.len(),
        report.current.len()
    );
    Ok(StatsLookup::Found(report))
}

pub fn load_section<S: Store>(
    store: &mut S,
    player_id: i64,
    table: StatTable,
) -> Result<Vec<StatEntry>, StoreError> {
    store
        .query(table.section_query(), &[player_id.into()])?
        .iter()
        .map(|row| -> Result<StatEntry, StoreError> {
            Ok(StatEntry {
                name: row.get_text("name")?.to_string(),
                value: row.get_i64("value")?,
            })
        })
        .collect()
}
