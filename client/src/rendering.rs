//! Text rendering of server responses

use shared::{LoginOutcome, Packet, SessionOutcome, StatEntry, StatsLookup, StatsReport};
use std::fmt::Write;

const NAME_WIDTH: usize = 24;

pub fn render(packet: &Packet) -> String {
    match packet {
        Packet::Registration(outcome) => outcome.message().to_string(),
        Packet::StatsResult { user, lookup } => match lookup {
            StatsLookup::NotFound => format!("No stats for user {}.", user),
            StatsLookup::Found(report) => render_report(report),
        },
        Packet::LoginResult(LoginOutcome::Accepted { player_id }) => {
            format!("Login OK: player id {}.", player_id)
        }
        Packet::LoginResult(LoginOutcome::Rejected) => {
            "Login failed: Wrong username or password.".to_string()
        }
        Packet::SessionRecorded(SessionOutcome::Recorded { values }) => {
            format!("Session recorded: {} stats saved.", values)
        }
        Packet::SessionRecorded(SessionOutcome::Rejected) => {
            "Session not recorded: Wrong username or password.".to_string()
        }
        Packet::SessionRecorded(SessionOutcome::UnknownPlayer) => {
            "Session not recorded: Unknown player.".to_string()
        }
        Packet::NotSubmitted => String::new(),
        Packet::Fault { reason } => format!("Fatal error: {}", reason),
        request => format!("Unexpected response: {:?}", request),
    }
}

pub fn render_report(report: &StatsReport) -> String {
    let mut out = String::new();
    render_section(&mut out, "Global stats:", &report.global);
    out.push('\n');
    render_section(&mut out, "Stats from last session", &report.current);
    out
}

fn render_section(out: &mut String, title: &str, entries: &[StatEntry]) {
    out.push_str(title);
    out.push('\n');
    for entry in entries {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "  {:<width$} {:>10}",
            entry.name,
            entry.value,
            width = NAME_WIDTH
        );
    }
}
