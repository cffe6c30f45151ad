use serde::{Deserialize, Serialize};

pub mod hasher;
pub mod stats;

pub use hasher::{hash, transform, TransformError, FIXED_SHIFT};
pub use stats::{MergePolicy, StatKind};

pub const DEFAULT_PORT: u16 = 8881;
pub const MAX_PACKET_SIZE: usize = 8192;

pub const MSG_BLANK_CREDENTIAL: &str =
    "Registration failed: Neither username nor password can be blank.";
pub const MSG_CONFIRMATION_MISMATCH: &str = "Registration failed: Passwords did not match.";
pub const MSG_USERNAME_TAKEN: &str = "Registration failed: Username already taken.";
pub const MSG_REGISTRATION_OK: &str = "Registration OK: You may now login.";
pub const MSG_QUERY_FAILED: &str = "There was an error running the query";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Packet {
    Register(RegistrationForm),
    Stats(StatsForm),
    Login {
        user: String,
        credential: Vec<u8>,
    },
    /// Session results, accepted only with the player's login credential
    RecordSession {
        user: String,
        credential: Vec<u8>,
        values: Vec<(StatKind, i64)>,
    },

    Registration(RegistrationOutcome),
    StatsResult {
        user: String,
        lookup: StatsLookup,
    },
    LoginResult(LoginOutcome),
    SessionRecorded(SessionOutcome),
    NotSubmitted,
    Fault {
        reason: String,
    },
}

impl Packet {
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Packet::Register(_)
                | Packet::Stats(_)
                | Packet::Login { .. }
                | Packet::RecordSession { .. }
        )
    }
}

/// Signup form as posted by the web page: `user`, `pass`, `cpass`, `submit`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RegistrationForm {
    pub user: String,
    pub pass: String,
    pub cpass: String,
    pub submit: bool,
}

impl RegistrationForm {
    pub fn new(user: &str, pass: &str, cpass: &str) -> Self {
        Self {
            user: user.to_string(),
            pass: pass.to_string(),
            cpass: cpass.to_string(),
            submit: true,
        }
    }

    /// Returns the request only when the form was actually submitted.
    pub fn submitted(&self) -> Option<RegistrationRequest<'_>> {
        self.submit.then(|| RegistrationRequest {
            username: &self.user,
            password: &self.pass,
            confirm_password: &self.cpass,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StatsForm {
    pub user: String,
    pub submit: bool,
}

impl StatsForm {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            submit: true,
        }
    }

    pub fn submitted(&self) -> Option<&str> {
        self.submit.then_some(self.user.as_str())
    }
}

/// Business-rule result of a signup attempt. Never an error.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Accepted,
    BlankCredential,
    ConfirmationMismatch,
    UsernameTaken,
}

impl RegistrationOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationOutcome::Accepted => MSG_REGISTRATION_OK,
            RegistrationOutcome::BlankCredential => MSG_BLANK_CREDENTIAL,
            RegistrationOutcome::ConfirmationMismatch => MSG_CONFIRMATION_MISMATCH,
            RegistrationOutcome::UsernameTaken => MSG_USERNAME_TAKEN,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RegistrationOutcome::Accepted)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub name: String,
    pub value: i64,
}

impl StatEntry {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Lifetime and last-session statistics of one player.
///
/// Both sections are always present; a player without rows in a table gets an
/// empty section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StatsReport {
    pub global: Vec<StatEntry>,
    pub current: Vec<StatEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum StatsLookup {
    Found(StatsReport),
    NotFound,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted { player_id: i64 },
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Recorded { values: usize },
    /// Username and credential did not match an account
    Rejected,
    UnknownPlayer,
}
