//! # Game Account Server Library
//!
//! This library provides the account and statistics backend for the 2048-style
//! multiplayer game. It registers players, verifies logins, records finished
//! sessions and reports each player's statistics.
//!
//! ## Core Responsibilities
//!
//! ### Registration
//! Validates a signup form, enforces username uniqueness, derives the stored
//! credential and creates the account together with its `player_data` anchor
//! row.
//!
//! ### Statistics
//! Resolves a username and returns two sections of named values: lifetime
//! (`stats_global`) and last session (`stats_current`). Unknown users are an
//! ordinary "not found" answer.
//!
//! ### Login and Session Recording
//! Compares the client-transformed password against the stored credential and
//! folds finished sessions into the stat tables.
//!
//! ## Architecture Design
//!
//! ### One Request, One Connection
//! Every request is an independent unit of work. It runs on a blocking thread
//! with a store connection of its own, acquired at the start and dropped on
//! every exit path, and is bounded by the configured request timeout.
//!
//! ### Outcomes Versus Faults
//! Business-rule failures (blank fields, mismatched confirmation, taken name,
//! unknown user) are plain return values. Store failures and timeouts are
//! [`error::ServiceError`] faults: they abort the request, are logged in full
//! and answered with a generic message unless detail exposure is enabled.
//!
//! ### Uniqueness in the Schema
//! `users.name` carries a unique index. A signup racing past the existence
//! check is refused by the database and reported as "username taken".
//!
//! ## Module Organization
//!
//! - `store`: query/row contract every service is written against
//! - `sqlite`: SQLite implementation, schema and stat definition seed
//! - `accounts`: username lookups
//! - `registration`, `statistics`, `login`, `session_stats`: the services
//! - `network`: UDP request loop and request dispatch
//! - `config`, `error`: settings and the fault taxonomy
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new(ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Security Considerations
//!
//! ### Credential Storage
//! Stored credentials use the shared byte-shift transform
//! ([`shared::hasher`]). It is reversible and exists only so the native
//! client keeps working; treat the `users` table as holding plaintext.
//!
//! ### Query Construction
//! All user-supplied values are bound parameters. Statement text never
//! contains request data.

pub mod accounts;
pub mod config;
pub mod error;
pub mod login;
pub mod network;
pub mod registration;
pub mod session_stats;
pub mod sqlite;
pub mod statistics;
pub mod store;

#[cfg(test)]
mod testing;
