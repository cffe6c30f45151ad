//! # Game Account Client Library
//!
//! Client side of the account and statistics service. It builds the signup,
//! stats, login and session forms, sends each as a single UDP datagram and
//! waits a bounded time for the server's answer.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - [`network::Client`]: one socket, one server address, one timeout
//! - typed helpers per request that unwrap the expected response
//! - [`network::ClientError`] for transport failures and server faults
//!
//! ### Rendering Module (`rendering`)
//! Turns any response packet into the text shown to the player. Registration
//! outcomes render as their literal messages; stat reports render as a
//! lifetime table followed by a last-session table.
//!
//! ## Credentials
//!
//! Login hashes the password locally with [`shared::hash`] before it leaves the
//! process, matching what registration stores on the server.

pub mod network;
pub mod rendering;
