//! `rz-cli` — the `razor` command-line front end.
//!
//! ```text
//! razor [--url URL | --hostname HOST --port PORT] [--config FILE]
//!       [OPERATION [SEGMENT...] [--name VALUE ...]]
//! ```
//!
//! Operations are whatever the server's manifest provides, so the options
//! after the operation name are not known up front; they are collected
//! generically and passed on as command arguments.

pub mod cli;
pub mod config;
pub mod session;
