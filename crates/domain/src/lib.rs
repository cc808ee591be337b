//! `rz-domain` — types shared by every razor-client crate.
//!
//! - [`error`]: the single error enum every layer returns.
//! - [`config`]: raw (file / CLI) configuration and its resolution into
//!   the host/port pair a client needs.
//! - [`trace`]: structured trace events emitted through `tracing`.

pub mod config;
pub mod error;
pub mod trace;
