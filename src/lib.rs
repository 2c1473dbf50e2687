//! # PopSub TCP
//!
//! `popsub-tcp` is a minimalist, in-memory publish/subscribe broker speaking a
//! length-prefixed binary protocol over plain TCP. It is meant for a handful
//! of long-lived, trusted connections.
//!
//! ## Core Modules
//!
//! - `broker`: topic broker, identity registry and the shared session context.
//! - `session`: per-connection command loop and per-subscription delivery tasks.
//! - `transport`: wire framing, command encoding and the TCP listener.
//! - `client`: async client for the wire protocol.
//! - `config`: loading server configuration from files and environment.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod session;
pub mod transport;
pub mod utils;
