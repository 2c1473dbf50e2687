//! The `session` module drives a single client connection.
//!
//! A session registers the client's identifier, executes its commands one at
//! a time against the shared `SessionContext`, and spawns one delivery task
//! per subscription to stream published messages back to the client. When the
//! connection ends for any reason, everything the identifier held is released.

pub mod delivery;
pub mod handler;

pub use delivery::spawn_delivery;
pub use handler::{ClientSession, SharedWriter, handle_connection};
