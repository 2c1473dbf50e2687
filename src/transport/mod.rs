//! The `transport` module is responsible for network communication with
//! clients over plain TCP.
//!
//! It defines the length-prefixed framing, the command encoding used between
//! clients and the server, and the listener that hands each accepted socket
//! to a session.

pub mod framed;
pub mod message;
pub mod server;

#[cfg(test)]
mod tests;
