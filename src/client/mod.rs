//! The `client` module provides an async client for the broker's wire
//! protocol.
//!
//! It is what the end-to-end tests talk to the server with, and a reference
//! for anyone writing a client in another environment.

pub mod pubsub_client;
pub use pubsub_client::PubSubClient;

#[cfg(test)]
mod tests;
