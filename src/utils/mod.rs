//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `popsub-tcp` broker.
//!
//! It centralizes the error types shared by the broker, the wire codec and
//! the session loop, plus the logging bootstrap used by the binary.

pub mod error;
pub mod logging;
