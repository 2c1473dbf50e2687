//! The `error` module defines the error types used within the broker.
//!
//! Errors are layered the same way the system is: `BrokerError` covers the
//! shared state (identity registry and topic broker), `FrameError` covers the
//! length-prefixed wire codec, and `SessionError` is what a connection's
//! command loop terminates with.

use std::io;
use std::string::FromUtf8Error;
use std::time::Duration;

use thiserror::Error;

/// Conflicts reported by the identity registry and the topic broker.
///
/// These are expected, recoverable conditions. The session decides whether
/// they end the connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    #[error("ID in use")]
    IdentifierInUse,

    #[error("Already subscribed")]
    AlreadySubscribed,

    #[error("Not subscribed")]
    NotSubscribed,
}

/// Failures while reading a frame off the wire.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer closed the stream, possibly in the middle of a frame.
    #[error("end of stream")]
    EndOfStream,

    #[error("i/o error: {0}")]
    Io(io::Error),

    #[error("frame is not valid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => FrameError::EndOfStream,
            _ => FrameError::Io(err),
        }
    }
}

/// Reasons a session's command loop stops.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("unknown command {0}")]
    UnknownCommand(u8),

    #[error("no command received within {0:?}")]
    IdleTimeout(Duration),
}

impl SessionError {
    /// True when the peer simply went away; this is logged as a disconnect,
    /// not as an error.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, SessionError::Frame(FrameError::EndOfStream))
    }
}
