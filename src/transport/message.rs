use std::fmt;

use tokio::io::AsyncRead;

use crate::transport::framed::{FrameReader, encode_frame};
use crate::utils::error::SessionError;

/// Command codes as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandCode {
    Subscribe = 0,
    Unsubscribe = 1,
    Publish = 2,
}

impl TryFrom<u8> for CommandCode {
    type Error = SessionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CommandCode::Subscribe),
            1 => Ok(CommandCode::Unsubscribe),
            2 => Ok(CommandCode::Publish),
            other => Err(SessionError::UnknownCommand(other)),
        }
    }
}

/// A command sent by a registered client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Subscribe { topic: String },
    Unsubscribe { topic: String },
    Publish { topic: String, payload: String },
}

impl ClientMessage {
    /// Decodes the next command: code byte, topic, and for `Publish` the
    /// payload. An unknown code is reported after its topic was consumed.
    pub async fn read_from<R>(reader: &mut FrameReader<R>) -> Result<Self, SessionError>
    where
        R: AsyncRead + Unpin,
    {
        let code = reader.read_u8().await?;
        let topic = reader.read_string().await?;

        Ok(match CommandCode::try_from(code)? {
            CommandCode::Subscribe => ClientMessage::Subscribe { topic },
            CommandCode::Unsubscribe => ClientMessage::Unsubscribe { topic },
            CommandCode::Publish => {
                let payload = reader.read_string().await?;
                ClientMessage::Publish { topic, payload }
            }
        })
    }

    pub fn code(&self) -> CommandCode {
        match self {
            ClientMessage::Subscribe { .. } => CommandCode::Subscribe,
            ClientMessage::Unsubscribe { .. } => CommandCode::Unsubscribe,
            ClientMessage::Publish { .. } => CommandCode::Publish,
        }
    }

    pub fn topic(&self) -> &str {
        match self {
            ClientMessage::Subscribe { topic }
            | ClientMessage::Unsubscribe { topic }
            | ClientMessage::Publish { topic, .. } => topic,
        }
    }

    /// Wire bytes for this command.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![self.code() as u8];
        encode_frame(self.topic(), &mut buf);
        if let ClientMessage::Publish { payload, .. } = self {
            encode_frame(payload, &mut buf);
        }
        buf
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandCode::Subscribe => "subscribe",
            CommandCode::Unsubscribe => "unsubscribe",
            CommandCode::Publish => "publish",
        };
        f.write_str(name)
    }
}
