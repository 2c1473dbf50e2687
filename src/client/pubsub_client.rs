use std::io;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::transport::framed::{FrameReader, encode_frame};
use crate::transport::message::ClientMessage;
use crate::utils::error::FrameError;

/// A connected, registered broker client.
///
/// Commands are written unbuffered, one `write_all` per command. Anything the
/// server sends back (deliveries, error text) is read with [`recv`].
///
/// [`recv`]: PubSubClient::recv
#[derive(Debug)]
pub struct PubSubClient<R = OwnedReadHalf, W = OwnedWriteHalf> {
    /// Identifier this client registered with.
    pub id: String,
    reader: FrameReader<R>,
    writer: W,
}

impl PubSubClient {
    /// Connects to `addr` and sends `id` as the registration frame.
    pub async fn connect<A: ToSocketAddrs>(addr: A, id: &str) -> io::Result<Self> {
        let (reader, writer) = TcpStream::connect(addr).await?.into_split();
        Self::handshake(reader, writer, id).await
    }
}

impl<R, W> PubSubClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Sends the registration frame over an already open stream.
    ///
    /// The server only answers a registration if it is refused, so success
    /// here means the frame was sent, not that the identifier was accepted.
    pub async fn handshake(reader: R, mut writer: W, id: &str) -> io::Result<Self> {
        let mut frame = Vec::new();
        encode_frame(id, &mut frame);
        writer.write_all(&frame).await?;
        writer.flush().await?;

        Ok(Self {
            id: id.to_string(),
            reader: FrameReader::new(reader),
            writer,
        })
    }

    pub async fn subscribe(&mut self, topic: &str) -> io::Result<()> {
        self.send(&ClientMessage::Subscribe {
            topic: topic.to_string(),
        })
        .await
    }

    pub async fn unsubscribe(&mut self, topic: &str) -> io::Result<()> {
        self.send(&ClientMessage::Unsubscribe {
            topic: topic.to_string(),
        })
        .await
    }

    pub async fn publish(&mut self, topic: &str, payload: &str) -> io::Result<()> {
        self.send(&ClientMessage::Publish {
            topic: topic.to_string(),
            payload: payload.to_string(),
        })
        .await
    }

    /// Waits for the next frame from the server.
    pub async fn recv(&mut self) -> Result<String, FrameError> {
        self.reader.read_string().await
    }

    /// Writes raw bytes, bypassing the command encoder.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await
    }

    async fn send(&mut self, msg: &ClientMessage) -> io::Result<()> {
        self.send_raw(&msg.encode()).await
    }
}
