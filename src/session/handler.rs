//! Per-connection control loop.
//!
//! A session moves through three states:
//! - `Connecting`: read the identifier and claim it in the registry.
//! - `Active`: decode and execute commands strictly in arrival order.
//! - `Closing`: release the identifier and all of its subscriptions, then
//!   close the write side. Runs exactly once, whatever ended the session.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::broker::SessionContext;
use crate::broker::topic::SubscriberId;
use crate::config::{CommandErrorPolicy, SessionSettings};
use crate::session::delivery::spawn_delivery;
use crate::transport::framed::{FrameReader, FrameWriter};
use crate::transport::message::ClientMessage;
use crate::utils::error::{BrokerError, FrameError, SessionError};

/// Write side of a connection, shared by the session and its delivery tasks
/// so frames are never interleaved.
pub type SharedWriter<W> = Arc<Mutex<FrameWriter<W>>>;

/// Runs a session over an accepted TCP stream.
pub async fn handle_connection(
    stream: TcpStream,
    ctx: Arc<SessionContext>,
    settings: SessionSettings,
) {
    let (reader, writer) = stream.into_split();
    ClientSession::new(reader, writer, ctx, settings)
        .run()
        .await;
}

#[derive(Debug)]
enum State {
    Connecting,
    Active(SubscriberId),
    /// Carries the identifier only if this session registered it.
    Closing(Option<SubscriberId>),
}

pub struct ClientSession<R, W> {
    reader: FrameReader<R>,
    writer: SharedWriter<W>,
    ctx: Arc<SessionContext>,
    settings: SessionSettings,
}

impl<R, W> ClientSession<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W, ctx: Arc<SessionContext>, settings: SessionSettings) -> Self {
        Self {
            reader: FrameReader::new(reader),
            writer: Arc::new(Mutex::new(FrameWriter::new(writer))),
            ctx,
            settings,
        }
    }

    pub async fn run(mut self) {
        let mut state = State::Connecting;
        loop {
            state = match state {
                State::Connecting => self.connect().await,
                State::Active(id) => self.serve(id).await,
                State::Closing(id) => {
                    self.close(id).await;
                    return;
                }
            };
        }
    }

    async fn connect(&mut self) -> State {
        let id = match self.reader.read_string().await {
            Ok(id) => id,
            Err(FrameError::EndOfStream) => {
                info!("Client left before sending an ID");
                return State::Closing(None);
            }
            Err(e) => {
                error!(error = %e, "Failed to read ID");
                return State::Closing(None);
            }
        };

        match self.ctx.registry().register(&id) {
            Ok(()) => {
                info!(id = %id, "Client connected");
                State::Active(id)
            }
            Err(e) => {
                error!(id = %id, error = %e, "Failed to register ID");
                self.send_error(e).await;
                State::Closing(None)
            }
        }
    }

    async fn serve(&mut self, id: SubscriberId) -> State {
        loop {
            if let Err(e) = self.process_command(&id).await {
                if e.is_disconnect() {
                    info!(id = %id, "Client disconnected");
                } else {
                    error!(id = %id, error = %e, "Error while processing command");
                }
                return State::Closing(Some(id));
            }
        }
    }

    async fn process_command(&mut self, id: &str) -> Result<(), SessionError> {
        let command = self.next_command().await?;
        debug!(id, command = %command.code(), topic = command.topic(), "Command received");
        let pubsub = self.ctx.pubsub();

        match command {
            ClientMessage::Subscribe { topic } => match pubsub.subscribe(id, &topic).await {
                Ok(rx) => {
                    spawn_delivery(id, &topic, rx, self.writer.clone());
                    info!(id, topic = %topic, "Client subscribed to topic");
                    Ok(())
                }
                Err(e) => self.rejected(id, &topic, e).await,
            },

            ClientMessage::Unsubscribe { topic } => match pubsub.unsubscribe(id, &topic).await {
                Ok(()) => {
                    info!(id, topic = %topic, "Client unsubscribed from topic");
                    Ok(())
                }
                Err(e) => self.rejected(id, &topic, e).await,
            },

            ClientMessage::Publish { topic, payload } => {
                let delivered = pubsub.publish(&topic, &payload).await;
                info!(id, topic = %topic, msg = %payload, delivered, "Client published message to topic");
                Ok(())
            }
        }
    }

    /// Reads the next command, bounded by the idle timeout when one is set.
    async fn next_command(&mut self) -> Result<ClientMessage, SessionError> {
        match self.settings.idle_timeout() {
            Some(limit) => timeout(limit, ClientMessage::read_from(&mut self.reader))
                .await
                .map_err(|_| SessionError::IdleTimeout(limit))?,
            None => ClientMessage::read_from(&mut self.reader).await,
        }
    }

    async fn rejected(&self, id: &str, topic: &str, err: BrokerError) -> Result<(), SessionError> {
        match self.settings.command_errors {
            CommandErrorPolicy::Disconnect => Err(err.into()),
            CommandErrorPolicy::Report => {
                warn!(id, topic, error = %err, "Command rejected");
                self.send_error(err).await;
                Ok(())
            }
        }
    }

    /// Best-effort error frame to the client.
    async fn send_error(&self, err: BrokerError) {
        let mut writer = self.writer.lock().await;
        writer.write_string(&err.to_string()).await;
        if let Err(e) = writer.flush().await {
            error!(error = %e, "Failed to send error message to client");
        }
    }

    async fn close(&mut self, id: Option<SubscriberId>) {
        if let Some(id) = id {
            self.ctx.release(&id).await;
        }
        if let Err(e) = self.writer.lock().await.shutdown().await {
            debug!(error = %e, "Failed to shut down connection");
        }
    }
}
