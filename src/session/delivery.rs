use tokio::io::AsyncWrite;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, info, warn};

use crate::broker::topic::Delivery;
use crate::session::handler::SharedWriter;

/// Spawns the task that forwards one subscription's messages to the client.
///
/// The task ends once the broker closes the subscription. Write failures are
/// logged and do not stop it.
pub fn spawn_delivery<W>(
    id: &str,
    topic: &str,
    rx: Delivery,
    writer: SharedWriter<W>,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let span = debug_span!("delivery", id, topic);
    tokio::spawn(deliver(rx, writer).instrument(span))
}

async fn deliver<W>(mut rx: Delivery, writer: SharedWriter<W>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = rx.recv().await {
        info!(msg = %msg, "Client received message");

        let mut writer = writer.lock().await;
        writer.write_string(&msg).await;
        if let Err(e) = writer.flush().await {
            warn!(error = %e, "Failed to flush buffer");
        }
    }
    debug!("Topic channel closed");
}
