use std::io;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::broker::SessionContext;
use crate::config::SessionSettings;
use crate::session::handle_connection;

/// Binds `addr` and serves connections until accepting becomes impossible.
pub async fn start_server<A: ToSocketAddrs>(
    addr: A,
    ctx: Arc<SessionContext>,
    settings: SessionSettings,
) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, ctx, settings).await
}

/// Accept loop over an already bound listener. Each connection gets its own
/// task; a failed accept is logged and the loop carries on.
pub async fn serve(
    listener: TcpListener,
    ctx: Arc<SessionContext>,
    settings: SessionSettings,
) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "Listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        info!(%peer, "Connection received");

        let span = info_span!("connection", %peer, conn = %Uuid::new_v4());
        tokio::spawn(handle_connection(stream, ctx.clone(), settings.clone()).instrument(span));
    }
}
