use std::sync::Arc;

use popsub_tcp::broker::SessionContext;
use popsub_tcp::config::load_config;
use popsub_tcp::transport::server::start_server;
use popsub_tcp::utils::logging;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!(error = %e, "Failed to load configuration");
            return;
        }
    };
    logging::init(&config.log.level);

    if let Ok(raw) = std::env::var("PORT") {
        if let Err(e) = config.apply_port_override(&raw) {
            warn!(
                port = %raw,
                error = %e,
                "Failed to parse PORT, using port {}",
                config.server.port
            );
        }
    }

    let addr = config.listen_addr();
    let ctx = Arc::new(SessionContext::new());

    tokio::select! {
        res = start_server(addr.as_str(), ctx, config.session.clone()) => {
            if let Err(e) = res {
                error!(addr = %addr, error = %e, "Error while starting server");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}
