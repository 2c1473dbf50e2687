mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{
    CommandErrorPolicy, LogSettings, ServerSettings, SessionSettings, Settings,
};

/// Environment variables are read as `POPSUB_<SECTION>__<KEY>`,
/// e.g. `POPSUB_SERVER__PORT` or `POPSUB_SESSION__IDLE_TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "POPSUB";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server, session and log configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();
    let server = partial.server.as_ref();
    let session = partial.session.as_ref();

    Ok(Settings {
        server: ServerSettings {
            host: server
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        session: SessionSettings {
            idle_timeout_secs: session
                .and_then(|s| s.idle_timeout_secs)
                .or(default.session.idle_timeout_secs),
            command_errors: session
                .and_then(|s| s.command_errors)
                .unwrap_or(default.session.command_errors),
        },
        log: LogSettings {
            level: partial
                .log
                .and_then(|l| l.level)
                .unwrap_or(default.log.level),
        },
    })
}

#[cfg(test)]
mod tests;
