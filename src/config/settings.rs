use std::num::ParseIntError;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the listener, per-connection sessions and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
}

/// Configuration settings for the server.
///
/// Defines the host and port the server will bind to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Per-connection behaviour.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    /// Close a session that sends no command for this many seconds.
    /// Unset or zero disables the timeout.
    pub idle_timeout_secs: Option<u64>,
    pub command_errors: CommandErrorPolicy,
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// What a session does when a subscribe or unsubscribe is rejected.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommandErrorPolicy {
    /// Drop the connection without telling the client.
    #[default]
    Disconnect,
    /// Send the error text as a frame and keep the session open.
    Report,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub session: Option<PartialSessionSettings>,
    pub log: Option<PartialLogSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialSessionSettings {
    pub idle_timeout_secs: Option<u64>,
    pub command_errors: Option<CommandErrorPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

impl Settings {
    /// Applies the bare `PORT` override. On a parse error the configured
    /// port is left untouched.
    pub fn apply_port_override(&mut self, raw: &str) -> Result<(), ParseIntError> {
        self.server.port = raw.trim().parse()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            session: SessionSettings::default(),
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
