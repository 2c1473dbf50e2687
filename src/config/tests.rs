use super::settings::Settings;
use super::{CommandErrorPolicy, load_config};
use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.session.idle_timeout(), None);
    assert_eq!(settings.session.command_errors, CommandErrorPolicy::Disconnect);
    assert_eq!(settings.log.level, "info");
    assert_eq!(settings.listen_addr(), "0.0.0.0:8000");
}

#[test]
fn port_override_accepts_valid_port() {
    let mut settings = Settings::default();
    settings.apply_port_override(" 9100 ").unwrap();
    assert_eq!(settings.server.port, 9100);
}

#[test]
fn port_override_keeps_port_on_garbage() {
    let mut settings = Settings::default();
    assert!(settings.apply_port_override("eighty").is_err());
    assert!(settings.apply_port_override("70000").is_err());
    assert_eq!(settings.server.port, 8000);
}

#[test]
fn zero_idle_timeout_is_disabled() {
    let mut settings = Settings::default();
    settings.session.idle_timeout_secs = Some(0);
    assert_eq!(settings.session.idle_timeout(), None);
    settings.session.idle_timeout_secs = Some(30);
    assert_eq!(settings.session.idle_timeout(), Some(Duration::from_secs(30)));
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("POPSUB_SERVER__PORT", Some("9001")),
            ("POPSUB_SESSION__IDLE_TIMEOUT_SECS", Some("45")),
            ("POPSUB_SESSION__COMMAND_ERRORS", Some("report")),
            ("POPSUB_LOG__LEVEL", Some("debug")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.host, "0.0.0.0");
            assert_eq!(cfg.server.port, 9001);
            assert_eq!(cfg.session.idle_timeout_secs, Some(45));
            assert_eq!(cfg.session.command_errors, CommandErrorPolicy::Report);
            assert_eq!(cfg.log.level, "debug");
        },
    );
}

#[test]
#[serial]
fn load_config_without_sources_uses_defaults() {
    temp_env::with_vars_unset(
        [
            "POPSUB_SERVER__PORT",
            "POPSUB_SERVER__HOST",
            "POPSUB_LOG__LEVEL",
            "POPSUB_SESSION__IDLE_TIMEOUT_SECS",
            "POPSUB_SESSION__COMMAND_ERRORS",
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.port, 8000);
            assert_eq!(cfg.log.level, "info");
            assert_eq!(cfg.session.idle_timeout_secs, None);
            assert_eq!(cfg.session.command_errors, CommandErrorPolicy::Disconnect);
        },
    );
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // Create a temporary directory and set it as current dir so load_config
    // will pick up config/default.toml from there.
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [server]
        host = "127.0.0.1"
        port = 9500

        [session]
        idle_timeout_secs = 120
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();

    // restore cwd before asserting so a failure doesn't leak into other tests
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9500);
    assert_eq!(cfg.session.idle_timeout_secs, Some(120));
    assert_eq!(cfg.session.command_errors, CommandErrorPolicy::Disconnect);
}
