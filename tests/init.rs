use console_log_adapter::config::LoggerConfig;
use console_log_adapter::init::{init_console, init_logging_with_config, InitError};
use console_log_adapter::{console, console_info, console_trace};
use serde_json::json;

// Runs in its own process, so the global subscriber is ours alone.
#[test]
fn init_console_installs_once() {
    let config = LoggerConfig::default();
    let adapter = init_console(&config).expect("first init succeeds");
    assert!(console::is_installed());

    console_info!("service started", json!({"port": 8080}));
    console_trace!("below the configured level");

    let (payload, message) = adapter.params(&["ready".into()]);
    assert_eq!(message, "ready");
    assert!(payload.tenant_id.is_none());

    assert!(matches!(
        init_logging_with_config(&config),
        Err(InitError::AlreadySet(_))
    ));

    console::restore();
    assert!(!console::is_installed());
}
