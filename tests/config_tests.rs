//! Configuration loading and validation
use screen_overlay::config::{CONFIG_PATH_ENV, DISPLAY_ENV, POLL_TIMEOUT_ENV};
use screen_overlay::{OverlayConfig, OverlayError};
use std::time::Duration;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("screen_overlay_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_partial_json_falls_back_to_defaults() {
    let config: OverlayConfig =
        serde_json::from_str(r#"{ "display_id": 2, "poll_timeout_ms": 250 }"#).unwrap();

    assert_eq!(config.display_id, 2);
    assert_eq!(config.poll_timeout(), Duration::from_millis(250));
    assert_eq!(config.background, OverlayConfig::default().background);
    assert_eq!(config.overlay.transparency, Some(128));
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_load_file() {
    let path = temp_path("save_load");
    let path_str = path.to_str().unwrap();

    let mut config = OverlayConfig::default();
    config.overlay.color = 0x4000_FF00;
    config.save_to_file(path_str).unwrap();

    let loaded = OverlayConfig::load_from_file(path_str).unwrap();
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_file_is_a_config_error() {
    let path = temp_path("missing");
    let err = OverlayConfig::load_from_file(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, OverlayError::ConfigError(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = OverlayConfig::default();
    config.background.width = 0;
    assert!(config.validate().is_err());

    let mut config = OverlayConfig::default();
    config.buffer_count = 0;
    assert!(config.validate().is_err());

    let mut config = OverlayConfig::default();
    config.poll_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = OverlayConfig::default();
    config.overlay.zorder = config.background.zorder;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_multiple_buffers() {
    let config: OverlayConfig = serde_json::from_str(r#"{ "buffer_count": 3 }"#).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, OverlayError::ConfigError(_)));
    assert_eq!(err.exit_code(), 1);

    let mut config = OverlayConfig::default();
    config.buffer_count = 2;
    assert!(config.validate().is_err());
    config.buffer_count = 1;
    assert!(config.validate().is_ok());
}

#[test]
fn test_non_numeric_display_argument_is_zero() {
    let mut config = OverlayConfig::default();
    config.display_id = 4;
    config.apply_args(["primary"]);
    assert_eq!(config.display_id, 0);
    assert!(config.validate().is_ok());
}

// The only test in this binary that touches the process environment
#[test]
fn test_environment_overrides() {
    let path = temp_path("env");
    let mut file_config = OverlayConfig::default();
    file_config.display_id = 5;
    file_config.poll_timeout_ms = 500;
    file_config.save_to_file(path.to_str().unwrap()).unwrap();

    std::env::set_var(CONFIG_PATH_ENV, &path);
    std::env::remove_var(DISPLAY_ENV);
    std::env::remove_var(POLL_TIMEOUT_ENV);
    let config = OverlayConfig::from_env().unwrap();
    assert_eq!(config.display_id, 5);
    assert_eq!(config.poll_timeout_ms, 500);

    std::env::set_var(DISPLAY_ENV, "3");
    std::env::set_var(POLL_TIMEOUT_ENV, "not a number");
    let config = OverlayConfig::from_env().unwrap();
    assert_eq!(config.display_id, 3);
    assert_eq!(config.poll_timeout_ms, 500);

    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::remove_var(DISPLAY_ENV);
    std::env::remove_var(POLL_TIMEOUT_ENV);
    std::fs::remove_file(&path).unwrap();
}
