use super::*;
use crate::schema::TargetKind;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_empty_config() {
    let config = ConfigLoader::load_str("").unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.escalation.ack_timeout_secs, 900);
    assert_eq!(config.storage.backend, "memory");
    assert!(config.targets.is_empty());
    assert!(config.services.is_empty());
}

#[test]
fn test_load_full_config() {
    let content = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [escalation]
        ack_timeout_secs = 300

        [storage]
        backend = "file"
        path = "/var/lib/pager"

        [[targets]]
        id = "oncall-email"
        kind = "email"
        address = "oncall@example.com"

        [[targets]]
        id = "oncall-sms"
        kind = "sms"
        phone_number = "+15550100"

        [[services]]
        id = "billing"
        levels = [["oncall-email", "oncall-sms"], ["oncall-sms"]]
    "#;
    let config = ConfigLoader::load_str(content).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.escalation.ack_timeout().as_secs(), 300);
    assert_eq!(config.storage.backend, "file");
    assert_eq!(config.targets.len(), 2);
    assert_eq!(config.targets[0].kind, TargetKind::Email);
    assert_eq!(config.targets[1].phone_number.as_deref(), Some("+15550100"));
    assert_eq!(config.services[0].levels.len(), 2);
    assert_eq!(config.services[0].levels[0], vec!["oncall-email", "oncall-sms"]);
    assert!(config.target("oncall-sms").is_some());
    assert!(config.target("missing").is_none());
}

#[test]
fn test_service_without_levels() {
    let content = r#"
        [[services]]
        id = "batch"
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert!(config.services[0].levels.is_empty());
}

#[test]
fn test_unknown_target_kind() {
    let content = r#"
        [[targets]]
        id = "pager"
        kind = "carrier-pigeon"
    "#;
    assert!(ConfigLoader::load_str(content).is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[server]").unwrap();
    writeln!(file, "port = 5000").unwrap();

    let config = ConfigLoader::load(file.path()).unwrap();
    assert_eq!(config.server.port, 5000);
}

#[test]
fn test_load_nonexistent_file() {
    let result = ConfigLoader::load(Path::new("/nonexistent/path/pager.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_invalid_toml() {
    let result = ConfigLoader::load_str("invalid = [unclosed");
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_expand_env_vars() {
    // SAFETY: test-only variable name, not read by any other test
    unsafe {
        std::env::set_var("PAGER_TEST_ONCALL_ADDRESS", "sre@example.com");
    }
    let content = r#"
        [[targets]]
        id = "oncall"
        kind = "email"
        address = "${PAGER_TEST_ONCALL_ADDRESS}"
    "#;
    let config = ConfigLoader::load_str(content).unwrap();
    assert_eq!(config.targets[0].address.as_deref(), Some("sre@example.com"));
    unsafe {
        std::env::remove_var("PAGER_TEST_ONCALL_ADDRESS");
    }
}

#[test]
fn test_expand_env_vars_not_set() {
    let content = "value = \"${PAGER_NONEXISTENT_TEST_VAR_12345}\"";
    let result = ConfigLoader::expand_env_vars(content);
    assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
}

#[test]
fn test_expand_env_vars_no_vars() {
    let content = "value = \"no variables here\"";
    assert_eq!(ConfigLoader::expand_env_vars(content).unwrap(), content);
}

#[test]
fn test_expand_path_with_tilde() {
    let expanded = ConfigLoader::expand_path("~/state");
    assert!(!expanded.starts_with('~'));
    assert!(expanded.ends_with("/state"));
}

#[test]
fn test_storage_resolved_path() {
    let config = ConfigLoader::load_str("[storage]\nbackend = \"file\"\npath = \"~/.pager\"").unwrap();
    let path = config.storage.resolved_path().unwrap();
    assert!(!path.to_string_lossy().starts_with('~'));
}
