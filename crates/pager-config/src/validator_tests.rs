use super::*;
use crate::loader::ConfigLoader;
use crate::schema::{ServiceConfig, TargetConfig};

fn valid_config() -> Config {
    ConfigLoader::load_str(
        r#"
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
        levels = [["oncall-email"], ["oncall-sms"]]
    "#,
    )
    .unwrap()
}

fn has_error(result: &ValidationResult, path: &str) -> bool {
    result.errors.iter().any(|e| e.path == path)
}

fn has_warning(result: &ValidationResult, path: &str) -> bool {
    result.warnings.iter().any(|w| w.path == path)
}

#[test]
fn test_valid_config() {
    let result = ConfigValidator::validate(&valid_config());
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_default_config_is_valid() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
}

#[test]
fn test_zero_port() {
    let mut config = valid_config();
    config.server.port = 0;
    assert!(has_error(&ConfigValidator::validate(&config), "server.port"));
}

#[test]
fn test_empty_host() {
    let mut config = valid_config();
    config.server.host = String::new();
    assert!(has_error(&ConfigValidator::validate(&config), "server.host"));
}

#[test]
fn test_zero_ack_timeout() {
    let mut config = valid_config();
    config.escalation.ack_timeout_secs = 0;
    assert!(has_error(
        &ConfigValidator::validate(&config),
        "escalation.ack_timeout_secs"
    ));
}

#[test]
fn test_unknown_storage_backend_warns() {
    let mut config = valid_config();
    config.storage.backend = "redis".to_string();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(has_warning(&result, "storage.backend"));
}

#[test]
fn test_file_backend_without_path_warns() {
    let mut config = valid_config();
    config.storage.backend = "file".to_string();
    assert!(has_warning(&ConfigValidator::validate(&config), "storage.path"));
}

#[test]
fn test_duplicate_target_id() {
    let mut config = valid_config();
    config.targets.push(TargetConfig {
        id: "oncall-email".to_string(),
        kind: crate::schema::TargetKind::Email,
        address: Some("other@example.com".to_string()),
        phone_number: None,
    });
    assert!(has_error(&ConfigValidator::validate(&config), "targets[2].id"));
}

#[test]
fn test_email_target_without_address() {
    let mut config = valid_config();
    config.targets[0].address = None;
    assert!(has_error(
        &ConfigValidator::validate(&config),
        "targets[0].address"
    ));
}

#[test]
fn test_sms_target_with_empty_phone_number() {
    let mut config = valid_config();
    config.targets[1].phone_number = Some(String::new());
    assert!(has_error(
        &ConfigValidator::validate(&config),
        "targets[1].phone_number"
    ));
}

#[test]
fn test_unknown_target_in_level() {
    let mut config = valid_config();
    config.services[0].levels[1].push("nobody".to_string());
    let result = ConfigValidator::validate(&config);
    assert!(has_error(&result, "services[0].levels[1]"));
    assert!(result.errors[0].message.contains("nobody"));
}

#[test]
fn test_duplicate_service_id() {
    let mut config = valid_config();
    config.services.push(ServiceConfig {
        id: "billing".to_string(),
        levels: vec![vec!["oncall-sms".to_string()]],
    });
    assert!(has_error(&ConfigValidator::validate(&config), "services[1].id"));
}

#[test]
fn test_empty_service_id() {
    let mut config = valid_config();
    config.services[0].id = String::new();
    assert!(has_error(&ConfigValidator::validate(&config), "services[0].id"));
}

#[test]
fn test_service_without_levels_warns() {
    let mut config = valid_config();
    config.services[0].levels.clear();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(has_warning(&result, "services[0].levels"));
}

#[test]
fn test_empty_level_warns() {
    let mut config = valid_config();
    config.services[0].levels.push(Vec::new());
    assert!(has_warning(
        &ConfigValidator::validate(&config),
        "services[0].levels[2]"
    ));
}

#[test]
fn test_display() {
    let err = ValidationError::new("server.port", "Port cannot be 0");
    assert_eq!(err.to_string(), "server.port: Port cannot be 0");
}
