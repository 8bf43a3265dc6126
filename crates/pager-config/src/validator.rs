//! Configuration validation.

use std::collections::HashSet;

use crate::schema::{Config, TargetKind};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_escalation(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_targets(config, &mut result);
        Self::validate_services(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_escalation(config: &Config, result: &mut ValidationResult) {
        if config.escalation.ack_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "escalation.ack_timeout_secs",
                "ack_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        let valid_backends = ["memory", "file"];
        if !valid_backends.contains(&config.storage.backend.as_str()) {
            result.add_warning(ValidationWarning::new(
                "storage.backend",
                format!(
                    "Unknown storage backend '{}', valid values: {:?}; falling back to memory",
                    config.storage.backend, valid_backends
                ),
            ));
        }

        if config.storage.backend == "file" && config.storage.path.is_none() {
            result.add_warning(ValidationWarning::new(
                "storage.path",
                "File backend path not set, will use default location",
            ));
        }
    }

    fn validate_targets(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, target) in config.targets.iter().enumerate() {
            let path = format!("targets[{}]", i);

            if target.id.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    "Target id cannot be empty",
                ));
            } else if !seen.insert(target.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!("Duplicate target id '{}'", target.id),
                ));
            }

            let missing = match target.kind {
                TargetKind::Email => target.address.as_deref().is_none_or(str::is_empty),
                TargetKind::Sms => target.phone_number.as_deref().is_none_or(str::is_empty),
            };
            if missing {
                let field = match target.kind {
                    TargetKind::Email => "address",
                    TargetKind::Sms => "phone_number",
                };
                result.add_error(ValidationError::new(
                    format!("{}.{}", path, field),
                    format!("{} target '{}' requires {}", target.kind, target.id, field),
                ));
            }
        }
    }

    fn validate_services(config: &Config, result: &mut ValidationResult) {
        let mut seen = HashSet::new();

        for (i, service) in config.services.iter().enumerate() {
            let path = format!("services[{}]", i);

            if service.id.is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    "Service id cannot be empty",
                ));
            } else if !seen.insert(service.id.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.id", path),
                    format!("Duplicate service id '{}'", service.id),
                ));
            }

            if service.levels.is_empty() {
                result.add_warning(ValidationWarning::new(
                    format!("{}.levels", path),
                    format!(
                        "Service '{}' has no escalation levels; incidents will open but nobody is notified",
                        service.id
                    ),
                ));
            }

            for (n, level) in service.levels.iter().enumerate() {
                if level.is_empty() {
                    result.add_warning(ValidationWarning::new(
                        format!("{}.levels[{}]", path, n),
                        "Escalation level has no targets",
                    ));
                }
                for target_id in level {
                    if config.target(target_id).is_none() {
                        result.add_error(ValidationError::new(
                            format!("{}.levels[{}]", path, n),
                            format!("Unknown target '{}'", target_id),
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
