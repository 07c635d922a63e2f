//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Validate addresses and URLs before anything binds or connects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{ProxyConfig, RegistrySource, PLACEHOLDER_API_KEY};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("registry.annotation_keys must not be empty")]
    NoAnnotationKeys,

    #[error("registry.annotation_keys[{0}] is blank")]
    BlankAnnotationKey(usize),

    #[error("registry.refresh_interval_secs must be greater than zero")]
    ZeroRefreshInterval,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("{field} is not a valid socket address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("registry.source.url is not a valid http(s) URL: {0:?}")]
    InvalidRegistryUrl(String),

    #[error("admin.api_key must be changed from the placeholder when admin is enabled")]
    PlaceholderApiKey,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.registry.annotation_keys.is_empty() {
        errors.push(ValidationError::NoAnnotationKeys);
    }
    for (i, key) in config.registry.annotation_keys.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(ValidationError::BlankAnnotationKey(i));
        }
    }
    if config.registry.refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }
    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::PlaceholderApiKey);
        }
    }

    if let RegistrySource::Http { url, .. } = &config.registry.source {
        let valid = url::Url::parse(url)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidRegistryUrl(url.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.registry.annotation_keys = vec!["ok".into(), "  ".into()];
        config.registry.refresh_interval_secs = 0;
        config.listener.bind_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::BlankAnnotationKey(1)));
        assert!(errors.contains(&ValidationError::ZeroRefreshInterval));
    }

    #[test]
    fn test_admin_placeholder_rejected() {
        let mut config = ProxyConfig::default();
        config.admin.enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::PlaceholderApiKey])
        );

        config.admin.api_key = "s3cret".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_http_registry_url() {
        let mut config = ProxyConfig::default();
        config.registry.source = RegistrySource::Http {
            url: "ftp://registry.local/services".into(),
            timeout_secs: 5,
        };
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidRegistryUrl(
                "ftp://registry.local/services".into()
            )])
        );
    }
}
