//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs parse
//! - Validate value ranges (timeouts > 0, prefixes rooted)
//! - Detect overlapping path prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlatformConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::PlatformConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &PlatformConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Err(e) = Url::parse(&config.api.base_url) {
        errors.push(ValidationError::new("api.base_url", e.to_string()));
    }
    if config.api.timeout_ms == 0 {
        errors.push(ValidationError::new("api.timeout_ms", "must be greater than zero"));
    }

    match Url::parse(&config.proxy.upstream) {
        Ok(url) if url.scheme() != "http" => {
            errors.push(ValidationError::new(
                "proxy.upstream",
                format!("unsupported scheme '{}', only http is proxied", url.scheme()),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("proxy.upstream", e.to_string())),
    }

    for (field, prefix) in [
        ("proxy.prefix", &config.proxy.prefix),
        ("assets.prefix", &config.assets.prefix),
        ("ssr.hot_reload_path", &config.ssr.hot_reload_path),
    ] {
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            errors.push(ValidationError::new(
                field,
                format!("'{}' must start with '/' and name a segment", prefix),
            ));
        }
    }

    let mounts = [
        ("proxy.prefix", config.proxy.prefix.as_str()),
        ("assets.prefix", config.assets.prefix.as_str()),
        ("ssr.hot_reload_path", config.ssr.hot_reload_path.as_str()),
    ];
    for (i, (field, path)) in mounts.iter().enumerate() {
        for (other_field, other) in &mounts[..i] {
            if paths_overlap(path, other) {
                errors.push(ValidationError::new(
                    *field,
                    format!("'{}' overlaps {} '{}'", path, other_field, other),
                ));
            }
        }
    }

    if config.ssr.heartbeat_ms == 0 {
        errors.push(ValidationError::new("ssr.heartbeat_ms", "must be greater than zero"));
    }

    for (field, target) in [("build.client", &config.build.client), ("build.server", &config.build.server)] {
        if target.artifact.trim().is_empty() {
            errors.push(ValidationError::new(field, "artifact path is empty"));
        }
        if matches!(&target.command, Some(cmd) if cmd.is_empty()) {
            errors.push(ValidationError::new(field, "command must name a program"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Equal, or one is a whole-segment prefix of the other.
fn paths_overlap(a: &str, b: &str) -> bool {
    let a = a.trim_end_matches('/');
    let b = b.trim_end_matches('/');
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    long == short || long.strip_prefix(short).is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PlatformConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = PlatformConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.api.timeout_ms = 0;
        config.proxy.upstream = "https://api.example.com".into();
        config.assets.prefix = "dist".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.bind_address", "api.timeout_ms", "proxy.upstream", "assets.prefix"]
        );
    }

    #[test]
    fn empty_command_rejected() {
        let mut config = PlatformConfig::default();
        config.build.server.command = Some(Vec::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "build.server");
    }

    fn overlap_fields(config: &PlatformConfig) -> Vec<&'static str> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .filter(|e| e.message.contains("overlaps"))
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn hot_reload_path_cannot_reuse_asset_prefix() {
        let mut config = PlatformConfig::default();
        config.ssr.hot_reload_path = "/dist".into();
        assert_eq!(overlap_fields(&config), vec!["ssr.hot_reload_path"]);
    }

    #[test]
    fn hot_reload_path_cannot_reuse_proxy_prefix() {
        let mut config = PlatformConfig::default();
        config.ssr.hot_reload_path = "/api".into();
        assert_eq!(overlap_fields(&config), vec!["ssr.hot_reload_path"]);
    }

    #[test]
    fn nested_prefixes_overlap() {
        let mut config = PlatformConfig::default();
        config.assets.prefix = "/api/static".into();
        assert_eq!(overlap_fields(&config), vec!["assets.prefix"]);

        config.assets.prefix = "/api".into();
        assert_eq!(overlap_fields(&config), vec!["assets.prefix"]);
    }

    #[test]
    fn sibling_prefixes_do_not_overlap() {
        assert!(!paths_overlap("/api", "/apidocs"));
        assert!(!paths_overlap("/dist", "/__hmr"));
        assert!(paths_overlap("/api", "/api/v2"));
    }
}
