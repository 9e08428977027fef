//! Session configuration loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use screencast_ipc::SessionConfig;

/// Environment variable overriding the viewer origin.
pub const ORIGIN_ENV: &str = "SCREENCAST_ORIGIN";

/// Load the session config from `path` (defaults when `None`), then apply
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: SessionConfig = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            info!(path = %path.display(), "Loaded session config");
            config
        }
        None => {
            debug!("No config file, using defaults");
            SessionConfig::default()
        }
    };

    apply_origin_override(&mut config, std::env::var(ORIGIN_ENV).ok());
    Ok(config)
}

/// Replace the origin when an override is set and non-empty.
pub fn apply_origin_override(config: &mut SessionConfig, origin: Option<String>) {
    if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
        info!(%origin, "Origin overridden from environment");
        config.origin = origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("screencast-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"origin":"https://cast.example.com","activity_capacity":3}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.activity_capacity, 3);
        assert_eq!(config.activity_expiry_ms, 5000);
        assert_eq!(config.reconnect_max_attempts, 3);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config(Some(Path::new("/nonexistent/screencast.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/screencast.json"));
    }

    #[test]
    fn test_origin_override() {
        let mut config = SessionConfig::default();

        apply_origin_override(&mut config, Some("  ".into()));
        assert_eq!(config.origin, SessionConfig::default().origin);

        apply_origin_override(&mut config, Some("https://cast.example.com".into()));
        assert_eq!(config.origin, "https://cast.example.com");
    }
}
