use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub calendar_id: String,
    pub credentials_path: PathBuf,
    pub google_api_key: String,
    pub gemini_model: String,
    pub http_timeout: Duration,
    /// `None` keeps idle sessions forever.
    pub session_ttl: Option<Duration>,
    /// Bearer token for the session admin endpoints. Unset disables them.
    pub admin_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Missing calendar id or
    /// API key is an error; everything else has a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        let session_ttl_minutes: u64 = lookup("SESSION_TTL_MINUTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            calendar_id: required("GOOGLE_CALENDAR_ID")?,
            credentials_path: lookup("GOOGLE_APPLICATION_CREDENTIALS")
                .unwrap_or_else(|| "credentials.json".to_string())
                .into(),
            google_api_key: required("GOOGLE_API_KEY")?,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| "gemini-1.5-pro".to_string()),
            http_timeout: Duration::from_secs(
                lookup("HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            session_ttl: (session_ttl_minutes > 0)
                .then(|| Duration::from_secs(session_ttl_minutes * 60)),
            admin_token: lookup("ADMIN_TOKEN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CALENDAR_ID", "team@group.calendar.google.com"),
            ("GOOGLE_API_KEY", "key-123"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.credentials_path, PathBuf::from("credentials.json"));
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.session_ttl, Some(Duration::from_secs(3600)));
        assert_eq!(config.admin_token, None);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CALENDAR_ID", "primary"),
            ("GOOGLE_API_KEY", "key-123"),
            ("PORT", "9090"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/assistant/sa.json"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("SESSION_TTL_MINUTES", "0"),
            ("ADMIN_TOKEN", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.credentials_path, PathBuf::from("/etc/assistant/sa.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.session_ttl, None);
        assert_eq!(config.admin_token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[("GOOGLE_CALENDAR_ID", "primary")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_calendar_id_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("GOOGLE_CALENDAR_ID", "  "),
            ("GOOGLE_API_KEY", "key-123"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CALENDAR_ID"));
    }
}
