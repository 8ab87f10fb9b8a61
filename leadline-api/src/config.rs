//! API Configuration Module
//!
//! Configuration for the HTTP listener, CORS, and the telephony provider
//! account. Everything loads from environment variables with sensible
//! defaults for development; secrets are wrapped so they never appear in
//! Debug output or logs.

use secrecy::SecretString;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration for the listener, CORS, and callback URLs.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address for the HTTP listener.
    pub bind: String,

    /// Port for the HTTP listener.
    pub port: u16,

    /// Deployment environment name ("development", "production", ...).
    pub environment: String,

    /// Public base URL of this service, used to build the callback URLs
    /// handed to the telephony provider. No trailing slash.
    pub app_base_url: String,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    /// Example: "https://leadline.app,https://app.leadline.app"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            app_base_url: "http://localhost:3000".to_string(),

            // CORS defaults: permissive for development
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `LEADLINE_BIND`: Listener address (default: 0.0.0.0)
    /// - `LEADLINE_PORT` or `PORT`: Listener port (default: 3000)
    /// - `LEADLINE_ENVIRONMENT`: Deployment environment (default: development)
    /// - `LEADLINE_APP_BASE_URL`: Public base URL for provider callbacks
    /// - `LEADLINE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `LEADLINE_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `LEADLINE_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind = std::env::var("LEADLINE_BIND").unwrap_or(defaults.bind);
        // PORT is the platform-injected spelling on most hosts.
        let port = std::env::var("LEADLINE_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let environment =
            std::env::var("LEADLINE_ENVIRONMENT").unwrap_or(defaults.environment);
        let app_base_url = std::env::var("LEADLINE_APP_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.app_base_url);

        let cors_origins = std::env::var("LEADLINE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("LEADLINE_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = std::env::var("LEADLINE_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        Self {
            bind,
            port,
            environment,
            app_base_url,
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Build a provider callback URL under the public base URL.
    pub fn callback_url(&self, path: &str) -> String {
        format!("{}/{}", self.app_base_url, path.trim_start_matches('/'))
    }
}

// ============================================================================
// TELEPHONY PROVIDER CONFIGURATION
// ============================================================================

/// Twilio account configuration.
///
/// The account SID/auth token pair authenticates recording downloads; the
/// API key pair signs browser voice tokens. Both pairs are optional at
/// startup so the read-only endpoints work without a telephony account,
/// but the dialer and recording proxy will refuse requests until they are
/// set.
#[derive(Clone, Default)]
pub struct TwilioConfig {
    /// Account SID (AC...).
    pub account_sid: Option<String>,
    /// Account auth token, used as the Basic-auth password for media.
    pub auth_token: Option<SecretString>,
    /// API key SID (SK...), the issuer of browser voice tokens.
    pub api_key_sid: Option<String>,
    /// API key secret, signs browser voice tokens.
    pub api_key_secret: Option<SecretString>,
    /// TwiML application SID routed by outgoing browser calls.
    pub twiml_app_sid: Option<String>,
    /// Caller ID presented on outbound dials.
    pub caller_id: Option<String>,
}

impl TwilioConfig {
    /// Create TwilioConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TWILIO_ACCOUNT_SID`
    /// - `TWILIO_AUTH_TOKEN`
    /// - `TWILIO_API_KEY_SID`
    /// - `TWILIO_API_KEY_SECRET`
    /// - `TWILIO_TWIML_APP_SID`
    /// - `TWILIO_CALLER_ID`
    pub fn from_env() -> Self {
        Self {
            account_sid: non_empty_env("TWILIO_ACCOUNT_SID"),
            auth_token: non_empty_env("TWILIO_AUTH_TOKEN").map(SecretString::from),
            api_key_sid: non_empty_env("TWILIO_API_KEY_SID"),
            api_key_secret: non_empty_env("TWILIO_API_KEY_SECRET").map(SecretString::from),
            twiml_app_sid: non_empty_env("TWILIO_TWIML_APP_SID"),
            caller_id: non_empty_env("TWILIO_CALLER_ID"),
        }
    }

    /// Whether recording downloads can be authenticated.
    pub fn has_media_credentials(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some()
    }

    /// Whether browser voice tokens can be minted.
    pub fn has_voice_grant_config(&self) -> bool {
        self.account_sid.is_some()
            && self.api_key_sid.is_some()
            && self.api_key_secret.is_some()
            && self.twiml_app_sid.is_some()
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("api_key_sid", &self.api_key_sid)
            .field(
                "api_key_secret",
                &self.api_key_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("twiml_app_sid", &self.twiml_app_sid)
            .field("caller_id", &self.caller_id)
            .finish()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
