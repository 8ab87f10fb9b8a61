//! Authentication Module
//!
//! Validates the opaque session tokens minted by the hosted auth provider
//! (HS256 JWTs carrying the provider-side user id in `sub`) and turns them
//! into an [`AuthContext`] holding the *internal* user row. The dashboard
//! never mints session tokens itself; it only verifies them.
//!
//! Time validation is done against an injected [`JwtClock`] rather than the
//! system clock inside `jsonwebtoken`, so expiry tests are deterministic and
//! a misconfigured host clock fails loudly instead of panicking.

use crate::error::{ApiError, ApiResult};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use leadline_core::{EntityId, User, UserRole};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Fallback secret for local development. Refused in production by
/// [`AuthConfig::validate_for_production`].
const INSECURE_DEFAULT_SECRET: &str = "leadline-dev-secret-change-me";

/// Audience claim the auth provider stamps on session tokens.
const DEFAULT_AUDIENCE: &str = "authenticated";

// ============================================================================
// CLOCK ABSTRACTION (FOR DETERMINISTIC TESTS)
// ============================================================================

/// Clock used for JWT time validation.
///
/// Owning time validation ourselves (instead of letting `jsonwebtoken` call
/// `SystemTime::now()`) keeps expiry checks deterministic under test and
/// avoids the pre-epoch panic path on broken hosts.
pub trait JwtClock: Send + Sync {
    /// Current time as Unix epoch seconds. May be negative on broken hosts.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl JwtClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl JwtClock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}


// ============================================================================
// JWT SECRET (TYPE-SAFE)
// ============================================================================

/// Shared secret used to verify session token signatures.
///
/// Wraps `secrecy::SecretString` so the value never shows up in `Debug`
/// output or logs.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    /// Create a secret, falling back to the insecure development default
    /// when the input is empty or whitespace.
    pub fn new(secret: String) -> Self {
        if secret.trim().is_empty() {
            Self(SecretString::new(INSECURE_DEFAULT_SECRET.to_string().into()))
        } else {
            Self(SecretString::new(secret.into()))
        }
    }

    /// Expose the secret value (only for key derivation).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Length of the secret without exposing it.
    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// Whether the secret is still the development default.
    pub fn is_insecure_default(&self) -> bool {
        self.0.expose_secret() == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.len())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Session token verification settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared secret the auth provider signs session tokens with.
    pub jwt_secret: JwtSecret,

    /// Signature algorithm (the provider uses HS256).
    pub jwt_algorithm: Algorithm,

    /// Expected `aud` claim. Tokens minted for other audiences are rejected.
    pub audience: String,

    /// Clock skew tolerance in seconds applied to `exp` checks.
    pub clock_skew_secs: i64,

    /// Clock for time validation (injected for testing).
    pub clock: Arc<dyn JwtClock>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("audience", &self.audience)
            .field("clock_skew_secs", &self.clock_skew_secs)
            .field("clock", &"<JwtClock>")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: JwtSecret::new(INSECURE_DEFAULT_SECRET.to_string()),
            jwt_algorithm: Algorithm::HS256,
            audience: DEFAULT_AUDIENCE.to_string(),
            clock_skew_secs: 60,
            clock: Arc::new(SystemClock),
        }
    }
}

impl AuthConfig {
    /// Create authentication configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `LEADLINE_AUTH_JWT_SECRET`: shared secret for session token signatures
    /// - `LEADLINE_AUTH_AUDIENCE`: expected `aud` claim (default: "authenticated")
    /// - `LEADLINE_AUTH_CLOCK_SKEW_SECS`: clock skew tolerance (default: 60)
    pub fn from_env() -> Self {
        let secret_str = std::env::var("LEADLINE_AUTH_JWT_SECRET")
            .unwrap_or_else(|_| INSECURE_DEFAULT_SECRET.to_string());

        Self {
            jwt_secret: JwtSecret::new(secret_str),
            jwt_algorithm: Algorithm::HS256,
            audience: std::env::var("LEADLINE_AUTH_AUDIENCE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            clock_skew_secs: std::env::var("LEADLINE_AUTH_CLOCK_SKEW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            clock: Arc::new(SystemClock),
        }
    }

    /// Refuse insecure settings at startup when running in production.
    /// In development the problems are logged as warnings and startup
    /// continues.
    pub fn validate_for_production(&self, is_production: bool) -> ApiResult<()> {
        if self.jwt_secret.is_insecure_default() {
            if is_production {
                return Err(ApiError::invalid_input(
                    "Cannot start in production with the default session token secret. \
                     Set LEADLINE_AUTH_JWT_SECRET to a secure value.",
                ));
            }
            tracing::warn!(
                "using the insecure default session token secret; set \
                 LEADLINE_AUTH_JWT_SECRET before deploying"
            );
        } else if self.jwt_secret.len() < 32 {
            if is_production {
                return Err(ApiError::invalid_input(format!(
                    "Session token secret is too short for production use ({} chars). \
                     It must be at least 32 characters long.",
                    self.jwt_secret.len()
                )));
            }
            tracing::warn!(
                secret_len = self.jwt_secret.len(),
                "session token secret is short; use at least 32 characters in production"
            );
        }

        Ok(())
    }
}

// ============================================================================
// SESSION TOKEN CLAIMS
// ============================================================================

/// Claims carried by a session token.
///
/// `sub` is the auth provider's user id, not an internal user id. The
/// internal row is resolved from it by the auth middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: provider-side user id (UUID).
    pub sub: String,

    /// Audience the token was minted for.
    pub aud: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at (Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,

    /// Email address the provider knows the user by.
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionClaims {
    /// Build claims with an expiry `ttl_secs` from the clock's now.
    pub fn new(provider_uid: Uuid, audience: &str, ttl_secs: i64, clock: &dyn JwtClock) -> Self {
        let now = clock.now_epoch_secs();

        Self {
            sub: provider_uid.to_string(),
            aud: audience.to_string(),
            exp: now + ttl_secs,
            iat: Some(now),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Parse the subject claim as the provider-side user UUID.
    pub fn provider_uid(&self) -> ApiResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::invalid_token("Session token subject is not a valid user id"))
    }

    /// Check expiry against a clock, without leeway.
    pub fn is_expired(&self, clock: &dyn JwtClock) -> bool {
        self.exp < clock.now_epoch_secs()
    }
}

// ============================================================================
// TOKEN VALIDATION
// ============================================================================

/// Validate claim times with our own clock logic.
///
/// Separated from signature validation so expiry behavior is deterministic
/// under injected clocks and clock skew policy lives in one place.
fn validate_claim_times(now: i64, exp: i64, nbf: Option<i64>, leeway_secs: i64) -> ApiResult<()> {
    if let Some(nbf) = nbf {
        if now + leeway_secs < nbf {
            return Err(ApiError::invalid_token("Session token not yet valid"));
        }
    }

    if exp < now - leeway_secs {
        return Err(ApiError::invalid_token("Session token has expired"));
    }

    Ok(())
}

/// Validate a session token and extract its claims.
///
/// Performs signature and audience validation via `jsonwebtoken`, then time
/// validation against the injected clock. Returns 401-mapped errors for every
/// failure mode; nothing about the stored user leaks from here.
pub fn validate_session_token(config: &AuthConfig, token: &str) -> ApiResult<SessionClaims> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.expose().as_bytes());

    // Signature + audience validation only; exp is checked below with our clock.
    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.set_audience(&[config.audience.as_str()]);
    validation.required_spec_claims = HashSet::from(["exp".to_string(), "aud".to_string()]);

    let token_data =
        decode::<SessionClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                ApiError::invalid_token("Session token is malformed")
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::invalid_token("Session token signature is invalid")
            }
            jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                ApiError::invalid_token("Session token audience mismatch")
            }
            _ => ApiError::invalid_token(format!("Session token validation failed: {}", e)),
        })?;

    let claims = token_data.claims;

    let now = config.clock.now_epoch_secs();

    // Fail loud if the production clock reports pre-epoch time.
    if now < 0 {
        tracing::error!(
            timestamp = now,
            "system clock returned pre-epoch time; refusing to validate tokens"
        );
        return Err(ApiError::internal_error("Server time configuration error"));
    }

    validate_claim_times(now, claims.exp, None, config.clock_skew_secs)?;

    Ok(claims)
}

/// Extract the bearer token from an `Authorization` header value.
///
/// A missing header is a 401 "authentication required"; a present header
/// that is not a Bearer credential is a 401 invalid-token.
pub fn bearer_token(auth_header: Option<&str>) -> ApiResult<&str> {
    let value = auth_header.ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::invalid_token("Authorization header must use Bearer scheme"))
}

// ============================================================================
// AUTHENTICATION CONTEXT
// ============================================================================

/// Authenticated caller, resolved to the internal user row.
///
/// Injected into request extensions by the auth middleware after the session
/// token is validated and the user row is loaded.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Internal user id (primary key of the users table).
    pub user_id: EntityId,

    /// Provider-side user id the session token was issued for.
    pub provider_uid: Uuid,

    /// Role from the internal user row, not from the token.
    pub role: UserRole,

    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AuthContext {
    /// Build a context from a resolved user row.
    pub fn from_user(user: User, provider_uid: Uuid) -> Self {
        Self {
            user_id: user.user_id,
            provider_uid,
            role: user.role,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// Role gate used by handlers. Fails with a generic 403 so the response
    /// reveals nothing about the data behind the gate.
    pub fn ensure_any_role(&self, roles: &[UserRole]) -> ApiResult<()> {
        if self.has_any_role(roles) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Insufficient role for this resource"))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
