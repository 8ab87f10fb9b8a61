//! Telephony Provider Client
//!
//! Outbound HTTP to the telephony provider: downloading call recordings
//! with account Basic auth, and minting the short-lived browser voice
//! tokens the dialer hands to the provider's JS SDK.
//!
//! Built once at startup and cloned into route state; the inner
//! `reqwest::Client` pools connections internally. Credential gaps are
//! surfaced per operation (configuration errors, 500 class) rather than at
//! construction, so a deployment without a telephony account still serves
//! every read-only endpoint.

use crate::config::TwilioConfig;
use crate::error::{ApiError, ApiResult};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use leadline_core::Timestamp;
use rand::distr::{Alphanumeric, SampleString};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound request timeout for provider calls.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifetime of a browser voice token.
const VOICE_TOKEN_TTL_SECS: i64 = 3600;

/// Content type assumed when the provider omits one on recording media.
const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

// ============================================================================
// CLIENT
// ============================================================================

/// HTTP client for the telephony provider account.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    /// Build the client with the provider account configuration.
    pub fn new(config: TwilioConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| ApiError::internal_error(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Download a stored call recording.
    ///
    /// The stored URL is the provider's resource URL; an extensionless one
    /// is fetched as its `.mp3` rendition. Authenticates with the account
    /// SID/auth token pair as Basic credentials. Missing credentials are a
    /// configuration error; an unreachable provider or a non-success
    /// response maps to the upstream error class. No retries.
    pub async fn fetch_recording(&self, recording_url: &str) -> ApiResult<RecordingAudio> {
        let (account_sid, auth_token) = match (&self.config.account_sid, &self.config.auth_token) {
            (Some(sid), Some(token)) => (sid, token),
            _ => {
                return Err(ApiError::internal_error(
                    "Telephony credentials are not configured",
                ))
            }
        };

        let url = media_url(recording_url);

        let response = self
            .http
            .get(&url)
            .basic_auth(account_sid, Some(auth_token.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "recording fetch was refused upstream");
            return Err(ApiError::upstream(format!(
                "Provider returned {} for recording fetch",
                status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
            .to_string();

        let bytes = response.bytes().await?.to_vec();

        Ok(RecordingAudio {
            bytes,
            content_type,
        })
    }

    /// Mint a browser voice token for the dialer.
    ///
    /// Provider-shaped JWT: content type `twilio-fpa;v=1`, issued by the
    /// API key, subject is the account, and a voice grant routing outgoing
    /// calls through the configured TwiML application. Signed HS256 with
    /// the API key secret. The `jti` carries a random suffix so concurrent
    /// tokens for one identity stay distinct.
    pub fn mint_voice_token(&self, identity: &str) -> ApiResult<VoiceToken> {
        let (account_sid, api_key_sid, api_key_secret, app_sid) = match (
            &self.config.account_sid,
            &self.config.api_key_sid,
            &self.config.api_key_secret,
            &self.config.twiml_app_sid,
        ) {
            (Some(account), Some(key), Some(secret), Some(app)) => (account, key, secret, app),
            _ => {
                return Err(ApiError::internal_error(
                    "Voice token credentials are not configured",
                ))
            }
        };

        let now = chrono::Utc::now();
        let expires_at = now + chrono::Duration::seconds(VOICE_TOKEN_TTL_SECS);
        let suffix = Alphanumeric.sample_string(&mut rand::rng(), 16);

        let claims = VoiceTokenClaims {
            jti: format!("{}-{}", api_key_sid, suffix),
            iss: api_key_sid.clone(),
            sub: account_sid.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            grants: VoiceGrants {
                identity: identity.to_string(),
                voice: VoiceGrant {
                    outgoing: OutgoingGrant {
                        application_sid: app_sid.clone(),
                    },
                },
            },
        };

        let mut header = Header::new(Algorithm::HS256);
        header.cty = Some("twilio-fpa;v=1".to_string());

        let key = EncodingKey::from_secret(api_key_secret.expose_secret().as_bytes());
        let token = encode(&header, &claims, &key)
            .map_err(|e| ApiError::internal_error(format!("Failed to sign voice token: {}", e)))?;

        Ok(VoiceToken { token, expires_at })
    }
}

/// A downloaded recording, buffered in memory.
#[derive(Debug, Clone)]
pub struct RecordingAudio {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// A minted browser voice token.
#[derive(Debug, Clone)]
pub struct VoiceToken {
    pub token: String,
    pub expires_at: Timestamp,
}

// ============================================================================
// VOICE TOKEN CLAIMS
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct VoiceTokenClaims {
    jti: String,
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
    grants: VoiceGrants,
}

#[derive(Debug, Serialize, Deserialize)]
struct VoiceGrants {
    identity: String,
    voice: VoiceGrant,
}

#[derive(Debug, Serialize, Deserialize)]
struct VoiceGrant {
    outgoing: OutgoingGrant,
}

#[derive(Debug, Serialize, Deserialize)]
struct OutgoingGrant {
    application_sid: String,
}

// ============================================================================
// URL HELPERS
// ============================================================================

/// Resolve the media URL for a stored recording resource.
///
/// The provider stores recordings under an extensionless resource URL and
/// serves renditions by extension; an URL that already names a rendition
/// is used as-is.
fn media_url(recording_url: &str) -> String {
    if recording_url.ends_with(".mp3") || recording_url.ends_with(".wav") {
        recording_url.to_string()
    } else {
        format!("{}.mp3", recording_url)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use secrecy::SecretString;

    fn full_config() -> TwilioConfig {
        TwilioConfig {
            account_sid: Some("AC0000000000000000000000000000test".to_string()),
            auth_token: Some(SecretString::from("auth-token")),
            api_key_sid: Some("SK0000000000000000000000000000test".to_string()),
            api_key_secret: Some(SecretString::from("api-key-secret")),
            twiml_app_sid: Some("AP0000000000000000000000000000test".to_string()),
            caller_id: Some("+15555550100".to_string()),
        }
    }

    fn empty_config() -> TwilioConfig {
        TwilioConfig {
            account_sid: None,
            auth_token: None,
            api_key_sid: None,
            api_key_secret: None,
            twiml_app_sid: None,
            caller_id: None,
        }
    }

    #[test]
    fn test_media_url_appends_rendition_suffix() {
        assert_eq!(
            media_url("https://api.example.test/Recordings/RE123"),
            "https://api.example.test/Recordings/RE123.mp3"
        );
        assert_eq!(
            media_url("https://api.example.test/Recordings/RE123.mp3"),
            "https://api.example.test/Recordings/RE123.mp3"
        );
        assert_eq!(
            media_url("https://api.example.test/Recordings/RE123.wav"),
            "https://api.example.test/Recordings/RE123.wav"
        );
    }

    #[tokio::test]
    async fn test_fetch_recording_without_credentials_is_config_error() -> Result<(), String> {
        let client = TwilioClient::new(empty_config()).map_err(|e| e.to_string())?;

        let err = client
            .fetch_recording("https://api.example.test/Recordings/RE123")
            .await
            .unwrap_err();

        // A configuration gap is server-side, not an upstream failure.
        assert_eq!(err.code, ErrorCode::Internal);
        Ok(())
    }

    #[test]
    fn test_mint_voice_token_without_credentials_is_config_error() -> Result<(), String> {
        let client = TwilioClient::new(empty_config()).map_err(|e| e.to_string())?;

        let err = client.mint_voice_token("user-1").unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
        Ok(())
    }

    #[test]
    fn test_minted_token_carries_voice_grant() -> Result<(), String> {
        let client = TwilioClient::new(full_config()).map_err(|e| e.to_string())?;

        let minted = client
            .mint_voice_token("agent:42")
            .map_err(|e| e.to_string())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let decoded = decode::<VoiceTokenClaims>(
            &minted.token,
            &DecodingKey::from_secret("api-key-secret".as_bytes()),
            &validation,
        )
        .map_err(|e| e.to_string())?;

        assert_eq!(decoded.header.cty.as_deref(), Some("twilio-fpa;v=1"));

        let claims = decoded.claims;
        assert_eq!(claims.iss, "SK0000000000000000000000000000test");
        assert_eq!(claims.sub, "AC0000000000000000000000000000test");
        assert_eq!(claims.grants.identity, "agent:42");
        assert_eq!(
            claims.grants.voice.outgoing.application_sid,
            "AP0000000000000000000000000000test"
        );
        assert_eq!(claims.exp - claims.iat, VOICE_TOKEN_TTL_SECS);
        assert!(claims.jti.starts_with("SK0000000000000000000000000000test-"));
        assert_eq!(minted.expires_at.timestamp(), claims.exp);
        Ok(())
    }

    #[test]
    fn test_minted_tokens_have_distinct_jti() -> Result<(), String> {
        let client = TwilioClient::new(full_config()).map_err(|e| e.to_string())?;

        let a = client.mint_voice_token("agent:1").map_err(|e| e.to_string())?;
        let b = client.mint_voice_token("agent:1").map_err(|e| e.to_string())?;
        assert_ne!(a.token, b.token);
        Ok(())
    }
}
