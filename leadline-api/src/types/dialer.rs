//! Dialer token API types

use leadline_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Response carrying a freshly minted browser voice token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DialerTokenResponse {
    /// Provider-shaped JWT the dialer hands to the voice SDK
    pub token: String,
    /// Identity the token was minted for (derived from the caller)
    pub identity: String,
    /// When the token stops working
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub expires_at: Timestamp,
}
