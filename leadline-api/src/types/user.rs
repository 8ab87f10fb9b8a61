//! User-related API types

use crate::auth::AuthContext;
use leadline_core::{EntityId, UserRole};
use serde::{Deserialize, Serialize};

/// The authenticated caller, as served by `/users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MeResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub user_id: EntityId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
}

impl From<&AuthContext> for MeResponse {
    fn from(auth: &AuthContext) -> Self {
        Self {
            user_id: auth.user_id,
            email: auth.email.clone(),
            first_name: auth.first_name.clone(),
            last_name: auth.last_name.clone(),
            role: auth.role,
        }
    }
}
