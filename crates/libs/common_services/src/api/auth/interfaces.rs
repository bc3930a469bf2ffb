use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents the claims contained within an access token.
///
/// Tokens are issued by the authentication service; this service only verifies them.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct AuthClaims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
}
