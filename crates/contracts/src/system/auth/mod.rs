use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::shared::serde_helpers::string_or_number;
use crate::system::users::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Claims carried in the access token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String, // user_id
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64, // expiration timestamp, seconds
    #[serde(default)]
    pub iat: Option<i64>, // issued at
}

impl TokenClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// The signature is not checked here; the server remains the authority and
    /// rejects forged tokens with 401.
    pub fn decode(token: &str) -> Result<Self, String> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err("Malformed token".into()),
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| format!("Invalid token encoding: {}", e))?;
        serde_json::from_slice(&bytes).map_err(|e| format!("Invalid token claims: {}", e))
    }

    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Outcome of reconciling persisted session keys at startup
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResolution {
    /// Nothing stored
    Anonymous,
    /// Token is usable; `user_id` is the reconciled identifier
    Authenticated {
        token: String,
        user_id: String,
        claims: TokenClaims,
    },
    /// Stored state must be wiped
    Invalidated { reason: String },
}

/// Reconcile a stored token with the stored user id.
///
/// A missing user id is recovered from the `sub` claim; a user id that
/// disagrees with the token invalidates the session.
pub fn reconcile_session(
    token: Option<&str>,
    stored_user_id: Option<&str>,
    now_secs: i64,
) -> SessionResolution {
    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => {
            return match stored_user_id {
                Some(_) => SessionResolution::Invalidated {
                    reason: "User id stored without a token".into(),
                },
                None => SessionResolution::Anonymous,
            };
        }
    };

    let claims = match TokenClaims::decode(token) {
        Ok(claims) => claims,
        Err(reason) => return SessionResolution::Invalidated { reason },
    };

    if claims.is_expired(now_secs) {
        return SessionResolution::Invalidated {
            reason: "Token expired".into(),
        };
    }

    match stored_user_id.filter(|id| !id.is_empty()) {
        Some(id) if id != claims.sub => SessionResolution::Invalidated {
            reason: format!("Stored user id {} does not match token subject", id),
        },
        _ => SessionResolution::Authenticated {
            token: token.to_string(),
            user_id: claims.sub.clone(),
            claims,
        },
    }
}
