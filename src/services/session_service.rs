use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::decode_header;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::TokenError;

/// Claims carried by the session token. Nothing here is verified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionClaims {
    pub token_type: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
    pub jti: Option<String>,
    pub user_id: Option<serde_json::Value>,
}

impl SessionClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|at| at <= now).unwrap_or(false)
    }
}

// Read the payload of a session token without the server's signing key.
// The service signs with RS256, so no key family is assumed here.
pub fn inspect_token(token: &str) -> Result<SessionClaims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(TokenError::Segments),
    };

    let header = decode_header(token).map_err(TokenError::Header)?;
    debug!("Session token signed with {:?}", header.alg);

    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(TokenError::Payload)?;
    serde_json::from_slice(&bytes).map_err(TokenError::Claims)
}
