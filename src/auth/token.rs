use crate::error::AppError;
use crate::store::EntityId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: EntityId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch). Absent when expiry is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

/// Issues and verifies HS256 bearer tokens carrying a user id.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: Option<u64>,
}

impl TokenService {
    /// `ttl_hours = None` issues tokens without an `exp` claim, valid indefinitely.
    pub fn new(secret: &str, ttl_hours: Option<u64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match ttl_hours {
            Some(_) => {
                validation.validate_exp = true;
                validation.leeway = 0;
            }
            None => {
                validation.validate_exp = false;
                validation.required_spec_claims = HashSet::new();
            }
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_hours,
        }
    }

    /// Generates a token for `user_id`.
    pub fn issue(&self, user_id: EntityId) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let exp = match self.ttl_hours {
            Some(hours) => {
                let lifetime = i64::try_from(hours)
                    .ok()
                    .and_then(chrono::Duration::try_hours)
                    .ok_or_else(|| {
                        AppError::InternalServerError("Token lifetime out of range".into())
                    })?;
                let expires = now.checked_add_signed(lifetime).ok_or_else(|| {
                    AppError::InternalServerError("Token expiry overflow".into())
                })?;
                Some(expires.timestamp() as usize)
            }
            None => None,
        };

        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies `token` and returns the user id it was issued for.
    ///
    /// Fails with `AppError::InvalidToken` on a bad signature, an unparseable payload or
    /// an expired token.
    pub fn verify(&self, token: &str) -> Result<EntityId, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims.sub)
    }
}
