use chrono::{DateTime, Duration, Utc};

use crate::domain::Principal;
use crate::error::AppError;
use crate::services::auth::{claims::TokenClaims, jwt::JwtSigner, key::SigningKey};

/// Fixed access-token lifetime (3 hours). There is no sliding expiry and no renewal.
pub const TOKEN_TTL_SECONDS: i64 = 3 * 60 * 60;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn expires_in_seconds(&self) -> i64 {
        TOKEN_TTL_SECONDS
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    jwt: JwtSigner,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(key: &SigningKey) -> Self {
        Self {
            jwt: JwtSigner::new(key),
        }
    }

    /// Issue an access token for an authenticated principal.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, AppError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue with an explicit issuance time; expiry is `issued_at + TOKEN_TTL_SECONDS`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = issued_at + Duration::seconds(TOKEN_TTL_SECONDS);

        let claims = TokenClaims {
            email: principal.email.clone(),
            role: principal.role.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = self.jwt.sign(&claims)?;

        Ok(IssuedToken { token, expires_at })
    }
}
