use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::domain::Role;
use crate::services::auth::{
    claims::{Claims, TokenClaims},
    key::SigningKey,
};

/// Errors returned by access-token verification + claim reconstruction.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),

    #[error("unknown role '{0}' in token")]
    UnknownRole(String),
}

/// HS256 access-token verifier.
///
/// `jsonwebtoken::Validation` is configured to check:
/// - signature (HS256 only)
/// - `exp` (required, no leeway)
///
/// Issuer and audience are not checked: the service is single-tenant.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Verify a bearer token and rebuild the request's claims from it.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.email.trim().is_empty() {
            return Err(TokenError::EmptyClaim("email"));
        }

        // Tokens are only ever written with canonical names.
        let Some(role) = Role::from_canonical(&claims.role) else {
            return Err(TokenError::UnknownRole(claims.role));
        };

        Ok(Claims::new(claims.email, role, claims.exp))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::domain::Principal;
    use crate::services::auth::token_issuer::{TOKEN_TTL_SECONDS, TokenIssuer};

    fn key() -> SigningKey {
        SigningKey::new("unit-test-signing-key-0123456789abcdef")
    }

    fn editor() -> Principal {
        Principal {
            id: 7,
            email: "ed@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::Editor,
        }
    }

    #[test]
    fn issued_token_validates_to_the_same_identity() {
        let issued = TokenIssuer::new(&key()).issue(&editor()).unwrap();
        let claims = TokenValidator::new(&key()).validate(&issued.token).unwrap();

        assert_eq!(claims.email(), "ed@example.com");
        assert_eq!(claims.role(), Role::Editor);
        assert_eq!(claims.expires_at(), issued.expires_at.timestamp());
    }

    #[test]
    fn expiry_is_three_hours_after_issuance() {
        let now = Utc::now();
        let issued = TokenIssuer::new(&key()).issue_at(&editor(), now).unwrap();
        assert_eq!(
            issued.expires_at.timestamp() - now.timestamp(),
            TOKEN_TTL_SECONDS
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued_at = Utc::now() - Duration::hours(4);
        let issued = TokenIssuer::new(&key())
            .issue_at(&editor(), issued_at)
            .unwrap();

        let err = TokenValidator::new(&key())
            .validate(&issued.token)
            .unwrap_err();
        assert!(matches!(err, TokenError::Jwt(_)));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let issued = TokenIssuer::new(&key()).issue(&editor()).unwrap();

        let (head, signature) = issued.token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{}", chars.into_iter().collect::<String>());

        assert!(TokenValidator::new(&key()).validate(&tampered).is_err());
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let other = SigningKey::new("some-other-signing-key-fedcba9876543210");
        let issued = TokenIssuer::new(&other).issue(&editor()).unwrap();
        let validator = TokenValidator::new(&key());
        assert!(validator.validate(&issued.token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let validator = TokenValidator::new(&key());
        for token in ["", "not-a-jwt", "a.b.c", "Bearer x.y.z"] {
            assert!(validator.validate(token).is_err(), "{token:?} accepted");
        }
    }

    #[test]
    fn issuer_and_audience_are_ignored() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({
                "email": "a@example.com",
                "role": "ADMIN",
                "iat": 0,
                "exp": exp,
                "iss": "someone-else",
                "aud": "another-service",
            }),
            &EncodingKey::from_secret(key().as_bytes()),
        )
        .unwrap();

        let claims = TokenValidator::new(&key()).validate(&token).unwrap();
        assert_eq!(claims.role(), Role::Admin);
    }

    #[test]
    fn signed_token_with_non_canonical_role_is_rejected() {
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({"email": "a@example.com", "role": "admin", "iat": 0, "exp": exp}),
            &EncodingKey::from_secret(key().as_bytes()),
        )
        .unwrap();

        let err = TokenValidator::new(&key()).validate(&token).unwrap_err();
        assert!(matches!(err, TokenError::UnknownRole(r) if r == "admin"));
    }

    #[test]
    fn token_without_expiry_is_rejected() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({"email": "a@example.com", "role": "ADMIN", "iat": 0}),
            &EncodingKey::from_secret(key().as_bytes()),
        )
        .unwrap();

        assert!(TokenValidator::new(&key()).validate(&token).is_err());
    }
}
