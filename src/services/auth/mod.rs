pub mod claims;
pub mod jwt;
pub mod key;
pub mod policy;
pub mod token_issuer;
pub mod token_validator;

pub use claims::Claims;
pub use key::SigningKey;
pub use policy::{AccessDenied, RequiredRoles};
pub use token_issuer::{IssuedToken, TOKEN_TTL_SECONDS, TokenIssuer};
pub use token_validator::{TokenError, TokenValidator};

/// Issuer + validator built from the one process-wide signing key.
///
/// Constructed once in `app::build_state` and shared read-only through
/// `AppState`.
#[derive(Clone, Debug)]
pub struct AuthService {
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl AuthService {
    pub fn new(key: &SigningKey) -> Self {
        Self {
            issuer: TokenIssuer::new(key),
            validator: TokenValidator::new(key),
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }
}
