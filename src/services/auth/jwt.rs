use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::error;

use crate::error::AppError;
use crate::services::auth::key::SigningKey;

/// HS256 signer. Holds the encoding key derived from the process signing key.
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
}

impl JwtSigner {
    pub fn new(key: &SigningKey) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
        }
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Unclassified("failed to sign access token".to_string())
        })
    }
}
