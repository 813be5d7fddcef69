use std::fmt;

/// HMAC-SHA256 secret shared by the issuer and the validator.
///
/// Loaded once at startup and never rotated while the process runs.
/// `Debug` prints only the length.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Minimum accepted length outside development (HS256 block-size guidance).
    pub const MIN_PRODUCTION_LEN: usize = 32;

    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({} bytes)", self.0.len())
    }
}
