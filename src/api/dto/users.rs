use serde::{Deserialize, Serialize};

use crate::domain::{Principal, Role};

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Public view of a principal; the secret is never serialized.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&Principal> for UserResponse {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            email: p.email.clone(),
            role: p.role,
        }
    }
}
