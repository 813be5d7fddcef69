use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::services::strict_enum::{self, InvalidEnumValue, StrictEnum};

/// Role granted to a principal.
///
/// There is no hierarchy: `Admin` does not imply `Editor`. Routes list every
/// role they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Editor,
}

impl StrictEnum for Role {
    const TYPE_NAME: &'static str = "Role";
    const VARIANTS: &'static [Self] = &[Role::Admin, Role::Editor];

    fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
        }
    }
}

impl Role {
    pub fn as_str(self) -> &'static str {
        StrictEnum::as_str(self)
    }

    /// Strict decode of an inbound wire value.
    pub fn decode(raw: &Value) -> Result<Self, InvalidEnumValue> {
        strict_enum::decode(raw)
    }

    /// Exact match against the canonical name (no case folding).
    ///
    /// Used for values this service wrote itself, e.g. signed token claims
    /// or stored rows.
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        strict_enum::encode(*self).serialize(serializer)
    }
}
