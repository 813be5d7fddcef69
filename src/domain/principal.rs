use std::fmt;

use crate::domain::role::Role;

const MAX_FIELD_LEN: usize = 255;

/// Form an email takes both when stored and when looked up at login.
pub fn normalize_email(raw: &str) -> &str {
    raw.trim()
}

/// Stored identity record.
///
/// `password` is an opaque secret compared by exact match; it never appears in
/// `Debug` output or responses.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// A principal that has not been persisted yet.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPrincipal {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for NewPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewPrincipal")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl NewPrincipal {
    /// Collect every field problem, in a stable order.
    ///
    /// `role` is `None` when the client omitted it; a present but invalid role
    /// is rejected earlier by the strict codec.
    pub fn validate(email: &str, password: &str, role: Option<Role>) -> Result<Self, Vec<String>> {
        let email = normalize_email(email);
        let mut errors = Vec::new();

        if email.is_empty() {
            errors.push("Email field cannot be empty".to_string());
        } else if email.len() > MAX_FIELD_LEN {
            errors.push(format!("Email must be at most {MAX_FIELD_LEN} characters"));
        }
        if password.is_empty() {
            errors.push("Password field must be filled".to_string());
        } else if password.len() > MAX_FIELD_LEN {
            errors.push(format!("Password must be at most {MAX_FIELD_LEN} characters"));
        }
        if role.is_none() {
            errors.push("Role field cannot be empty".to_string());
        }

        match role {
            Some(role) if errors.is_empty() => Ok(Self {
                email: email.to_string(),
                password: password.to_string(),
                role,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_all_missing_fields_in_order() {
        let errors = NewPrincipal::validate("  ", "", None).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Email field cannot be empty",
                "Password field must be filled",
                "Role field cannot be empty",
            ]
        );
    }

    #[test]
    fn rejects_overlong_fields() {
        let long = "a".repeat(256);
        let errors = NewPrincipal::validate(&long, &long, Some(Role::Editor)).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Email must be at most 255 characters",
                "Password must be at most 255 characters",
            ]
        );
    }

    #[test]
    fn accepts_complete_input() {
        let p = NewPrincipal::validate(" ed@example.com ", "s3cret", Some(Role::Editor)).unwrap();
        assert_eq!(p.email, "ed@example.com");
        assert_eq!(p.role, Role::Editor);
    }

    #[test]
    fn stored_and_login_emails_normalize_alike() {
        let stored = NewPrincipal::validate(" ed@example.com ", "pw", Some(Role::Editor)).unwrap();
        assert_eq!(normalize_email("  ed@example.com\t"), stored.email);
    }

    #[test]
    fn debug_hides_the_secret() {
        let p = Principal {
            id: 1,
            email: "a@b.c".into(),
            password: "hunter2".into(),
            role: Role::Admin,
        };
        assert!(!format!("{p:?}").contains("hunter2"));
    }
}
