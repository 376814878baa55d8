use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// What the authenticated principal may do. Evaluated once per request by
/// the auth middleware and attached as a request extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthCapabilities {
    pub can_book: bool,
    pub can_administer: bool,
    pub can_view_own: bool,
}

impl AuthCapabilities {
    pub fn for_role(role: Option<&str>) -> Self {
        match role {
            Some("admin") => Self {
                can_book: true,
                can_administer: true,
                can_view_own: true,
            },
            Some("doctor") => Self {
                can_book: false,
                can_administer: false,
                can_view_own: true,
            },
            // Unknown roles fall back to the patient capability set.
            _ => Self {
                can_book: true,
                can_administer: false,
                can_view_own: true,
            },
        }
    }

    pub fn none() -> Self {
        Self {
            can_book: false,
            can_administer: false,
            can_view_own: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_can_book_but_not_administer() {
        let caps = AuthCapabilities::for_role(Some("patient"));
        assert!(caps.can_book);
        assert!(caps.can_view_own);
        assert!(!caps.can_administer);
    }

    #[test]
    fn admin_gets_every_capability() {
        let caps = AuthCapabilities::for_role(Some("admin"));
        assert!(caps.can_book);
        assert!(caps.can_administer);
        assert!(caps.can_view_own);
    }

    #[test]
    fn doctor_only_views_own() {
        let caps = AuthCapabilities::for_role(Some("doctor"));
        assert!(!caps.can_book);
        assert!(!caps.can_administer);
        assert!(caps.can_view_own);
    }

    #[test]
    fn missing_role_defaults_to_patient() {
        let caps = AuthCapabilities::for_role(None);
        assert!(caps.can_book);
        assert!(!caps.can_administer);
    }
}
