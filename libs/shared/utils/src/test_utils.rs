use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use shared_config::AppConfig;
use shared_models::auth::User;

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
    pub sendgrid_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: "postgres://localhost:5432/medcare_test".to_string(),
            sendgrid_base_url: "http://localhost:9999".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            sendgrid_api_key: "test-sendgrid-key".to_string(),
            sendgrid_from_email: "noreply@medcare.test".to_string(),
            sendgrid_base_url: self.sendgrid_base_url.clone(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 0,
        }
    }
}

pub struct TestUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn new(id: i32, email: &str, role: &str) -> Self {
        Self {
            id,
            name: "Test User".to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self::new(1, email, "patient")
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(2, email, "doctor")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(3, email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Mint an HS256 token the way the auth middleware expects it.
    pub fn create_token(user: &TestUser, secret: &str) -> String {
        let expiry = Utc::now() + Duration::hours(1);
        Self::create_token_with_expiry(user, secret, expiry.timestamp())
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        let expiry = Utc::now() - Duration::hours(1);
        Self::create_token_with_expiry(user, secret, expiry.timestamp())
    }

    fn create_token_with_expiry(user: &TestUser, secret: &str, exp: i64) -> String {
        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });
        let claims = json!({
            "sub": user.id.to_string(),
            "exp": exp,
            "iat": Utc::now().timestamp(),
            "name": user.name,
            "email": user.email,
            "role": user.role,
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }
}
