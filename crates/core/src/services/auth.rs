//! Authentication service: credential verification and bearer tokens.
//!
//! Turns an email/password pair into a signed JWT and a presented JWT back
//! into a verified principal email. Token verification never touches survey
//! data.

use canvass_common::{AppError, AppResult, Config};
use canvass_db::repositories::UserRepository;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::user::verify_password;

/// JWT claims carried by issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Principal email.
    pub sub: String,
    /// Token issuer.
    pub iss: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    secret: String,
    issuer: String,
    token_ttl_secs: i64,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &Config) -> Self {
        Self {
            user_repo,
            secret: config.auth.jwt_secret.clone(),
            issuer: config.auth.issuer.clone(),
            token_ttl_secs: config.auth.token_ttl_secs,
        }
    }

    /// Verify credentials and issue a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        self.issue(&user.email)
    }

    /// Issue a token for a verified principal.
    pub fn issue(&self, email: &str) -> AppResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            iss: self.issuer.clone(),
            exp: now + self.token_ttl_secs,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a presented token and return the principal email.
    ///
    /// Any signature, expiry or issuer failure maps to `Unauthorized`.
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(data.claims.sub)
    }
}
