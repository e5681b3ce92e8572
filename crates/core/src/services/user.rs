//! User (form owner) service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use canvass_common::{AppError, AppResult, IdGenerator};
use canvass_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = validate_password_strength))]
    pub password: String,
}

/// Listing capability: either the unscoped administrative listing or a
/// listing restricted to one owner. Owner-scoped callers can never obtain
/// the global list by accident.
#[derive(Debug, Clone)]
pub enum ListScope {
    /// Administrative listing of every account.
    Admin,
    /// Only the account matching this email.
    Owner(String),
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new owner account.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        // Email uniqueness (case-sensitive exact match)
        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.user_repo.create(model).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_email(email).await
    }

    /// List accounts under the given capability.
    pub async fn list(&self, scope: ListScope) -> AppResult<Vec<user::Model>> {
        match scope {
            ListScope::Admin => self.user_repo.list().await,
            ListScope::Owner(email) => {
                Ok(self.user_repo.find_by_email(&email).await?.into_iter().collect())
            }
        }
    }

    /// Count all accounts.
    pub async fn count(&self) -> AppResult<u64> {
        self.user_repo.count().await
    }

    /// Delete an account, cascading to its forms, sections and stats.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.user_repo.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::UserNotFound(id.to_string()))
        }
    }
}

/// Hash a password using Argon2.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password must be at least 8 characters and contain at least one
/// uppercase letter, one lowercase letter and one digit.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must be at least 8 characters long and contain at least one uppercase \
             letter, one lowercase letter, and one number"
                .into(),
        ))
    }
}
