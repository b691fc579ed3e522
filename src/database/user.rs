use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{Role, User};
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use sqlx::Row;
use sqlx::postgres::PgRow;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

/// A real Argon2 hash generated once, used as a timing decoy
/// so that logins for unknown emails cost the same as for known ones.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-never-matches", Salt::from(&salt))
        .ok()
        .map(|hash| hash.to_string())
});

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_uuid(&self, uuid: &Uuid) -> Result<Option<User>, AppError>;
}

/// The user lookup the auth guards resolve tokens against, managed as Rocket state.
pub type UserStore = Arc<dyn UserRepository>;

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, uuid, email, password, role
            FROM tb_user
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to find user by email", e))?;

        row.as_ref().map(map_row_to_user).transpose().map_err(|e| AppError::db("Failed to map user", e))
    }

    async fn find_user_by_uuid(&self, uuid: &Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, uuid, email, password, role
            FROM tb_user
            WHERE uuid = $1
            "#,
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to find user by uuid", e))?;

        row.as_ref().map(map_row_to_user).transpose().map_err(|e| AppError::db("Failed to map user", e))
    }
}

fn map_row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        role: role.parse::<Role>().map_err(|e| sqlx::Error::Decode(e.into()))?,
    })
}

/// Compares `password` against the stored Argon2 hash. A mismatch is `Unauthorized`.
pub fn verify_password(user: &User, password: &str) -> Result<(), AppError> {
    let password_hash = PasswordHash::new(&user.password_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &password_hash)
        .map_err(|_| AppError::Unauthorized)
}

/// Perform a throwaway Argon2 verification to equalize response timing
/// regardless of whether the target account exists.
pub fn dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref().and_then(|hash| PasswordHash::new(hash).ok()) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
    }
}
