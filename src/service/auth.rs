use crate::database::user::{UserRepository, dummy_verify, verify_password};
use crate::error::app_error::AppError;
use crate::models::user::{Credentials, RefreshTokenRequest, TokenPair, User};
use crate::token::{TokenAuthority, TokenType};
use rocket::Request;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct AuthService<'a, R: UserRepository + ?Sized> {
    repository: &'a R,
    tokens: &'a TokenAuthority,
}

impl<'a, R: UserRepository + ?Sized> AuthService<'a, R> {
    pub fn new(repository: &'a R, tokens: &'a TokenAuthority) -> Self {
        AuthService { repository, tokens }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, AppError> {
        credentials.validate()?;

        let Some(user) = self.repository.find_user_by_email(&credentials.email).await? else {
            dummy_verify(&credentials.password);
            return Err(AppError::Unauthorized);
        };
        verify_password(&user, &credentials.password)?;

        info!(user_id = %user.uuid, role = %user.role, "user authenticated");
        self.tokens.issue_pair(&user)
    }

    /// Resolves a bearer access token to its stored user.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        let claims = self.tokens.parse_typed(token, TokenType::Access)?;
        let subject = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        self.repository.find_user_by_uuid(&subject).await?.ok_or(AppError::Unauthorized)
    }

    pub async fn refresh_tokens(&self, request: &RefreshTokenRequest) -> Result<TokenPair, AppError> {
        request.validate()?;

        let claims = self.tokens.parse_typed(&request.refresh_token, TokenType::Refresh)?;
        let subject = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        let user = self.repository.find_user_by_uuid(&subject).await?.ok_or(AppError::Unauthorized)?;

        info!(user_id = %user.uuid, "tokens refreshed");
        self.tokens.issue_pair(&user)
    }
}

/// The user resolved by the auth guard for this request.
pub fn authenticated_user(req: &Request<'_>) -> Result<User, AppError> {
    req.local_cache(|| None::<User>).clone().ok_or(AppError::Unauthorized)
}
