use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::user::{Credentials, RefreshTokenRequest, TokenPair, UserResponse};
use crate::service::auth::AuthService;
use crate::token::TokenAuthority;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Exchange email and password for an access/refresh token pair
#[openapi(tag = "Auth")]
#[post("/login", data = "<payload>")]
pub async fn login(pool: &State<PgPool>, tokens: &State<TokenAuthority>, payload: JsonBody<Credentials>) -> Result<Json<TokenPair>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let pair = AuthService::new(&repo, tokens.inner()).authenticate(&payload).await?;
    Ok(Json(pair))
}

/// The user behind the bearer token
#[openapi(tag = "Auth")]
#[get("/me")]
pub async fn me(current_user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&current_user.0))
}

/// Trade a refresh token for a new token pair
#[openapi(tag = "Auth")]
#[put("/token", data = "<payload>")]
pub async fn refresh_token(pool: &State<PgPool>, tokens: &State<TokenAuthority>, payload: JsonBody<RefreshTokenRequest>) -> Result<Json<TokenPair>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let pair = AuthService::new(&repo, tokens.inner()).refresh_tokens(&payload).await?;
    Ok(Json(pair))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![login, me, refresh_token]
}
