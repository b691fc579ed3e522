use crate::database::user::UserStore;
use crate::error::app_error::AppError;
use crate::models::user::{Role, User};
use crate::service::auth::AuthService;
use crate::token::TokenAuthority;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{Object, Responses, SecurityRequirement, SecurityScheme, SecuritySchemeData};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use std::marker::PhantomData;
use tracing::error;

/// The user behind a valid bearer access token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub(crate) fn bearer_token(header: Option<&str>) -> Option<&str> {
    header.filter(|value| value.starts_with("Bearer "))
}

/// Validates the request's bearer token against the managed user store and
/// caches the user for `authenticated_user`. The cache is written only on success.
pub(crate) async fn resolve_current_user(req: &Request<'_>) -> Result<User, AppError> {
    let header = bearer_token(req.headers().get_one("Authorization")).ok_or(AppError::Unauthorized)?;

    let (Some(users), Some(tokens)) = (req.rocket().state::<UserStore>(), req.rocket().state::<TokenAuthority>()) else {
        return Err(AppError::Internal("auth state not managed".to_string()));
    };

    let user = AuthService::new(users.as_ref(), tokens).validate_token(header).await?;
    req.local_cache(|| Some(user.clone()));
    Ok(user)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        match resolve_current_user(req).await {
            Ok(user) => Outcome::Success(CurrentUser(user)),
            Err(err) => {
                let status = Status::from(&err);
                if status.class().is_server_error() {
                    error!(error = ?err, uri = %req.uri(), "failed to authenticate request");
                }
                Outcome::Error((status, err))
            }
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for CurrentUser {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        let security_scheme = SecurityScheme {
            description: Some("Bearer access token obtained from POST /auth/login.".to_string()),
            data: SecuritySchemeData::Http {
                scheme: "bearer".to_string(),
                bearer_format: Some("JWT".to_string()),
            },
            extensions: Object::default(),
        };

        let mut security_req = SecurityRequirement::new();
        security_req.insert("bearerAuth".to_string(), Vec::new());

        Ok(RequestHeaderInput::Security("bearerAuth".to_string(), security_scheme, security_req))
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = Responses::default();
        responses.responses.insert(
            "401".to_string(),
            RefOr::Object(Response {
                description: "Unauthorized - Authentication required".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}

pub trait RequiredRole: Send + Sync + 'static {
    const ROLE: Role;
}

pub struct PatientOnly;
pub struct DoctorOnly;

impl RequiredRole for PatientOnly {
    const ROLE: Role = Role::Patient;
}

impl RequiredRole for DoctorOnly {
    const ROLE: Role = Role::Doctor;
}

pub(crate) fn check_role(user: &User, required: Role) -> Result<(), AppError> {
    if user.role == required {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("requires role {}", required)))
    }
}

/// An authenticated user whose stored role is `R::ROLE`.
pub struct AllowedRole<R: RequiredRole> {
    pub user: User,
    role: PhantomData<R>,
}

#[rocket::async_trait]
impl<'r, R: RequiredRole> FromRequest<'r> for AllowedRole<R> {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let user = match req.guard::<CurrentUser>().await {
            Outcome::Success(CurrentUser(user)) => user,
            Outcome::Error(failure) => return Outcome::Error(failure),
            Outcome::Forward(status) => return Outcome::Forward(status),
        };

        match check_role(&user, R::ROLE) {
            Ok(()) => Outcome::Success(AllowedRole { user, role: PhantomData }),
            Err(err) => Outcome::Error((Status::Forbidden, err)),
        }
    }
}

impl<'a, R: RequiredRole> OpenApiFromRequest<'a> for AllowedRole<R> {
    fn from_request_input(generator: &mut OpenApiGenerator, name: String, required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        CurrentUser::from_request_input(generator, name, required)
    }

    fn get_responses(generator: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response};
        let mut responses = CurrentUser::get_responses(generator)?;
        responses.responses.insert(
            "403".to_string(),
            RefOr::Object(Response {
                description: format!("Forbidden - {} role required", R::ROLE),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}
