use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PATIENT" => Ok(Role::Patient),
            "DOCTOR" => Ok(Role::Doctor),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub uuid: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Deserialize, Debug, Default, Validate, JsonSchema)]
pub struct Credentials {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize, Debug, Default, Validate, JsonSchema)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub access_token: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    pub refresh_token: String,
    #[serde(default)]
    #[validate(custom(function = "validate_grant_type"))]
    pub grant_type: String,
}

fn validate_grant_type(grant_type: &str) -> Result<(), ValidationError> {
    if grant_type.is_empty() {
        let mut error = ValidationError::new("length");
        error.message = Some(Cow::from("required"));
        return Err(error);
    }
    if grant_type != REFRESH_TOKEN_GRANT_TYPE {
        let mut error = ValidationError::new("grant_type");
        error.message = Some(Cow::from("invalid"));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_storage_text() {
        for role in [Role::Patient, Role::Doctor] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), r#""DOCTOR""#);
    }

    #[test]
    fn blank_credentials_fail_validation() {
        let credentials = Credentials {
            email: String::new(),
            password: "secret".to_string(),
        };
        let errors = credentials.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(!errors.field_errors().contains_key("password"));

        let credentials = Credentials {
            email: "patient@hospital.test".to_string(),
            password: String::new(),
        };
        assert!(credentials.validate().unwrap_err().field_errors().contains_key("password"));
    }

    #[test]
    fn refresh_request_requires_refresh_grant() {
        let request = RefreshTokenRequest {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            grant_type: "password".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        let grant_errors = fields.get("grant_type").expect("grant_type error");
        assert_eq!(grant_errors[0].message.as_deref(), Some("invalid"));

        let request = RefreshTokenRequest {
            grant_type: REFRESH_TOKEN_GRANT_TYPE.to_string(),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn refresh_request_reports_every_missing_field() {
        let errors = RefreshTokenRequest::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("access_token"));
        assert!(fields.contains_key("refresh_token"));
        assert!(fields.contains_key("grant_type"));
    }
}
