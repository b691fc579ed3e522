use crate::config::AuthConfig;
use crate::error::app_error::AppError;
use crate::models::user::{Role, TokenPair, User};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub aud: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub sub: String,
    pub role: Role,
    pub typ: TokenType,
}

/// Everything needed to mint one token.
#[derive(Debug, Clone)]
pub struct TokenSpec {
    pub issuer: String,
    pub audience: String,
    pub subject: String,
    pub role: Role,
    pub token_type: TokenType,
    pub expires_in: TimeDelta,
}

/// Holds the RSA key pair used to sign and verify tokens.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    key_id: String,
    issuer: String,
    audience: String,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl TokenAuthority {
    pub fn load(settings: &AuthConfig) -> Result<Self, AppError> {
        let private_pem = read_key(&settings.private_key_file)?;
        let public_pem = read_key(&settings.public_key_file)?;
        Self::from_pem(&private_pem, &public_pem, settings)
    }

    pub fn from_pem(private_pem: &[u8], public_pem: &[u8], settings: &AuthConfig) -> Result<Self, AppError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|e| AppError::token("Failed to parse private key", e))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|e| AppError::token("Failed to parse public key", e))?;

        Ok(Self {
            encoding,
            decoding,
            key_id: hex::encode(Sha256::digest(public_pem)),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            access_ttl: TimeDelta::seconds(settings.access_token_ttl_secs),
            refresh_ttl: TimeDelta::seconds(settings.refresh_token_ttl_secs),
        })
    }

    pub fn spec_for(&self, user: &User, token_type: TokenType) -> TokenSpec {
        let expires_in = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        TokenSpec {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            subject: user.uuid.to_string(),
            role: user.role,
            token_type,
            expires_in,
        }
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: build_token(&self.spec_for(user, TokenType::Access), self)?,
            refresh_token: build_token(&self.spec_for(user, TokenType::Refresh), self)?,
        })
    }

    /// Verifies signature, issuer, audience and expiry. Any failure is `Unauthorized`.
    pub fn parse(&self, token: &str) -> Result<TokenClaims, AppError> {
        let header = decode_header(token).map_err(|_| AppError::Unauthorized)?;
        if header.kid.as_deref().is_some_and(|kid| kid != self.key_id) {
            return Err(AppError::Unauthorized);
        }

        let mut validation = Validation::new(Algorithm::RS512);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token rejected: {}", e);
                AppError::Unauthorized
            })
    }

    /// Parses `token` and requires its `typ` claim to be `expected`.
    pub fn parse_typed(&self, token: &str, expected: TokenType) -> Result<TokenClaims, AppError> {
        let claims = self.parse(token)?;
        if claims.typ != expected {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }
}

fn read_key(path: &str) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|source| AppError::KeyFile { path: path.to_string(), source })
}

pub fn build_token(spec: &TokenSpec, authority: &TokenAuthority) -> Result<String, AppError> {
    for (field, value) in [("issuer", &spec.issuer), ("audience", &spec.audience), ("subject", &spec.subject)] {
        if value.trim().is_empty() {
            return Err(AppError::Internal(format!("token {} must not be empty", field)));
        }
    }

    let issued_at = Utc::now();
    let claims = TokenClaims {
        iss: spec.issuer.clone(),
        aud: vec![spec.audience.clone()],
        jti: Uuid::new_v4().to_string(),
        iat: issued_at.timestamp(),
        exp: (issued_at + spec.expires_in).timestamp(),
        sub: spec.subject.clone(),
        role: spec.role,
        typ: spec.token_type,
    };

    let mut header = Header::new(Algorithm::RS512);
    header.kid = Some(authority.key_id.clone());

    encode(&header, &claims, &authority.encoding).map_err(|e| AppError::token("Failed to sign token", e))
}
