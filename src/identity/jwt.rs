use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Actor, ActorKind, EmployeeRole};
use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::ports::TokenIssuer;

/// Claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Customer id or employee id, depending on `kind`.
    pub sub: String,
    pub kind: ActorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<EmployeeRole>,
    /// Table claim the customer joined. Absent for employees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<i32>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<JwtError> for DomainError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::GenerationFailed(msg) => DomainError::Internal(msg),
            JwtError::InvalidToken(_) | JwtError::ExpiredToken => DomainError::Unauthenticated,
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    customer_ttl: Duration,
    employee_ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, customer_ttl: Duration, employee_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            customer_ttl,
            employee_ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.customer_token_ttl_hours),
            Duration::hours(config.employee_token_ttl_hours),
        )
    }

    pub fn issue_employee_token(
        &self,
        employee_id: i32,
        role: EmployeeRole,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        self.sign(&Claims {
            sub: employee_id.to_string(),
            kind: ActorKind::Employee,
            role: Some(role),
            claim: None,
            iat: now.timestamp(),
            exp: (now + self.employee_ttl).timestamp(),
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validates the token and resolves who is calling.
    pub fn authenticate(&self, token: &str) -> Result<Actor, JwtError> {
        Actor::try_from(self.validate_token(token)?)
    }

    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

impl TokenIssuer for JwtService {
    fn issue_customer_token(&self, customer_id: i32, claim_id: i32) -> Result<String, DomainError> {
        let now = Utc::now();
        let token = self.sign(&Claims {
            sub: customer_id.to_string(),
            kind: ActorKind::Customer,
            role: None,
            claim: Some(claim_id),
            iat: now.timestamp(),
            exp: (now + self.customer_ttl).timestamp(),
        })?;
        Ok(token)
    }
}
