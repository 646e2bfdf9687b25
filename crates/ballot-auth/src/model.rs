//! Authentication models
//!
//! This file defines the JWT payload, the per-request auth context and the
//! resolved actor handed to services.

use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use ballot_common::BallotError;
use ballot_persistence::{Role, entity::users};

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";
pub const TOKEN_TYPE: &str = "Bearer";

// Auth configuration keys
pub const TOKEN_SECRET_KEY: &str = "ballot.auth.token.secret.key";
pub const TOKEN_EXPIRE_SECONDS: &str = "ballot.auth.token.expire.seconds";
pub const PASSWORD_HASH_COST: &str = "ballot.auth.password.hash.cost";
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "ballot.admin.email";
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "ballot.admin.password";

pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 3600;

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtPayload {
    pub user_id: i64,
    pub exp: i64,
}

/// Result of decoding the bearer token of one request
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    pub user_id: Option<i64>,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
    pub token_provided: bool,
}

impl AuthContext {
    /// The error to answer with when this request is not authenticated.
    pub fn failure(&self) -> Option<BallotError> {
        if !self.token_provided {
            return Some(BallotError::InvalidToken("no token provided".to_string()));
        }

        match &self.jwt_error {
            Some(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Some(BallotError::TokenExpired)
            }
            Some(e) => Some(BallotError::InvalidToken(e.to_string())),
            None if self.user_id.is_none() => {
                Some(BallotError::InvalidToken("token has no user".to_string()))
            }
            None => None,
        }
    }
}

/// An authenticated user acting on the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
    pub name: String,
}

impl Actor {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

impl From<&users::Model> for Actor {
    fn from(value: &users::Model) -> Self {
        Self {
            user_id: value.id,
            role: value.role,
            name: format!("{} {}", value.first_name, value.last_name),
        }
    }
}
