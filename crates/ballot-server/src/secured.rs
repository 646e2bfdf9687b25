// Security context and authorization macro for API access control

use actix_web::{HttpMessage, HttpRequest, web};

use ballot_auth::{AccessPolicy, Actor, AuthContext, Permission, service::user};
use ballot_common::BallotError;

use crate::model::AppState;

// Security context for API access control
#[derive(Debug, Clone)]
pub struct Secured<'a> {
    pub req: &'a HttpRequest,          // HTTP request reference
    pub data: &'a web::Data<AppState>, // Application state
    pub permission: Permission,        // Permission the handler requires
}

impl<'a> Secured<'a> {
    pub fn builder(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> SecuredBuilder<'a> {
        SecuredBuilder::new(req, data)
    }

    /// Resolve the caller into an `Actor` allowed to use this handler.
    ///
    /// Missing, expired or unknown tokens fail with an authentication error;
    /// an authenticated caller whose role lacks the permission gets `Forbidden`.
    pub async fn authorize(&self) -> anyhow::Result<Actor> {
        let auth_context = self
            .req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();

        if let Some(failure) = auth_context.failure() {
            return Err(failure.into());
        }

        let user_id = auth_context
            .user_id
            .ok_or_else(|| BallotError::InvalidToken("token has no user".to_string()))?;

        let user = match user::find_by_id(self.data.db(), user_id).await? {
            Some(user) if user.is_active => user,
            Some(_) => {
                return Err(BallotError::InvalidToken("user is deactivated".to_string()).into());
            }
            None => {
                return Err(BallotError::InvalidToken("user no longer exists".to_string()).into());
            }
        };

        if !user.role.allows(self.permission) {
            tracing::info!(
                user_id,
                role = %user.role,
                path = self.req.path(),
                "Denied: role may not {}",
                self.permission.as_str()
            );
            return Err(BallotError::forbidden(format!(
                "role {} may not {}",
                user.role,
                self.permission.as_str()
            ))
            .into());
        }

        Ok(Actor::from(&user))
    }
}

#[derive(Debug, Clone)]
pub struct SecuredBuilder<'a> {
    req: &'a HttpRequest,
    data: &'a web::Data<AppState>,
    permission: Permission,
}

impl<'a> SecuredBuilder<'a> {
    pub fn new(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> Self {
        SecuredBuilder::<'a> {
            req,
            data,
            permission: Permission::ReadRecords,
        }
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn build(self) -> Secured<'a> {
        Secured::<'a> {
            req: self.req,
            data: self.data,
            permission: self.permission,
        }
    }
}

/// Authorize the request or return the error response from the handler.
///
/// Evaluates to the caller's `Actor`.
#[macro_export]
macro_rules! secured {
    ($secured: expr) => {
        match $secured.authorize().await {
            Ok(actor) => actor,
            Err(err) => return Err($crate::error::AppError::from(err)),
        }
    };
}
