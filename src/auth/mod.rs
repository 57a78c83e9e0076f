pub mod jwt;
pub mod password;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub const ROLE_INTERN: &str = "intern";
pub const ROLE_MENTOR: &str = "mentor";
pub const ROLE_HIRING: &str = "hiring";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: String,
}

impl AuthenticatedUser {
    /// Intern-only routes: returns the intern id or 403.
    pub fn require_intern(&self) -> Result<Uuid, AppError> {
        if self.role == ROLE_INTERN {
            Ok(self.user_id)
        } else {
            Err(AppError::forbidden("intern account required"))
        }
    }

    /// Staff routes are open to mentors, hiring team members, and admins.
    pub fn require_staff(&self) -> Result<Uuid, AppError> {
        match self.role.as_str() {
            ROLE_MENTOR | ROLE_HIRING | ROLE_ADMIN => Ok(self.user_id),
            _ => Err(AppError::forbidden("staff account required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized())?;

        let claims = state
            .jwt
            .verify_token(bearer.token())
            .map_err(|_| AppError::unauthorized())?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}
