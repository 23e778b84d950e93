//! Bearer token authentication
//!
//! The middleware runs on every route. Requests without an `Authorization`
//! header pass through anonymously; a header carrying an invalid or expired
//! token, or naming a deleted user, is rejected with 401. On success the
//! caller is stored in the request extensions as an [`AuthUser`].

use auth::Role;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{error::ApiError, models::user::User, state::AppState};

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl AuthUser {
    /// Admins and superusers may manage the catalog and accounts
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.role.is_admin()
    }

    /// Admins, superusers and moderators may manage anyone's content
    pub fn is_staff(&self) -> bool {
        self.is_superuser || self.role.is_staff()
    }
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        let claims = state.jwt_service.validate_token(bearer.token()).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized
        })?;

        let user = state
            .user_repository
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                warn!("Token presented for missing user {}", claims.sub);
                ApiError::Unauthorized
            })?;

        req.extensions_mut().insert(AuthUser::from(&user));
    } else if req.headers().contains_key(axum::http::header::AUTHORIZATION) {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
