use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{Authorization, authorization::Bearer};

use super::MockState;
use super::credentials::hash_access_token;
use super::error::RouteError;

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub is_staff: bool,
    pub token_hash: String,
}

impl AuthContext {
    pub fn ensure_staff(&self) -> Result<(), RouteError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(RouteError::Forbidden(
                "FORBIDDEN",
                "Only clinic staff can schedule appointments".into(),
            ))
        }
    }
}

impl FromRequestParts<MockState> for AuthContext {
    type Rejection = RouteError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &MockState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| RouteError::session_expired())?;

            let token_hash = hash_access_token(authz.token());

            let data = state.data.read().await;
            let user = data
                .session_user(&token_hash, Utc::now())
                .ok_or_else(RouteError::session_expired)?;

            Ok(AuthContext {
                user_id: user.id,
                is_staff: user.is_staff(),
                token_hash,
            })
        }
    }
}
