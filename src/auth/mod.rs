use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::config_loader,
    domain::{
        entities::users::UserEntity,
        value_objects::{enums::user_roles::UserRole, iam::TokenPairModel},
    },
};

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

const ACCESS_TOKEN_HOURS: i64 = 24;
const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub token_type: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl AuthError {
    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: {}", self.0),
        )
            .into_response()
    }
}

fn build_claims(user: &UserEntity, token_type: &str, lifetime: Duration) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        token_type: token_type.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + lifetime).timestamp() as usize,
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("JWT signing failed: {}", e))?;

    Ok(token)
}

pub fn issue_token_pair(user: &UserEntity) -> Result<TokenPairModel, AuthError> {
    let secrets = config_loader::get_jwt_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load JWT secrets: {}", e))?;

    let access_claims = build_claims(user, ACCESS_TOKEN_TYPE, Duration::hours(ACCESS_TOKEN_HOURS));
    let refresh_claims =
        build_claims(user, REFRESH_TOKEN_TYPE, Duration::days(REFRESH_TOKEN_DAYS));

    Ok(TokenPairModel {
        access_token: sign(&access_claims, &secrets.secret)?,
        refresh_token: sign(&refresh_claims, &secrets.refresh_secret)?,
    })
}

fn validate_with_secret(token: &str, secret: &str, token_type: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    if token_data.claims.token_type != token_type {
        return Err(AuthError(anyhow::anyhow!(
            "Expected {} token, got {}",
            token_type,
            token_data.claims.token_type
        )));
    }

    Ok(token_data.claims)
}

pub fn validate_access_token(token: &str) -> Result<Claims, AuthError> {
    let secrets = config_loader::get_jwt_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load JWT secrets: {}", e))?;

    validate_with_secret(token, &secrets.secret, ACCESS_TOKEN_TYPE)
}

pub fn validate_refresh_token(token: &str) -> Result<Claims, AuthError> {
    let secrets = config_loader::get_jwt_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load JWT secrets: {}", e))?;

    validate_with_secret(token, &secrets.refresh_secret, REFRESH_TOKEN_TYPE)
}

/// What an operation is about to touch. Ownership and staff membership are
/// resolved by the caller from persisted rows; the policy only decides.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// Owner-only surfaces: staff roster, services, slots, subscription.
    OwnedBusiness { owner_id: Uuid },
    /// Day-to-day operations, open to the owner and active staff.
    BusinessOperations {
        owner_id: Uuid,
        is_active_staff: bool,
    },
    /// A single booking, also visible to the customer who made it.
    Booking {
        owner_id: Uuid,
        is_active_staff: bool,
        customer_email: &'a str,
    },
}

/// Single authorization policy checked per operation. SuperAdmin passes
/// everything.
pub fn can_access(auth_user: &AuthUser, resource: Resource<'_>) -> bool {
    if auth_user.role == UserRole::SuperAdmin {
        return true;
    }

    match resource {
        Resource::OwnedBusiness { owner_id } => auth_user.user_id == owner_id,
        Resource::BusinessOperations {
            owner_id,
            is_active_staff,
        } => auth_user.user_id == owner_id || is_active_staff,
        Resource::Booking {
            owner_id,
            is_active_staff,
            customer_email,
        } => {
            auth_user.user_id == owner_id
                || is_active_staff
                || auth_user.email == customer_email
        }
    }
}

impl AuthUser {
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), (StatusCode, String)> {
        if allowed.contains(&self.role) || matches!(self.role, UserRole::SuperAdmin) {
            return Ok(());
        }

        Err((
            StatusCode::FORBIDDEN,
            "Insufficient role for this operation".to_string(),
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let auth_str = auth_header.to_str().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            )
        })?;

        if !auth_str.starts_with("Bearer ") {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_str[7..];

        let claims = validate_access_token(token)
            .map_err(|e| (StatusCode::UNAUTHORIZED, e.0.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid user ID in token".to_string(),
            )
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            role: UserRole::from_str(&claims.role),
        })
    }
}

#[cfg(test)]
mod tests;
