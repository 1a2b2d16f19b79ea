use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::{InsertUserEntity, UserEntity},
    value_objects::enums::user_roles::UserRole,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserModel {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: UserRole,
}

impl RegisterUserModel {
    /// New accounts start inactive and unverified until the email round-trip
    /// completes.
    pub fn to_entity(&self, password_hash: String) -> InsertUserEntity {
        InsertUserEntity {
            email: self.email.trim().to_lowercase(),
            password_hash,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            role: self.role.to_string(),
            is_active: false,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairModel {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestPasswordResetModel {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPasswordResetModel {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            phone: entity.phone,
            role: UserRole::from_str(&entity.role),
            is_active: entity.is_active,
            is_verified: entity.is_verified,
            last_login: entity.last_login,
            created_at: entity.created_at,
        }
    }
}
