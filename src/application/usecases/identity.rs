use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand::{Rng, distributions::Alphanumeric};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth,
    config::config_model::Email,
    domain::{
        entities::{account_tokens::InsertAccountTokenEntity, users::UserEntity},
        repositories::users::UserRepository,
        value_objects::{
            enums::{token_kinds::TokenKind, user_roles::UserRole},
            iam::{
                ConfirmPasswordResetModel, LoginModel, RegisterUserModel,
                RequestPasswordResetModel, TokenPairModel, UserModel,
            },
        },
    },
    infrastructure::email::{self, EmailQueue},
};

const MIN_PASSWORD_LENGTH: usize = 8;
const TOKEN_LENGTH: usize = 48;
const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("email is already registered")]
    EmailTaken,
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
    #[error("role cannot be self-assigned")]
    RoleNotAllowed,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email address is not verified")]
    AccountNotVerified,
    #[error("account is disabled")]
    AccountDisabled,
    #[error("invalid or unknown token")]
    InvalidToken,
    #[error("token has expired or was already used")]
    TokenExpired,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            IdentityError::EmailTaken => StatusCode::CONFLICT,
            IdentityError::WeakPassword | IdentityError::RoleNotAllowed => {
                StatusCode::BAD_REQUEST
            }
            IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            IdentityError::AccountNotVerified | IdentityError::AccountDisabled => {
                StatusCode::FORBIDDEN
            }
            IdentityError::InvalidToken | IdentityError::TokenExpired => StatusCode::BAD_REQUEST,
            IdentityError::UserNotFound => StatusCode::NOT_FOUND,
            IdentityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, IdentityError>;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

fn generate_token_value() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub struct IdentityUseCase<T>
where
    T: UserRepository + Send + Sync,
{
    user_repo: Arc<T>,
    mailer: EmailQueue,
    email_config: Email,
}

impl<T> IdentityUseCase<T>
where
    T: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<T>, mailer: EmailQueue, email_config: Email) -> Self {
        Self {
            user_repo,
            mailer,
            email_config,
        }
    }

    async fn issue_account_token(&self, user: &UserEntity, kind: TokenKind) -> UseCaseResult<String> {
        let token = generate_token_value();
        let now = Utc::now();
        self.user_repo
            .create_token(InsertAccountTokenEntity {
                user_id: user.id,
                kind: kind.to_string(),
                token: token.clone(),
                created_at: now,
                expires_at: now + Duration::hours(TOKEN_LIFETIME_HOURS),
                used_at: None,
            })
            .await
            .map_err(|err| {
                error!(user_id = %user.id, db_error = ?err, "identity: failed to store account token");
                IdentityError::Internal(err)
            })?;
        Ok(token)
    }

    pub async fn register(&self, register_model: RegisterUserModel) -> UseCaseResult<UserModel> {
        let email = register_model.email.trim().to_lowercase();
        info!(%email, "identity: registration requested");

        if register_model.password.len() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword);
        }

        // Self-service signup only hands out the two public roles. Staff and
        // admin accounts are provisioned elsewhere.
        if !matches!(
            register_model.role,
            UserRole::Client | UserRole::BusinessAdmin
        ) {
            warn!(%email, role = %register_model.role, "identity: registration with privileged role");
            return Err(IdentityError::RoleNotAllowed);
        }

        let existing = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(IdentityError::Internal)?;
        if existing.is_some() {
            warn!(%email, "identity: registration for taken email");
            return Err(IdentityError::EmailTaken);
        }

        let password_hash = hash_password(&register_model.password)?;
        let mut insert_entity = register_model.to_entity(password_hash);
        insert_entity.email = email.clone();

        let user_id = self
            .user_repo
            .create(insert_entity)
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "identity: failed to create user");
                IdentityError::Internal(err)
            })?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or_else(|| IdentityError::Internal(anyhow!("created user {} missing", user_id)))?;

        let token = self
            .issue_account_token(&user, TokenKind::EmailVerification)
            .await?;
        self.mailer.try_enqueue(email::verification_email(
            &self.email_config,
            &user.email,
            &user.first_name,
            &token,
        ));

        info!(%user_id, "identity: user registered, verification mail queued");
        Ok(UserModel::from(user))
    }

    pub async fn verify_email(&self, token: &str) -> UseCaseResult<()> {
        let record = self
            .user_repo
            .find_token(&TokenKind::EmailVerification.to_string(), token)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or(IdentityError::InvalidToken)?;

        let now = Utc::now();
        if !record.is_usable(now) {
            return Err(IdentityError::TokenExpired);
        }

        self.user_repo
            .mark_verified(record.user_id)
            .await
            .map_err(IdentityError::Internal)?;
        self.user_repo
            .consume_token(record.id, now)
            .await
            .map_err(IdentityError::Internal)?;

        info!(user_id = %record.user_id, "identity: email verified");
        Ok(())
    }

    pub async fn login(&self, login_model: LoginModel) -> UseCaseResult<TokenPairModel> {
        let email = login_model.email.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(&login_model.password, &user.password_hash) {
            warn!(%email, "identity: login with wrong password");
            return Err(IdentityError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(IdentityError::AccountNotVerified);
        }
        if !user.is_active {
            return Err(IdentityError::AccountDisabled);
        }

        let pair = auth::issue_token_pair(&user).map_err(|e| {
            error!(%email, "identity: failed to issue token pair");
            IdentityError::Internal(e.into_inner())
        })?;

        self.user_repo
            .record_login(user.id, Utc::now())
            .await
            .map_err(IdentityError::Internal)?;

        info!(user_id = %user.id, "identity: login succeeded");
        Ok(pair)
    }

    pub async fn refresh(&self, refresh_token: &str) -> UseCaseResult<TokenPairModel> {
        let claims = auth::validate_refresh_token(refresh_token)
            .map_err(|_| IdentityError::InvalidCredentials)?;
        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| IdentityError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !user.is_active {
            return Err(IdentityError::AccountDisabled);
        }

        let pair = auth::issue_token_pair(&user)
            .map_err(|e| IdentityError::Internal(e.into_inner()))?;
        Ok(pair)
    }

    pub async fn me(&self, user_id: Uuid) -> UseCaseResult<UserModel> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or(IdentityError::UserNotFound)?;
        Ok(UserModel::from(user))
    }

    /// Responds identically whether or not the address exists, so the
    /// endpoint cannot be used to probe for accounts.
    pub async fn request_password_reset(
        &self,
        request_model: RequestPasswordResetModel,
    ) -> UseCaseResult<()> {
        let email = request_model.email.trim().to_lowercase();

        let user = match self
            .user_repo
            .find_by_email(&email)
            .await
            .map_err(IdentityError::Internal)?
        {
            Some(user) if user.is_active => user,
            _ => {
                info!(%email, "identity: password reset for unknown or inactive account");
                return Ok(());
            }
        };

        let token = self
            .issue_account_token(&user, TokenKind::PasswordReset)
            .await?;
        self.mailer.try_enqueue(email::password_reset_email(
            &self.email_config,
            &user.email,
            &user.first_name,
            &token,
        ));

        info!(user_id = %user.id, "identity: password reset mail queued");
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        confirm_model: ConfirmPasswordResetModel,
    ) -> UseCaseResult<()> {
        if confirm_model.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword);
        }

        let record = self
            .user_repo
            .find_token(&TokenKind::PasswordReset.to_string(), &confirm_model.token)
            .await
            .map_err(IdentityError::Internal)?
            .ok_or(IdentityError::InvalidToken)?;

        let now = Utc::now();
        if !record.is_usable(now) {
            return Err(IdentityError::TokenExpired);
        }

        let password_hash = hash_password(&confirm_model.new_password)?;
        self.user_repo
            .update_password(record.user_id, password_hash)
            .await
            .map_err(IdentityError::Internal)?;
        self.user_repo
            .consume_token(record.id, now)
            .await
            .map_err(IdentityError::Internal)?;

        info!(user_id = %record.user_id, "identity: password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::account_tokens::AccountTokenEntity,
        repositories::users::MockUserRepository,
        value_objects::enums::user_roles::UserRole,
    };
    use crate::infrastructure::email::LogEmailSender;
    use mockall::predicate::eq;

    fn email_config() -> Email {
        Email {
            from_address: "BookingPro <noreply@bookingpro.com>".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }

    fn usecase(repo: MockUserRepository) -> IdentityUseCase<MockUserRepository> {
        let mailer = EmailQueue::new(Arc::new(LogEmailSender::new(
            email_config().from_address,
        )));
        IdentityUseCase::new(Arc::new(repo), mailer, email_config())
    }

    fn stored_user(password: &str, is_verified: bool, is_active: bool) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            email: "jo@example.com".to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            phone: String::new(),
            role: UserRole::Client.to_string(),
            is_active,
            is_verified,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn set_jwt_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", "accesssecretforunittesting1234567890");
            std::env::set_var("JWT_REFRESH_SECRET", "refreshsecretforunittesting1234567890");
        }
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("jo@example.com"))
            .returning(|_| Ok(Some(stored_user("password123", true, true))));

        let result = usecase(repo)
            .register(RegisterUserModel {
                email: "Jo@Example.com".to_string(),
                password: "password123".to_string(),
                first_name: "Jo".to_string(),
                last_name: "Doe".to_string(),
                phone: String::new(),
                role: UserRole::Client,
            })
            .await;

        assert!(matches!(result, Err(IdentityError::EmailTaken)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let repo = MockUserRepository::new();

        let result = usecase(repo)
            .register(RegisterUserModel {
                email: "jo@example.com".to_string(),
                password: "short".to_string(),
                first_name: "Jo".to_string(),
                last_name: "Doe".to_string(),
                phone: String::new(),
                role: UserRole::Client,
            })
            .await;

        assert!(matches!(result, Err(IdentityError::WeakPassword)));
    }

    #[tokio::test]
    async fn register_rejects_privileged_role() {
        for role in [UserRole::SuperAdmin, UserRole::BusinessStaff] {
            let result = usecase(MockUserRepository::new())
                .register(RegisterUserModel {
                    email: "jo@example.com".to_string(),
                    password: "password123".to_string(),
                    first_name: "Jo".to_string(),
                    last_name: "Doe".to_string(),
                    phone: String::new(),
                    role,
                })
                .await;

            assert!(matches!(result, Err(IdentityError::RoleNotAllowed)));
        }
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123", true, true))));

        let result = usecase(repo)
            .login(LoginModel {
                email: "jo@example.com".to_string(),
                password: "not-the-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_unverified_account() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123", false, false))));

        let result = usecase(repo)
            .login(LoginModel {
                email: "jo@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(IdentityError::AccountNotVerified)));
    }

    #[tokio::test]
    async fn login_issues_token_pair() {
        set_jwt_env();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("password123", true, true))));
        repo.expect_record_login().returning(|_, _| Ok(()));

        let pair = usecase(repo)
            .login(LoginModel {
                email: "jo@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .expect("login should succeed");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn verify_email_rejects_expired_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_token().returning(|_, _| {
            Ok(Some(AccountTokenEntity {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                kind: TokenKind::EmailVerification.to_string(),
                token: "tok".to_string(),
                created_at: Utc::now() - Duration::hours(48),
                expires_at: Utc::now() - Duration::hours(24),
                used_at: None,
            }))
        });

        let result = usecase(repo).verify_email("tok").await;

        assert!(matches!(result, Err(IdentityError::TokenExpired)));
    }

    #[tokio::test]
    async fn password_reset_is_silent_for_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = usecase(repo)
            .request_password_reset(RequestPasswordResetModel {
                email: "ghost@example.com".to_string(),
            })
            .await;

        assert!(result.is_ok());
    }
}
