use super::*;
use chrono::Utc;
use std::env;

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", "accesssecretforunittesting1234567890");
        env::set_var("JWT_REFRESH_SECRET", "refreshsecretforunittesting1234567890");
    }
}

fn test_user() -> UserEntity {
    UserEntity {
        id: Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap(),
        email: "test@example.com".to_string(),
        password_hash: "hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone: "".to_string(),
        role: UserRole::BusinessAdmin.to_string(),
        is_active: true,
        is_verified: true,
        last_login: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_issue_and_validate_access_token() {
    set_env_vars();
    let user = test_user();

    let pair = issue_token_pair(&user).expect("token pair should be issued");
    let claims = validate_access_token(&pair.access_token).expect("access token should validate");

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, user.email);
    assert_eq!(claims.role, "BUSINESS_ADMIN");
    assert_eq!(claims.token_type, ACCESS_TOKEN_TYPE);
    assert!(claims.exp > claims.iat);
}

#[test]
fn test_refresh_token_rejected_as_access_token() {
    set_env_vars();
    let user = test_user();

    let pair = issue_token_pair(&user).expect("token pair should be issued");
    let result = validate_access_token(&pair.refresh_token);

    assert!(result.is_err());
}

#[test]
fn test_validate_refresh_token() {
    set_env_vars();
    let user = test_user();

    let pair = issue_token_pair(&user).expect("token pair should be issued");
    let claims =
        validate_refresh_token(&pair.refresh_token).expect("refresh token should validate");

    assert_eq!(claims.token_type, REFRESH_TOKEN_TYPE);
}

#[test]
fn test_validate_access_token_invalid_signature() {
    set_env_vars();
    let secret = "wrongsecret";
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        email: "test@example.com".to_string(),
        role: "CLIENT".to_string(),
        token_type: ACCESS_TOKEN_TYPE.to_string(),
        iat: now,
        exp: now + 3600,
    };

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    let result = validate_access_token(&token);
    assert!(result.is_err());
}

#[test]
fn test_validate_access_token_expired() {
    set_env_vars();
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        email: "test@example.com".to_string(),
        role: "CLIENT".to_string(),
        token_type: ACCESS_TOKEN_TYPE.to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };

    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(
            "accesssecretforunittesting1234567890".as_bytes(),
        ),
    )
    .unwrap();

    let result = validate_access_token(&token);
    assert!(result.is_err());
}

#[test]
fn test_require_role() {
    let admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        role: UserRole::BusinessAdmin,
    };
    let client = AuthUser {
        user_id: Uuid::new_v4(),
        email: "client@example.com".to_string(),
        role: UserRole::Client,
    };
    let super_admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "root@example.com".to_string(),
        role: UserRole::SuperAdmin,
    };

    assert!(admin.require_role(&[UserRole::BusinessAdmin]).is_ok());
    assert!(client.require_role(&[UserRole::BusinessAdmin]).is_err());
    assert!(super_admin.require_role(&[UserRole::BusinessAdmin]).is_ok());
}

#[test]
fn test_can_access_policy_table() {
    let owner_id = Uuid::new_v4();
    let owner = AuthUser {
        user_id: owner_id,
        email: "owner@example.com".to_string(),
        role: UserRole::BusinessAdmin,
    };
    let staff = AuthUser {
        user_id: Uuid::new_v4(),
        email: "staff@example.com".to_string(),
        role: UserRole::BusinessStaff,
    };
    let customer = AuthUser {
        user_id: Uuid::new_v4(),
        email: "jane@example.com".to_string(),
        role: UserRole::Client,
    };
    let super_admin = AuthUser {
        user_id: Uuid::new_v4(),
        email: "root@example.com".to_string(),
        role: UserRole::SuperAdmin,
    };

    let owned = Resource::OwnedBusiness { owner_id };
    assert!(can_access(&owner, owned));
    assert!(can_access(&super_admin, owned));
    assert!(!can_access(&staff, owned));
    assert!(!can_access(&customer, owned));

    let operations = |is_active_staff| Resource::BusinessOperations {
        owner_id,
        is_active_staff,
    };
    assert!(can_access(&owner, operations(false)));
    assert!(can_access(&staff, operations(true)));
    assert!(!can_access(&staff, operations(false)));
    assert!(!can_access(&customer, operations(false)));

    let booking = |is_active_staff| Resource::Booking {
        owner_id,
        is_active_staff,
        customer_email: "jane@example.com",
    };
    assert!(can_access(&customer, booking(false)));
    assert!(can_access(&owner, booking(false)));
    assert!(can_access(&staff, booking(true)));
    assert!(!can_access(&staff, booking(false)));
}
