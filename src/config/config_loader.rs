use anyhow::Result;

use crate::config::stage::Stage;

use super::config_model::{DotEnvyConfig, JwtSecret};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let email = super::config_model::Email {
        from_address: std::env::var("EMAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "BookingPro <noreply@bookingpro.com>".to_string()),
        public_base_url: std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        email,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_jwt_secret() -> Result<JwtSecret> {
    dotenvy::dotenv().ok();

    Ok(JwtSecret {
        secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
        refresh_secret: std::env::var("JWT_REFRESH_SECRET")
            .expect("JWT_REFRESH_SECRET is invalid"),
    })
}
