#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub email: Email,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Email {
    pub from_address: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct JwtSecret {
    pub secret: String,
    pub refresh_secret: String,
}
