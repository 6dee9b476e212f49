// src/config.rs

use std::{env, net::SocketAddr, str::FromStr};

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the service runs on the in-memory store.
    pub database_url: Option<String>,
    /// JSON file of result documents used to seed the in-memory store.
    pub seed_file: Option<String>,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,

    pub board_title: String,
    /// How many recent results a page load fetches.
    pub fetch_limit: usize,
    pub page_size: usize,
    pub load_more_delay_ms: u64,

    pub avatar_base_url: Url,
    /// Where an unauthenticated visitor is sent.
    pub home_url: String,
    pub public_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET must be set".to_string()))?;

        let avatar_base_url = env::var("AVATAR_BASE_URL")
            .unwrap_or_else(|_| "https://ui-avatars.com/api/".to_string());
        let avatar_base_url = Url::parse(&avatar_base_url)
            .map_err(|e| AppError::Config(format!("AVATAR_BASE_URL: {}", e)))?;

        let page_size: usize = parse_or("PAGE_SIZE", 20)?;
        if page_size == 0 {
            return Err(AppError::Config("PAGE_SIZE must be positive".to_string()));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            seed_file: env::var("SEED_FILE").ok(),
            jwt_secret,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            bind_addr: parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            board_title: env::var("LEADERBOARD_TITLE")
                .unwrap_or_else(|_| "Quiz Leaderboard".to_string()),
            fetch_limit: parse_or("FETCH_LIMIT", 100)?,
            page_size,
            load_more_delay_ms: parse_or("LOAD_MORE_DELAY_MS", 0)?,
            avatar_base_url,
            home_url: env::var("HOME_URL").unwrap_or_else(|_| "/".to_string()),
            public_origin: env::var("PUBLIC_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("{}: {}", key, e))),
        Err(_) => Ok(default),
    }
}
