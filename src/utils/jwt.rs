// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::participant::Session};

/// JWT Claims issued by the identity provider.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user identifier stored on quiz results.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Session resolved for the current request; `None` when no valid token was sent.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

/// Signs a token for `session` valid for `expiration_seconds`.
pub fn sign_jwt(
    session: &Session,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: session.uid.clone(),
        name: session.display_name.clone(),
        email: session.email.clone(),
        picture: session.photo_url.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: session resolution.
///
/// Reads 'Authorization: Bearer <token>' and injects a `CurrentSession`.
/// Never rejects; an absent or invalid token yields `CurrentSession(None)`
/// and the handler decides what an anonymous visitor gets.
pub async fn session_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let session = match token {
        Some(token) => match verify_jwt(token, &config.jwt_secret) {
            Ok(claims) => Some(Session::from(claims)),
            Err(_) => {
                tracing::debug!("Rejected bearer token");
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(CurrentSession(session));
    next.run(req).await
}
