// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Authentication service: credentials, JWT issue/verification and token hashing.

use crate::error::{ApiError, ApiResult};
use crate::models::auth::{Claims, TokenResponse, TokenType};
use crate::models::user::User;
use crate::services::logging::anonymize_email;
use crate::services::store::Store;
use anyhow::{anyhow, Context, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::env;
use std::sync::Arc;

/// Configuration for token signing.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret: String,
    /// Access token lifetime in hours
    pub access_ttl_hours: i64,
    /// Refresh token lifetime in hours
    pub refresh_ttl_hours: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_ttl_hours: env::var("JWT_ACCESS_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            refresh_ttl_hours: env::var("JWT_REFRESH_TTL_HOURS")
                .unwrap_or_else(|_| "72".to_string())
                .parse()
                .unwrap_or(72),
        })
    }
}

/// Access and refresh token issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: Some(pair.refresh_token),
        }
    }
}

/// Signs and verifies HS256 tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Result<Self> {
        let encoding_key = EncodingKey::from_base64_secret(&config.secret)
            .context("JWT_SECRET must be valid base64")?;
        let decoding_key = DecodingKey::from_base64_secret(&config.secret)
            .context("JWT_SECRET must be valid base64")?;
        Ok(Self {
            encoding_key,
            decoding_key,
            config,
        })
    }

    fn issue(&self, user: &User, typ: TokenType, ttl_hours: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            profile_url: user.profile_picture.clone(),
            typ,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to sign token")
    }

    pub fn issue_access(&self, user: &User) -> Result<String> {
        self.issue(user, TokenType::Access, self.config.access_ttl_hours)
    }

    pub fn issue_pair(&self, user: &User) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access(user)?,
            refresh_token: self.issue(user, TokenType::Refresh, self.config.refresh_ttl_hours)?,
        })
    }

    /// Verify signature and expiry, and require the given token type.
    pub fn decode(&self, token: &str, typ: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow!("Invalid token: {e}"))?;
        if data.claims.typ != typ {
            return Err(anyhow!("Unexpected token type"));
        }
        Ok(data.claims)
    }

    /// Claims still describe `user` as stored.
    pub fn is_valid_for(claims: &Claims, user: &User) -> bool {
        claims.user_id == user.id && claims.sub == user.username && claims.role == user.role
    }
}

// ========== Passwords ==========

/// Hash a password into a salted PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {e}"))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ========== Token Generation ==========

/// Generate a secure random token.
/// Returns (raw_token, hash) - raw_token is sent to user, hash is stored in DB.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw_token = hex::encode(bytes);
    let hash = hash_token(&raw_token);
    (raw_token, hash)
}

/// Hash a token for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Login, refresh and per-request authentication.
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt: Arc<JwtService>) -> Self {
        Self { store, jwt }
    }

    /// Exchange username and password for a token pair.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let user = self
            .store
            .user_by_username(username)
            .await?
            .ok_or(ApiError::BadCredentials)?;

        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(ApiError::BadCredentials);
        }
        if !user.can_sign_in() {
            tracing::info!(
                user_id = user.id,
                email = %anonymize_email(&user.email),
                banned = user.banned,
                "Login rejected: account disabled"
            );
            return Err(ApiError::Unauthorized("Account is disabled or banned".to_string()));
        }

        tracing::info!(user_id = user.id, "User signed in");
        Ok(self.jwt.issue_pair(&user)?)
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<String> {
        let claims = self
            .jwt
            .decode(refresh_token, TokenType::Refresh)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired jwt".to_string()))?;
        let user = self.current_user(&claims).await?;
        Ok(self.jwt.issue_access(&user)?)
    }

    /// Resolve the user behind an access token.
    pub async fn authenticate(&self, access_token: &str) -> ApiResult<User> {
        let claims = self
            .jwt
            .decode(access_token, TokenType::Access)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired jwt".to_string()))?;
        self.current_user(&claims).await
    }

    async fn current_user(&self, claims: &Claims) -> ApiResult<User> {
        let user = self
            .store
            .user_by_username(&claims.sub)
            .await?
            .filter(|user| JwtService::is_valid_for(claims, user) && user.can_sign_in())
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired jwt".to_string()))?;
        Ok(user)
    }
}
