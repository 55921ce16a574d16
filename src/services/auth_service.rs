use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::*;

use crate::config::Config;
use crate::models::auth_model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::entities::user::{self, Entity as User};
use crate::utils::db_utils::is_unique_violation;
use crate::utils::jwt_utils::JwtUtils;

pub struct AuthService;

impl AuthService {
    pub async fn register(
        db: &DatabaseConnection,
        payload: RegisterRequest,
    ) -> Result<RegisterResponse, (StatusCode, String)> {
        let password_hash = Self::hash_password(&payload.password).map_err(|e| {
            tracing::error!("password hashing failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
        })?;

        let inserted = user::ActiveModel {
            id: NotSet,
            username: Set(payload.username),
            email: Set(payload.email),
            first_name: Set(payload.first_name),
            last_name: Set(payload.last_name),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await;

        match inserted {
            Ok(saved) => Ok(RegisterResponse {
                id: saved.id,
                username: saved.username,
                email: saved.email,
                first_name: saved.first_name,
                last_name: saved.last_name,
            }),
            Err(e) if is_unique_violation(&e) => Err((
                StatusCode::BAD_REQUEST,
                "Username or email is already taken".to_string(),
            )),
            Err(e) => {
                tracing::error!("user insert failed: {}", e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()))
            }
        }
    }

    pub async fn login(
        db: &DatabaseConnection,
        payload: LoginRequest,
    ) -> Result<LoginResponse, (StatusCode, String)> {
        let user = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(payload.login_id.clone()))
                    .add(user::Column::Username.eq(payload.login_id.clone())),
            )
            .one(db)
            .await
            .map_err(|e| {
                tracing::error!("user lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            })?
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

        let valid = Self::verify_password(&payload.password, &user.password_hash);
        if !valid {
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
        }

        let token = JwtUtils::generate_jwt(user.id, &user.username).map_err(|e| {
            tracing::error!("token generation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to issue token".to_string())
        })?;

        let cfg = Config::init();
        let token_expires_at =
            (Utc::now() + chrono::Duration::minutes(cfg.jwt_expires_in)).timestamp() as usize;

        Ok(LoginResponse {
            token,
            token_expires_at,
        })
    }

    fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify_password(password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
