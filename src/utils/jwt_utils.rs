use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::Config;
use crate::models::auth_model::Claims;

pub struct JwtUtils;

impl JwtUtils {
    /// Generate a JWT token with the provided user ID and username
    pub fn generate_jwt(user_id: i64, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let cfg = Config::init();
        let now = Utc::now();
        let expire = now + Duration::minutes(cfg.jwt_expires_in);
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: expire.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
    }

    /// Validate a JWT token and return the token data
    pub fn validate_jwt(token: &str) -> Result<jsonwebtoken::TokenData<Claims>, jsonwebtoken::errors::Error> {
        let cfg = Config::init();
        let decoding_key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation)
    }
}
