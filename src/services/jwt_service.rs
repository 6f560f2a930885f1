use jsonwebtoken::{decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::user::Claims;

// Generates a login token for `username`, valid for `ttl_hours`.
pub fn create_jwt(username: &str, secret: &str, ttl_hours: i64) -> Result<String, Error> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// Validates the token and returns the username it was issued to.
pub fn validate_token(token: &str, secret: &str) -> Option<String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token.trim(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_identifies_the_user() {
        let token = create_jwt("ann", "s3cret", 1).unwrap();
        assert_eq!(validate_token(&token, "s3cret").as_deref(), Some("ann"));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = create_jwt("ann", "s3cret", 1).unwrap();
        assert_eq!(validate_token(&token, "other"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = create_jwt("ann", "s3cret", -2).unwrap();
        assert_eq!(validate_token(&token, "s3cret"), None);
    }
}
