use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::UserRole;

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
}

/// JWT claims carried by both token types.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub token_type: TokenType,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expiration, unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        email: &str,
        role: UserRole,
        token_type: TokenType,
        expiration_hours: i64,
    ) -> Self {
        let now = jiff::Timestamp::now().as_second();
        Self {
            sub: user_id,
            email: email.to_string(),
            role,
            token_type,
            iat: now,
            exp: now + expiration_hours * 3600,
        }
    }
}

/// An issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Signs a token for a user.
pub fn generate_token(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(user_id, email, role, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Signs an access and a refresh token for the same user.
pub fn generate_token_pair(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    secret: &str,
    access_expiration_hours: i64,
    refresh_expiration_hours: i64,
) -> AppResult<TokenPair> {
    let access_token = generate_token(
        user_id,
        email,
        role,
        TokenType::Access,
        secret,
        access_expiration_hours,
    )?;
    let refresh_token = generate_token(
        user_id,
        email,
        role,
        TokenType::Refresh,
        secret,
        refresh_expiration_hours,
    )?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_in: access_expiration_hours * 3600,
    })
}

/// Validates and decodes a token, optionally checking its type.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ),
        });
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_purposes";

    fn user_id() -> Uuid {
        Uuid::parse_str("6b9c3f4e-8d2a-4f5b-9c1e-2a3b4c5d6e7f").unwrap()
    }

    fn access_token(hours: i64) -> String {
        generate_token(
            user_id(),
            "jane@example.com",
            UserRole::Applicant,
            TokenType::Access,
            TEST_SECRET,
            hours,
        )
        .unwrap()
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let token = access_token(1);
        assert_eq!(token.matches('.').count(), 2);

        let claims = validate_access_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, user_id());
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.role, UserRole::Applicant);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_generate_token_pair() {
        let pair = generate_token_pair(
            user_id(),
            "admin@example.com",
            UserRole::Admin,
            TEST_SECRET,
            1,
            168,
        )
        .unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.expires_in, 3600);

        let refresh = validate_refresh_token(&pair.refresh_token, TEST_SECRET).unwrap();
        assert_eq!(refresh.role, UserRole::Admin);
        assert_eq!(refresh.exp - refresh.iat, 168 * 3600);
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let token = access_token(1);
        match validate_refresh_token(&token, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token = access_token(1);
        match validate_token(&token, "another_secret_key_that_is_long_enough", None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_garbage() {
        assert!(matches!(
            validate_token("not-a-token", TEST_SECRET, None),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_expired_token() {
        let token = access_token(-1);
        match validate_token(&token, TEST_SECRET, None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims::new(user_id(), "a@b.c", UserRole::Applicant, TokenType::Refresh, 1);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_type\":\"refresh\""));
        assert!(json.contains("\"role\":\"applicant\""));
        assert!(json.contains("6b9c3f4e-8d2a-4f5b-9c1e-2a3b4c5d6e7f"));
    }
}
