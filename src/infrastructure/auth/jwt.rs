//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::storage::{DocumentId, Stored};
use crate::domain::{DomainError, User};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user document id)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create new claims for a stored user
    pub fn new(user: &Stored<User>, expiration_hours: u64) -> Result<Self, DomainError> {
        let now = Utc::now();
        let exp = i64::try_from(expiration_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "Token expiration of {} hours is out of range",
                    expiration_hours
                ))
            })?;

        Ok(Self {
            sub: user.id().as_str().to_string(),
            username: user.document().username().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// The user the token was issued to
    pub fn user_id(&self) -> DocumentId {
        DocumentId::from_external(self.sub.clone())
    }
}

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_EXPIRATION_HOURS: u64 = 24 * 365;

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a JWT token for a user
    fn generate(&self, user: &Stored<User>) -> Result<String, DomainError>;

    /// Validate a JWT token and return the claims
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;
}

/// HS256 JWT service signing with a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &Stored<User>) -> Result<String, DomainError> {
        let claims = JwtClaims::new(user, self.config.expiration_hours)?;

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user() -> Stored<User> {
        Stored::new(
            DocumentId::generate(),
            0,
            User::new("root", Some("Superuser".to_string()), "hash").unwrap(),
        )
    }

    #[test]
    fn test_generate_and_validate() {
        let service = JwtService::new(JwtConfig::new("test-secret", 1));
        let user = stored_user();

        let token = service.generate(&user).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id(), *user.id());
        assert_eq!(claims.username, "root");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new(JwtConfig::new("secret-a", 1));
        let verifier = JwtService::new(JwtConfig::new("secret-b", 1));

        let token = issuer.generate(&stored_user()).unwrap();
        let result = verifier.validate(&token);

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = JwtConfig::new("test-secret", 1);
        let service = JwtService::new(config.clone());

        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: DocumentId::generate().to_string(),
            username: "root".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(JwtConfig::new("test-secret", 1));

        assert!(service.validate("not-a-jwt").is_err());
    }

    #[test]
    fn test_claims_span_configured_hours() {
        let claims = JwtClaims::new(&stored_user(), 24).unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_out_of_range_expiration_rejected() {
        let service = JwtService::new(JwtConfig::new("test-secret", u64::MAX));

        assert!(matches!(
            service.generate(&stored_user()),
            Err(DomainError::Configuration { .. })
        ));
        assert!(JwtClaims::new(&stored_user(), i64::MAX as u64).is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = JwtService::new(JwtConfig::new("super-secret", 1));

        let debug = format!("{:?}", service);

        assert!(!debug.contains("super-secret"));
    }
}
