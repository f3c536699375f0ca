use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user_id: i64, // Owning user id
    #[serde(rename = "roleName")]
    pub role_name: String, // Role at issuance time
    pub exp: i64,     // Expiration timestamp
    pub iat: i64,     // Issued at timestamp
    pub iss: String,  // Issuer
}

/// Authenticated user/role pair extracted from a verified token.
///
/// Created per request and attached to the request extensions; never
/// persisted or cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role_name: String,
}

/// JWT Service - creates and verifies JWT tokens
///
/// The signing secret is injected once at construction, before the server
/// starts accepting traffic. Construction fails if the secret is absent, so
/// every later call shares the same initialization outcome.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        })
    }

    /// Issue a new JWT token for a user
    ///
    /// Token expires after 24 hours
    pub fn issue(&self, user_id: i64, role_name: &str) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(24);

        let claims = Claims {
            user_id,
            role_name: role_name.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a token and extract the identity it carries
    ///
    /// Accepts either a raw token or one carrying the `Bearer ` scheme.
    /// The expected algorithm is pinned to HS256; the `alg` header of the
    /// token itself is never trusted. Expiration is checked with zero
    /// leeway, so a token verified at or after its `exp` instant fails
    /// with `ExpiredToken`.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })?;

        Ok(Identity {
            user_id: claims.user_id,
            role_name: claims.role_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret_key", "test_issuer".to_string()).unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = service();

        let token = service.issue(42, "admin").unwrap();
        let identity = service.verify(&token).unwrap();

        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.role_name, "admin");
    }

    #[test]
    fn test_verify_strips_bearer_prefix() {
        let service = service();

        let token = service.issue(7, "user").unwrap();
        let identity = service.verify(&format!("Bearer {}", token)).unwrap();

        assert_eq!(identity.user_id, 7);
    }

    #[test]
    fn test_invalid_token() {
        let service = service();
        let result = service.verify("invalid_token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string()).unwrap();
        let service2 = JwtService::new("secret2", "test_issuer".to_string()).unwrap();

        let token = service1.issue(1, "user").unwrap();

        // Token created with secret1 should not verify with secret2
        let result = service2.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = JwtService::new("", "test_issuer".to_string());
        assert!(matches!(result, Err(AuthError::MissingSecret)));
    }

    #[test]
    fn test_expired_token() {
        let service = service();

        // Encode a token whose expiration is already in the past
        let now = chrono::Utc::now();
        let claims = Claims {
            user_id: 9,
            role_name: "user".to_string(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
            iat: (now - chrono::Duration::hours(25)).timestamp(),
            iss: "test_issuer".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .unwrap();

        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn test_algorithm_is_pinned() {
        let service = service();

        // A token signed with a different algorithm must be rejected even
        // though the secret matches
        let now = chrono::Utc::now();
        let claims = Claims {
            user_id: 3,
            role_name: "user".to_string(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
            iss: "test_issuer".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .unwrap();

        let result = service.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expiration_is_24_hours() {
        let service = service();
        let token = service.issue(5, "user").unwrap();

        let validation = {
            let mut v = Validation::new(Algorithm::HS256);
            v.set_issuer(&["test_issuer"]);
            v
        };
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test_secret_key"),
            &validation,
        )
        .unwrap()
        .claims;

        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 23 * 3600);
        assert!(expires_in <= 24 * 3600);
    }
}
