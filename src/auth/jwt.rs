//! Session token issue and validation (HS512 JWT).

use std::collections::HashSet;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::models::SessionToken;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by a session token. Field order fixes the encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub name: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Owns the signing key. Validation is a pure function of token bytes and key.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// `ttl = None` issues tokens without `exp`; they stay valid until the key changes.
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        match ttl {
            Some(_) => {
                validation.validate_exp = true;
                validation.required_spec_claims = HashSet::from(["exp".to_string()]);
            }
            None => {
                validation.validate_exp = false;
                validation.required_spec_claims = HashSet::new();
            }
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn issue(&self, subject: &str, name: &str) -> Result<SessionToken, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Issue(e.to_string()))?;
        Ok(SessionToken::new(token))
    }

    /// Decode and verify. Accepts the raw token or `Bearer <token>`.
    pub fn validate(&self, presented: &str) -> Result<Claims, TokenError> {
        let presented = presented.trim();
        let token = presented.strip_prefix(BEARER_PREFIX).unwrap_or(presented);
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-jwt-secret-min-32-chars-long!!";

    fn service() -> TokenService {
        TokenService::new(SECRET, None)
    }

    #[test]
    fn issue_and_validate() {
        let tokens = service();
        let token = tokens.issue("a@x.com", "Ana").unwrap();
        let claims = tokens.validate(token.as_str()).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn token_has_three_parts() {
        let token = service().issue("a@x.com", "Ana").unwrap();
        assert_eq!(token.as_str().split('.').count(), 3);
    }

    #[test]
    fn accepts_bearer_prefix() {
        let tokens = service();
        let token = tokens.issue("a@x.com", "Ana").unwrap();
        let claims = tokens.validate(&format!("Bearer {}", token)).unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }

    #[test]
    fn any_flipped_byte_is_rejected() {
        let tokens = service();
        let token = tokens.issue("a@x.com", "Ana").unwrap().into_string();
        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            tampered[i] ^= 0x01;
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                tokens.validate(&tampered).is_err(),
                "flipping byte {} went undetected",
                i
            );
        }
    }

    #[test]
    fn other_key_is_signature_mismatch() {
        let token = service().issue("a@x.com", "Ana").unwrap();
        let other = TokenService::new(b"another-secret-also-32-chars-long!!", None);
        assert_eq!(
            other.validate(token.as_str()),
            Err(TokenError::SignatureMismatch)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.validate(""), Err(TokenError::Malformed));
        assert_eq!(tokens.validate("Bearer "), Err(TokenError::Malformed));
        assert_eq!(tokens.validate("abc.def"), Err(TokenError::Malformed));
        assert_eq!(tokens.validate("not a token"), Err(TokenError::Malformed));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let claims = Claims {
            sub: "a@x.com".into(),
            name: "Ana".into(),
            iat: Utc::now().timestamp(),
            exp: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn ttl_sets_exp() {
        let tokens = TokenService::new(SECRET, Some(Duration::hours(1)));
        let token = tokens.issue("a@x.com", "Ana").unwrap();
        let claims = tokens.validate(token.as_str()).unwrap();
        let exp = claims.exp.unwrap();
        assert!(exp > claims.iat);
        assert!(exp - claims.iat <= 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new(SECRET, Some(Duration::hours(1)));
        let past = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: "a@x.com".into(),
            name: "Ana".into(),
            iat: past.timestamp(),
            exp: Some((past + Duration::minutes(5)).timestamp()),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(tokens.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn ttl_mode_requires_exp() {
        let without_exp = service().issue("a@x.com", "Ana").unwrap();
        let strict = TokenService::new(SECRET, Some(Duration::hours(1)));
        assert_eq!(
            strict.validate(without_exp.as_str()),
            Err(TokenError::Malformed)
        );
    }
}
