use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Secret and expected audience for bearer token verification. Tokens minted
/// for a different audience are rejected even when the signature checks out.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub audience: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn sign_token(uid: &str, config: &AuthConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(8);
    let claims = Claims {
        sub: uid.to_string(),
        aud: config.audience.clone(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(audience: &str) -> AuthConfig {
        AuthConfig {
            secret: "test-secret".to_string(),
            audience: audience.to_string(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let config = config("fleet-frontend");
        let token = sign_token("driver-1", &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "driver-1");
        assert_eq!(claims.aud, "fleet-frontend");
    }

    #[test]
    fn foreign_audience_is_rejected() {
        let token = sign_token("driver-1", &config("other-project")).unwrap();
        assert!(verify_token(&token, &config("fleet-frontend")).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config_a = config("fleet-frontend");
        let config_b = AuthConfig {
            secret: "different".to_string(),
            ..config_a.clone()
        };
        let token = sign_token("driver-1", &config_a).unwrap();
        assert!(verify_token(&token, &config_b).is_err());
    }
}
