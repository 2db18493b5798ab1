//! Issue and verify session tokens against one configured secret.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use civichub_core::config::AuthConfig;
use civichub_core::error::AppError;

use super::claims::{Claims, TokenSubject};
use super::decoder::JwtDecoder;
use super::encoder::{IssuedToken, JwtEncoder};

/// Message returned for every refused token, whatever the cause.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Stateless session token codec.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenCodec {
    /// Creates a codec from a raw secret and TTL.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoder: JwtEncoder::new(secret.as_bytes(), ttl),
            decoder: JwtDecoder::new(secret.as_bytes()),
        }
    }

    /// Builds the codec from configuration. Fails when no signing secret is
    /// configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let secret = config.signing_secret()?;
        let minutes = i64::try_from(config.token_ttl_minutes)
            .map_err(|_| AppError::configuration("auth.token_ttl_minutes is too large"))?;
        if minutes == 0 {
            return Err(AppError::configuration(
                "auth.token_ttl_minutes must be positive",
            ));
        }
        Ok(Self::new(secret, Duration::minutes(minutes)))
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.encoder.ttl()
    }

    /// Issues a token valid from now.
    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issues a token with `iat = now`.
    pub fn issue_at(
        &self,
        subject: &TokenSubject,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        self.encoder.encode_at(subject, now)
    }

    /// Verifies a token as of now.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        self.decoder.decode_at(token, now).map_err(|reason| {
            debug!(%reason, "Session token refused");
            AppError::unauthorized(INVALID_TOKEN_MESSAGE)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::TokenError;
    use civichub_core::error::ErrorKind;
    use civichub_entity::account::AccountRole;
    use uuid::Uuid;

    fn subject() -> TokenSubject {
        TokenSubject {
            id: Uuid::new_v4(),
            email: "ada@example.org".into(),
            role: AccountRole::Admin,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", Duration::minutes(60))
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let subject = subject();
        let issued = codec.issue(&subject).unwrap();
        let claims = codec.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, subject.id);
        assert_eq!(claims.email, subject.email);
        assert_eq!(claims.role, AccountRole::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expiry_boundary_is_exact() {
        let codec = codec();
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let issued = codec.issue_at(&subject(), t0).unwrap();

        let just_before = t0 + Duration::minutes(60) - Duration::seconds(1);
        assert!(codec.verify_at(&issued.token, just_before).is_ok());

        let at_expiry = t0 + Duration::minutes(60);
        let err = codec.verify_at(&issued.token, at_expiry).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, INVALID_TOKEN_MESSAGE);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issued = codec().issue(&subject()).unwrap();
        let other = TokenCodec::new("another-secret", Duration::minutes(60));
        let err = other.verify(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_failures_are_classified_internally() {
        let decoder = JwtDecoder::new(b"test-secret");
        let now = Utc::now();
        assert!(matches!(
            decoder.decode_at("not-a-jwt", now),
            Err(TokenError::Malformed(_))
        ));

        let issued = TokenCodec::new("another-secret", Duration::minutes(1))
            .issue_at(&subject(), now)
            .unwrap();
        assert_eq!(
            decoder.decode_at(&issued.token, now),
            Err(TokenError::InvalidSignature)
        );

        let stale = codec()
            .issue_at(&subject(), now - Duration::hours(2))
            .unwrap();
        assert_eq!(decoder.decode_at(&stale.token, now), Err(TokenError::Expired));
    }

    #[test]
    fn test_from_config_requires_secret() {
        let err = TokenCodec::from_config(&AuthConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        let config = AuthConfig {
            jwt_secret: Some("configured".into()),
            ..Default::default()
        };
        let codec = TokenCodec::from_config(&config).unwrap();
        assert_eq!(codec.ttl(), Duration::minutes(60));
    }
}
