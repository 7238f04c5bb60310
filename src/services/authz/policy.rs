/*
 * Responsibility
 * - Credential → Decision の評価 (ポリシー本体)
 * - トークン検証は TokenValidator に閉じ込める (差し替え可能にする)
 * - fingerprint (SHA-256 + base64) の計算
 */
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

use super::credential::Credential;
use super::decision::{Attachments, Decision, RATELIMIT_HEADER};

/// Token length accepted by [`FixedLengthValidator`].
pub const VALID_TOKEN_LEN: usize = 3;

/// Single-method capability deciding whether a bearer token is valid.
///
/// The evaluator only asks this question, so a remote lookup or a signature
/// check can replace the default implementation without touching extraction
/// or response construction. Implementations must map their own failures to
/// `false`; the evaluator has no error path.
#[async_trait]
pub trait TokenValidator: Send + Sync + 'static {
    async fn validate(&self, token: &str) -> bool;
}

/// Placeholder policy: a token is valid when its byte length equals `len`.
///
/// Stands in for a real credential authority.
#[derive(Debug, Clone, Copy)]
pub struct FixedLengthValidator {
    len: usize,
}

impl FixedLengthValidator {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for FixedLengthValidator {
    fn default() -> Self {
        Self::new(VALID_TOKEN_LEN)
    }
}

#[async_trait]
impl TokenValidator for FixedLengthValidator {
    async fn validate(&self, token: &str) -> bool {
        token.len() == self.len
    }
}

/// base64(SHA-256(token)), standard alphabet with padding.
///
/// Deterministic and non-reversible, so downstream rate limiting can key on
/// token identity without seeing the raw token.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    STANDARD.encode(hasher.finalize())
}

pub async fn evaluate<V>(validator: &V, credential: Option<&Credential>) -> Decision
where
    V: TokenValidator + ?Sized,
{
    let Some(credential) = credential else {
        return Decision::unauthorized();
    };

    if !validator.validate(credential.as_str()).await {
        return Decision::unauthorized();
    }

    let mut attachments = Attachments::new();
    attachments.insert(RATELIMIT_HEADER.to_string(), fingerprint(credential.as_str()));
    Decision::allow(attachments)
}

// SHA-256("abc"), FIPS 180-2 appendix B.1, base64-encoded.
const SELF_CHECK_INPUT: &str = "abc";
const SELF_CHECK_DIGEST: &str = "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0=";

#[derive(Debug, thiserror::Error)]
#[error("sha-256 self-check failed: expected {expected}, got {actual}")]
pub struct SelfCheckError {
    pub expected: &'static str,
    pub actual: String,
}

/// Verifies the hashing primitive once at startup instead of per call.
pub fn self_check() -> Result<(), SelfCheckError> {
    verify_digest(SELF_CHECK_INPUT, SELF_CHECK_DIGEST)
}

fn verify_digest(input: &str, expected: &'static str) -> Result<(), SelfCheckError> {
    let actual = fingerprint(input);
    if actual != expected {
        return Err(SelfCheckError { expected, actual });
    }
    Ok(())
}
