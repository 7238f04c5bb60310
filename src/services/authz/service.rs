//! The authorization pipeline: extract → evaluate → (caller) construct.
use std::fmt;

use super::credential::extract_bearer;
use super::decision::{Decision, IncomingRequestContext};
use super::policy::{FixedLengthValidator, TokenValidator, evaluate};

/// Stateless decision service shared by every transport binding.
///
/// Holds nothing but the validator, so concurrent calls never contend.
pub struct AuthorizationService<V = FixedLengthValidator> {
    validator: V,
}

impl<V> fmt::Debug for AuthorizationService<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationService").finish_non_exhaustive()
    }
}

impl Default for AuthorizationService {
    fn default() -> Self {
        Self::new(FixedLengthValidator::default())
    }
}

impl<V: TokenValidator> AuthorizationService<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }

    pub async fn check(&self, ctx: &IncomingRequestContext) -> Decision {
        tracing::debug!(method = ctx.method(), path = ctx.path(), "checking bearer token");

        let credential = extract_bearer(ctx);
        let decision = evaluate(&self.validator, credential.as_ref()).await;

        match &decision {
            Decision::Allow { .. } => {
                tracing::debug!(path = ctx.path(), "bearer token is good");
            }
            Decision::Deny { status_code, .. } => {
                tracing::info!(
                    path = ctx.path(),
                    status = *status_code,
                    credential_present = credential.is_some(),
                    "bearer token is not good"
                );
            }
        }

        decision
    }
}
