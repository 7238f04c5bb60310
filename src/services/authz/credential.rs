//! Bearer credential extraction from the `authorization` header.
//!
//! The header value is split on the literal `"Bearer "` (capital B, one
//! trailing space). A credential exists only when the separator occurs exactly
//! once and is followed by a non-empty remainder. Anything before the
//! separator is ignored, and a token that itself contains `"Bearer "` is
//! rejected rather than re-split. This is looser than RFC 6750.
//!
//! Extraction is total. Missing or malformed headers yield `None`, never an error.
use std::fmt;

use super::decision::IncomingRequestContext;

pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const BEARER_SEPARATOR: &str = "Bearer ";

/// Opaque bearer token taken from the request.
///
/// `Debug` does not print the token so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

pub fn extract_bearer(ctx: &IncomingRequestContext) -> Option<Credential> {
    ctx.header(AUTHORIZATION_HEADER).and_then(parse_bearer)
}

pub fn parse_bearer(value: &str) -> Option<Credential> {
    let (_, token) = value.split_once(BEARER_SEPARATOR)?;

    if token.is_empty() || token.contains(BEARER_SEPARATOR) {
        return None;
    }

    Some(Credential(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_auth(value: &str) -> IncomingRequestContext {
        IncomingRequestContext::new("GET", "/").with_header("authorization", value)
    }

    #[test]
    fn extracts_token_after_separator() {
        let cred = extract_bearer(&ctx_with_auth("Bearer foo")).map(|c| c.as_str().to_string());
        assert_eq!(cred.as_deref(), Some("foo"));
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let ctx = IncomingRequestContext::new("GET", "/").with_header("Authorization", "Bearer foo");
        assert!(extract_bearer(&ctx).is_some());
    }

    #[test]
    fn missing_header_is_absent() {
        let ctx = IncomingRequestContext::new("GET", "/").with_header("x-other", "Bearer foo");
        assert!(extract_bearer(&ctx).is_none());
    }

    #[test]
    fn wrong_scheme_is_absent() {
        assert!(parse_bearer("Basic abc123").is_none());
    }

    #[test]
    fn separator_is_case_sensitive() {
        assert!(parse_bearer("bearer foo").is_none());
        assert!(parse_bearer("BEARER foo").is_none());
        assert!(parse_bearer("Bearerfoo").is_none());
    }

    #[test]
    fn empty_token_is_absent() {
        assert!(parse_bearer("Bearer ").is_none());
    }

    #[test]
    fn repeated_separator_is_absent() {
        assert!(parse_bearer("Bearer Bearer foo").is_none());
        assert!(parse_bearer("Bearer foo Bearer bar").is_none());
    }

    #[test]
    fn text_before_separator_is_ignored() {
        let cred = parse_bearer("xBearer abc").map(|c| c.as_str().to_string());
        assert_eq!(cred.as_deref(), Some("abc"));
    }

    #[test]
    fn debug_does_not_print_token() {
        let cred = parse_bearer("Bearer s3cr3t").map(|c| format!("{:?}", c));
        let printed = cred.unwrap_or_default();
        assert!(!printed.contains("s3cr3t"));
        assert!(printed.contains("len"));
    }
}
