/*
 * Responsibility
 * - 1 回の Check 呼び出しに閉じた値 (IncomingRequestContext / Decision)
 * - 呼び出しを跨いで保持される状態は無い
 */
use std::collections::BTreeMap;

/// Body returned to the original client on every denial.
///
/// The same text is used for "no credential" and "invalid credential" so the
/// caller cannot tell the two apart.
pub const DENIED_BODY: &str =
    "Need an Authorization Header with a 3 character bearer token! #secure";

/// Attachment header carrying the token fingerprint on allow.
pub const RATELIMIT_HEADER: &str = "x-ext-auth-ratelimit";

/// HTTP status used for every denial.
pub const DENIED_STATUS: u16 = 401;

/// Attributes of the proxied request being authorized.
///
/// Header names are stored lower-cased, so lookups are case-insensitive.
/// Repeated headers are folded into one comma-separated value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequestContext {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
}

impl IncomingRequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Headers to merge into the upstream-bound request (name -> value).
pub type Attachments = BTreeMap<String, String>;

/// Outcome of one authorization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow { attachments: Attachments },
    Deny { status_code: u16, body: &'static str },
}

impl Decision {
    pub fn allow(attachments: Attachments) -> Self {
        Self::Allow { attachments }
    }

    pub fn unauthorized() -> Self {
        Self::Deny {
            status_code: DENIED_STATUS,
            body: DENIED_BODY,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}
