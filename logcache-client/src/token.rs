//! Access-token capability
//!
//! Token acquisition and refresh live with the caller. The transport asks
//! for the current token on every request, so rotated tokens are picked up
//! without rebuilding the client.

use std::fmt;

/// Supplies the access token valid at call time
pub trait TokenSupplier: Send + Sync {
    /// Returns the current access token
    ///
    /// Called once per outbound request. Implementations should be cheap or
    /// do their own caching.
    fn access_token(&self) -> String;
}

impl<F> TokenSupplier for F
where
    F: Fn() -> String + Send + Sync,
{
    fn access_token(&self) -> String {
        self()
    }
}

/// A token that never changes
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSupplier for StaticToken {
    fn access_token(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(<redacted>)")
    }
}

/// Build the `Authorization` header value for `token`
///
/// Tokens already carrying a bearer scheme are sent as-is. Empty tokens
/// produce no header.
pub fn authorization_value(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let has_scheme = token
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
    if has_scheme {
        Some(token.to_string())
    } else {
        Some(format!("Bearer {token}"))
    }
}
