//! # Basic-Auth Gate
//!
//! First stage of an auth-enabled environment chain: rejects requests that
//! do not present valid HTTP Basic credentials.
//!
//! Some deployments sit behind an intermediary that consumes the original
//! `Authorization` header and re-exposes it as `X-Forwarded-Authorization`.
//! When that header is present and carries a `Basic ` value, it is used in
//! place of the standard header before parsing.

use crate::error::RelayError;
use crate::pipeline::{RelayContext, RelayStage, StageFlow};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;
use tracing::{info, instrument};

const AUTHORIZATION: &str = "authorization";
const FORWARDED_AUTHORIZATION: &str = "x-forwarded-authorization";
const BASIC_PREFIX: &str = "Basic ";

/// A [`RelayStage`] validating HTTP Basic credentials against the
/// environment's configured pair.
///
/// Halts the chain with `403 Forbidden` when credentials are absent or
/// wrong; the rejection reason is logged at info and never sent to the
/// caller. Comparison is constant-time to avoid credential recovery through
/// timing.
pub struct BasicAuthGate {
    username: String,
    password: String,
}

impl BasicAuthGate {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Resolve the effective `Authorization` value for this request.
    ///
    /// A `Basic `-prefixed `X-Forwarded-Authorization` value takes the place
    /// of the standard header; any other forwarded value is ignored.
    fn effective_authorization<'a>(&self, ctx: &'a RelayContext) -> Option<&'a str> {
        ctx.header(FORWARDED_AUTHORIZATION)
            .filter(|value| value.starts_with(BASIC_PREFIX))
            .or_else(|| ctx.header(AUTHORIZATION))
    }

    /// Check a decoded credential pair against the configured pair.
    fn credentials_match(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

impl std::fmt::Debug for BasicAuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthGate")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Decode a `Basic <base64>` header value into a `(username, password)` pair.
///
/// The scheme name is matched case-insensitively, the token is decoded as
/// standard base64, and the result splits at the first `:`.
fn decode_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, token) = value.split_at_checked(BASIC_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BASIC_PREFIX) {
        return None;
    }

    let decoded = STANDARD.decode(token).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[async_trait]
impl RelayStage for BasicAuthGate {
    #[instrument(skip(self, ctx))]
    async fn handle(&self, ctx: &mut RelayContext) -> StageFlow {
        let credentials = self
            .effective_authorization(ctx)
            .and_then(decode_basic_credentials);

        let rejection = match credentials {
            None => RelayError::AuthRejected {
                reason: "auth not provided",
            },
            Some((username, password)) => {
                if self.credentials_match(&username, &password) {
                    return StageFlow::Continue;
                }
                RelayError::AuthRejected {
                    reason: "wrong auth",
                }
            }
        };

        info!(error = %rejection, "Rejecting webhook request");
        ctx.status = rejection.status_code();
        StageFlow::Halt
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
