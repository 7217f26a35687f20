//! Route guard and the access policies it consults
//!
//! The guard is UI routing only. The server still authorizes every request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

use super::SessionContext;
use crate::router::Route;

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Decides whether the current session may enter protected routes
pub trait AccessPolicy: Send + Sync {
    fn check(&self, session: &SessionContext) -> Access;
}

/// Any non-empty stored credential counts as authenticated
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialPresent;

impl AccessPolicy for CredentialPresent {
    fn check(&self, session: &SessionContext) -> Access {
        if session.has_credential() {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

/// Like [`CredentialPresent`], but a JWT whose `exp` has passed is refused.
/// Credentials that are not JWT-shaped are treated as present.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnexpiredCredential {
    // Fixed clock for tests, otherwise the wall clock
    now: Option<i64>,
}

impl UnexpiredCredential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate expiry against a fixed unix timestamp
    pub fn at(now: i64) -> Self {
        Self { now: Some(now) }
    }

    fn now(&self) -> i64 {
        self.now.unwrap_or_else(|| chrono::Utc::now().timestamp())
    }
}

impl AccessPolicy for UnexpiredCredential {
    fn check(&self, session: &SessionContext) -> Access {
        let Some(token) = session.credential().filter(|t| !t.is_empty()) else {
            return Access::Denied;
        };

        match token_expiry(&token) {
            Some(exp) if exp <= self.now() => {
                debug!(exp, "stored credential expired");
                Access::Denied
            }
            _ => Access::Granted,
        }
    }
}

/// `exp` claim of a JWT-shaped token, if it has one
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
}

/// Where a navigation attempt ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Denied; replace the current history entry with this route
    Redirect(Route),
}

/// Gate for protected routes
pub struct RouteGuard {
    policy: Box<dyn AccessPolicy>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(Box::new(CredentialPresent))
    }
}

impl RouteGuard {
    pub fn new(policy: Box<dyn AccessPolicy>) -> Self {
        Self { policy }
    }

    /// Pick the policy from the expiry flag
    pub fn from_config(enforce_token_expiry: bool) -> Self {
        if enforce_token_expiry {
            Self::new(Box::new(UnexpiredCredential::new()))
        } else {
            Self::default()
        }
    }

    pub fn resolve(&self, route: Route, session: &SessionContext) -> Resolution {
        if !route.is_protected() {
            return Resolution::Render(route);
        }

        match self.policy.check(session) {
            Access::Granted => Resolution::Render(route),
            Access::Denied => {
                debug!(path = %route.path(), "guard redirect to landing");
                Resolution::Redirect(Route::Landing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, UserProfile};

    fn jwt(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{}}}"#, exp));
        format!("{}.{}.sig", header, payload)
    }

    fn session_with(token: &str) -> SessionContext {
        let ctx = SessionContext::ephemeral();
        ctx.begin(Session {
            credential: token.to_string(),
            profile: UserProfile {
                username: "alice".into(),
                email: "a@x.com".into(),
            },
        })
        .unwrap();
        ctx
    }

    #[test]
    fn test_token_expiry_reads_exp_claim() {
        assert_eq!(token_expiry(&jwt(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(token_expiry("opaque-token"), None);
        assert_eq!(token_expiry("a.b"), None);
        assert_eq!(token_expiry("a.!!!.c"), None);
    }

    #[test]
    fn test_credential_present_policy() {
        assert_eq!(CredentialPresent.check(&SessionContext::ephemeral()), Access::Denied);
        assert_eq!(CredentialPresent.check(&session_with("x")), Access::Granted);
    }

    #[test]
    fn test_unexpired_policy() {
        let policy = UnexpiredCredential::at(2_000);
        assert_eq!(policy.check(&session_with(&jwt(1_000))), Access::Denied);
        assert_eq!(policy.check(&session_with(&jwt(2_000))), Access::Denied);
        assert_eq!(policy.check(&session_with(&jwt(3_000))), Access::Granted);
        assert_eq!(policy.check(&session_with("opaque")), Access::Granted);
        assert_eq!(policy.check(&SessionContext::ephemeral()), Access::Denied);
    }

    #[test]
    fn test_guard_leaves_landing_alone() {
        let guard = RouteGuard::default();
        let empty = SessionContext::ephemeral();
        assert_eq!(
            guard.resolve(Route::Landing, &empty),
            Resolution::Render(Route::Landing)
        );
        assert_eq!(
            guard.resolve(Route::Movie(123), &empty),
            Resolution::Redirect(Route::Landing)
        );
    }
}
