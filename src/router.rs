//! In-process router with a history stack
//!
//! Every navigation into a protected route, including going back, passes
//! through the [`RouteGuard`]. A denied navigation leaves `/` in place of
//! the entry it tried to open.

use std::fmt;
use std::sync::Arc;

use crate::session::guard::{Resolution, RouteGuard};
use crate::session::SessionContext;

/// Client routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`: auth screen
    Landing,
    /// `/home`: browse screen
    Home,
    /// `/movie/{id}`: detail screen
    Movie(u64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Home => "/home".to_string(),
            Route::Movie(id) => format!("/movie/{}", id),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Landing),
            "/home" => Some(Route::Home),
            _ => trimmed
                .strip_prefix("/movie/")
                .and_then(|id| id.parse().ok())
                .map(Route::Movie),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Landing)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub struct Router {
    history: Vec<Route>,
    guard: RouteGuard,
    session: Arc<SessionContext>,
}

impl Router {
    /// Start at `/`
    pub fn new(guard: RouteGuard, session: Arc<SessionContext>) -> Self {
        Self {
            history: vec![Route::Landing],
            guard,
            session,
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Landing)
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Push a new entry
    pub fn navigate(&mut self, route: Route) -> Route {
        self.history.push(route);
        self.settle()
    }

    /// Swap the current entry
    pub fn replace(&mut self, route: Route) -> Route {
        match self.history.last_mut() {
            Some(top) => *top = route,
            None => self.history.push(route),
        }
        self.settle()
    }

    /// Pop one entry; the first entry is never popped
    pub fn back(&mut self) -> Route {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.settle()
    }

    /// Re-run the guard on the current entry
    fn settle(&mut self) -> Route {
        let current = self.current();
        if let Resolution::Redirect(to) = self.guard.resolve(current, &self.session) {
            if let Some(top) = self.history.last_mut() {
                *top = to;
            }
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, UserProfile};

    fn signed_in() -> Arc<SessionContext> {
        let ctx = SessionContext::ephemeral();
        ctx.begin(Session {
            credential: "t1".into(),
            profile: UserProfile {
                username: "alice".into(),
                email: "a@x.com".into(),
            },
        })
        .unwrap();
        Arc::new(ctx)
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Landing.path(), "/");
        assert_eq!(Route::Home.path(), "/home");
        assert_eq!(Route::Movie(42).path(), "/movie/42");
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Landing));
        assert_eq!(Route::parse("/home"), Some(Route::Home));
        assert_eq!(Route::parse("/home/"), Some(Route::Home));
        assert_eq!(Route::parse("/movie/123"), Some(Route::Movie(123)));
        assert_eq!(Route::parse("/movie/abc"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_navigate_without_credential_redirects() {
        let mut router = Router::new(RouteGuard::default(), Arc::new(SessionContext::ephemeral()));
        assert_eq!(router.navigate(Route::Home), Route::Landing);
        assert_eq!(router.navigate(Route::Movie(123)), Route::Landing);
        assert!(router.history().iter().all(|r| *r == Route::Landing));
    }

    #[test]
    fn test_navigate_and_back_with_credential() {
        let mut router = Router::new(RouteGuard::default(), signed_in());
        router.navigate(Route::Home);
        router.navigate(Route::Movie(7));
        assert_eq!(router.current(), Route::Movie(7));

        assert_eq!(router.back(), Route::Home);
        assert_eq!(router.back(), Route::Landing);
        // Never pops the first entry
        assert_eq!(router.back(), Route::Landing);
        assert_eq!(router.history().len(), 1);
    }

    #[test]
    fn test_back_rechecks_guard_after_logout() {
        let session = signed_in();
        let mut router = Router::new(RouteGuard::default(), session.clone());
        router.navigate(Route::Home);
        router.navigate(Route::Movie(7));

        session.end().unwrap();
        assert_eq!(router.back(), Route::Landing);
    }

    #[test]
    fn test_replace_swaps_top_entry() {
        let mut router = Router::new(RouteGuard::default(), signed_in());
        router.navigate(Route::Home);
        router.replace(Route::Movie(9));
        assert_eq!(router.history(), &[Route::Landing, Route::Movie(9)]);
    }
}
