//! App state and core application logic
//!
//! Owns the router and per-screen state, turns key presses into state
//! changes, and spawns network work. Spawned tasks report back through
//! [`AppEvent`]s which the event loop drains every tick, so all state
//! mutation happens on the UI task.

pub mod auth;
pub mod browse;
pub mod detail;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::fetch::{self, FetchPlan, RowEvent};
use crate::models::{TitleDetail, TitleSummary};
use crate::router::{Route, Router};
use crate::session::{RouteGuard, SessionContext};

use self::auth::{AuthMode, AuthOutcome, AuthScreen};
use self::browse::{BrowseState, SearchAction, Tab};
use self::detail::DetailState;

pub const PROFILE_NAME_FALLBACK: &str = "User";
pub const PROFILE_EMAIL_FALLBACK: &str = "user@example.com";

// =============================================================================
// Events
// =============================================================================

/// Results reported by spawned network tasks
#[derive(Debug)]
pub enum AppEvent {
    Rows {
        epoch: u64,
        event: RowEvent,
    },
    Detail {
        epoch: u64,
        id: u64,
        result: Result<Option<TitleDetail>, String>,
    },
    Search {
        query: String,
        result: Result<Vec<TitleSummary>, String>,
    },
    Auth {
        outcome: Result<AuthOutcome, String>,
    },
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling on the browse screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Search box focused
    Editing,
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,

    // Screen states
    pub auth: AuthScreen,
    pub browse: BrowseState,
    pub detail: DetailState,

    /// One-line notice for failures that have no screen of their own
    pub notice: Option<String>,

    api: ApiClient,
    router: Router,
    // Bumped on logout; events tagged with an older epoch are dropped
    epoch: u64,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
    browse_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(api: ApiClient, guard: RouteGuard) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let router = Router::new(guard, api.session().clone());
        Self {
            running: true,
            input_mode: InputMode::Normal,
            auth: AuthScreen::default(),
            browse: BrowseState::default(),
            detail: DetailState::default(),
            notice: None,
            api,
            router,
            epoch: 0,
            events_tx,
            events_rx,
            browse_task: None,
        }
    }

    /// Open `/home`; the guard sends an unauthenticated user to `/`
    pub fn start(&mut self) {
        let route = self.router.replace(Route::Home);
        self.on_enter(route);
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        self.api.session()
    }

    /// Avatar initial, name and email for the header
    pub fn profile_label(&self) -> (String, String, String) {
        let profile = self.session().profile();
        let name = profile
            .as_ref()
            .map(|p| p.username.clone())
            .filter(|n| !n.is_empty());
        let email = profile
            .map(|p| p.email)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| PROFILE_EMAIL_FALLBACK.to_string());
        let initial = name
            .as_deref()
            .and_then(|n| n.chars().next())
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string());
        (
            initial,
            name.unwrap_or_else(|| PROFILE_NAME_FALLBACK.to_string()),
            email,
        )
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn navigate(&mut self, route: Route) {
        let route = self.router.navigate(route);
        self.on_enter(route);
    }

    pub fn back(&mut self) {
        let route = self.router.back();
        self.on_enter(route);
    }

    fn on_enter(&mut self, route: Route) {
        debug!(path = %route.path(), "entered route");
        self.input_mode = InputMode::Normal;
        match route {
            Route::Landing => {}
            Route::Home => {
                if !self.browse.started {
                    self.spawn_browse_load();
                }
            }
            Route::Movie(id) => {
                self.detail.begin(id);
                self.spawn_detail(id);
            }
        }
    }

    /// Clear the session and return to `/`
    pub fn logout(&mut self) {
        if let Err(e) = self.session().end() {
            error!(error = %e, "failed to clear stored session");
            self.notice = Some(format!("Logout failed: {}", e));
        }

        self.epoch += 1;
        if let Some(task) = self.browse_task.take() {
            task.abort();
        }
        self.browse = BrowseState::default();
        self.detail = DetailState::default();
        self.auth = AuthScreen::default();
        info!("logged out");

        self.navigate(Route::Landing);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // -------------------------------------------------------------------------
    // Background work
    // -------------------------------------------------------------------------

    fn spawn_browse_load(&mut self) {
        self.browse.started = true;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let epoch = self.epoch;

        self.browse_task = Some(tokio::spawn(async move {
            fetch::execute(&api, &FetchPlan::browse(), |event| {
                let _ = tx.send(AppEvent::Rows { epoch, event });
            })
            .await;
        }));
    }

    fn spawn_detail(&self, id: u64) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let result = api.movie_detail(id).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Detail { epoch, id, result });
        });
    }

    fn spawn_search(&self, query: String) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = api.search(&query).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Search { query, result });
        });
    }

    fn spawn_auth_submit(&mut self) {
        let Some((mode, form)) = self.auth.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let outcome = auth::submit(&api, mode, &form).await;
            let _ = tx.send(AppEvent::Auth { outcome });
        });
    }

    fn spawn_social_login(&mut self) {
        let Some(credential) = self.auth.begin_social() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let outcome = auth::social_login(&api, &credential).await;
            let _ = tx.send(AppEvent::Auth { outcome });
        });
    }

    // -------------------------------------------------------------------------
    // Event application
    // -------------------------------------------------------------------------

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Rows { epoch, event } => {
                if epoch != self.epoch {
                    debug!(epoch, current = self.epoch, "dropping stale row event");
                    return;
                }
                self.browse.apply(event);
            }
            AppEvent::Detail { epoch, id, result } => {
                if epoch != self.epoch {
                    return;
                }
                self.detail.apply(id, result);
            }
            AppEvent::Search { query, result } => match result {
                Ok(results) => {
                    if self.browse.search.apply_results(&query, results) {
                        self.browse.clamp_cursor();
                    }
                }
                Err(e) => warn!(query = %query, error = %e, "search failed"),
            },
            AppEvent::Auth { outcome } => {
                if let Some(session) = self.auth.finish(outcome) {
                    match self.session().begin(session) {
                        Ok(()) => self.navigate(Route::Home),
                        Err(e) => {
                            error!(error = %e, "failed to store session");
                            self.auth.error = Some(auth::GENERIC_ERROR.to_string());
                        }
                    }
                }
            }
        }
    }

    /// Apply every event that has already arrived
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.notice = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match self.route() {
            Route::Landing => self.handle_auth_key(key),
            Route::Home => match self.input_mode {
                InputMode::Editing => self.handle_search_key(key),
                InputMode::Normal => self.handle_browse_key(key),
            },
            Route::Movie(_) => self.handle_detail_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl {
            let mode = match key.code {
                KeyCode::Char('l') => Some(AuthMode::Login),
                KeyCode::Char('s') => Some(AuthMode::Signup),
                KeyCode::Char('f') => Some(AuthMode::Forgot),
                KeyCode::Char('g') => return self.auth.open_social(),
                _ => None,
            };
            return match mode {
                Some(mode) if !self.auth.loading => {
                    self.auth.set_mode(mode);
                    true
                }
                _ => false,
            };
        }

        match key.code {
            KeyCode::Esc => {
                if self.auth.social_input.is_some() {
                    self.auth.social_input = None;
                } else {
                    self.quit();
                }
                true
            }
            KeyCode::Enter => {
                if self.auth.social_input.is_some() {
                    self.spawn_social_login();
                } else {
                    self.spawn_auth_submit();
                }
                true
            }
            KeyCode::Tab | KeyCode::Down => {
                self.auth.next_field();
                true
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.auth.prev_field();
                true
            }
            KeyCode::Backspace => {
                self.auth.backspace();
                true
            }
            KeyCode::Char(c) => {
                self.auth.insert(c);
                true
            }
            _ => false,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return true;
            }
            KeyCode::Char(c) => self.browse.search.push(c),
            KeyCode::Backspace => self.browse.search.pop(),
            _ => return false,
        };

        if let SearchAction::Fetch(query) = action {
            self.spawn_search(query);
        }
        self.browse.clamp_cursor();
        true
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.input_mode = InputMode::Editing;
                true
            }
            KeyCode::Esc => {
                if self.browse.search.query.is_empty() {
                    return false;
                }
                self.browse.search.on_input(String::new());
                self.browse.clamp_cursor();
                true
            }
            KeyCode::Tab => {
                let next = self.browse.tab.next();
                self.browse.set_tab(next);
                true
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                self.browse.set_tab(Tab::ALL[idx]);
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.browse.move_row(-1);
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.browse.move_row(1);
                true
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.browse.move_item(-1);
                true
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.browse.move_item(1);
                true
            }
            KeyCode::Enter => {
                if let Some(id) = self.browse.selected_title().map(|t| t.id) {
                    self.navigate(Route::Movie(id));
                }
                true
            }
            KeyCode::Char('i') => {
                if let Some(id) = self.browse.hero.as_ref().map(|h| h.id) {
                    self.navigate(Route::Movie(id));
                }
                true
            }
            KeyCode::Char('x') => {
                self.logout();
                true
            }
            _ => false,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.back();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail.scroll_up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail.scroll_down();
                true
            }
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('x') => {
                self.logout();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RowResult;
    use crate::models::{RowKey, Session, UserProfile};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    // Nothing listens here; spawned requests fail fast and are ignored
    fn offline_app(signed_in: bool) -> App {
        let session = Arc::new(SessionContext::ephemeral());
        if signed_in {
            session
                .begin(Session {
                    credential: "t1".into(),
                    profile: UserProfile {
                        username: "alice".into(),
                        email: "alice@example.com".into(),
                    },
                })
                .unwrap();
        }
        let api = ApiClient::new("http://127.0.0.1:9", session);
        App::new(api, RouteGuard::default())
    }

    fn summary(id: u64) -> TitleSummary {
        TitleSummary {
            id,
            title: Some(format!("Title {}", id)),
            name: None,
            overview: String::new(),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            vote_average: 7.0,
            release_date: None,
            first_air_date: None,
        }
    }

    #[test]
    fn test_start_without_session_lands_on_auth() {
        let mut app = offline_app(false);
        app.start();
        assert_eq!(app.route(), Route::Landing);
        assert!(!app.browse.started);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = offline_app(false);
        app.handle_key(ctrl('c'));
        assert!(!app.running);
    }

    #[test]
    fn test_auth_mode_shortcuts() {
        let mut app = offline_app(false);
        app.start();
        app.handle_key(ctrl('s'));
        assert_eq!(app.auth.mode, AuthMode::Signup);
        app.handle_key(ctrl('f'));
        assert_eq!(app.auth.mode, AuthMode::Forgot);
        // Social prompt is a login-mode feature
        assert!(!app.handle_key(ctrl('g')));
        app.handle_key(ctrl('l'));
        assert!(app.handle_key(ctrl('g')));
        assert!(app.auth.social_input.is_some());
        app.handle_key(key(KeyCode::Esc));
        assert!(app.auth.social_input.is_none());
        assert!(app.running);
    }

    #[test]
    fn test_empty_login_reports_missing_field() {
        let mut app = offline_app(false);
        app.start();
        app.apply(AppEvent::Auth {
            outcome: Err("Username is required".into()),
        });
        assert_eq!(app.auth.error.as_deref(), Some("Username is required"));
        assert_eq!(app.route(), Route::Landing);
    }

    #[test]
    fn test_profile_label_fallbacks() {
        let app = offline_app(false);
        let (_, name, email) = app.profile_label();
        assert_eq!(name, "User");
        assert_eq!(email, "user@example.com");

        let app = offline_app(true);
        assert_eq!(
            app.profile_label(),
            ("A".to_string(), "alice".to_string(), "alice@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_start_with_session_opens_home_and_loads() {
        let mut app = offline_app(true);
        app.start();
        assert_eq!(app.route(), Route::Home);
        assert!(app.browse.started);
    }

    #[tokio::test]
    async fn test_stale_row_events_dropped_after_logout() {
        let mut app = offline_app(true);
        app.start();
        let old_epoch = app.epoch;

        app.logout();
        assert_eq!(app.route(), Route::Landing);
        assert!(!app.session().has_credential());

        app.apply(AppEvent::Rows {
            epoch: old_epoch,
            event: RowEvent::Single(RowResult {
                key: RowKey::Action,
                titles: vec![summary(1)],
            }),
        });
        assert!(!app.browse.rows.is_loaded(RowKey::Action));
    }

    #[tokio::test]
    async fn test_tab_keys_switch_tabs() {
        let mut app = offline_app(true);
        app.start();
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.browse.tab, Tab::NewAndPopular);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.browse.tab, Tab::Home);
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.browse.tab, Tab::TvShows);
    }

    #[tokio::test]
    async fn test_search_typing_and_escape() {
        let mut app = offline_app(true);
        app.start();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "dune".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.browse.search.query, "dune");

        app.apply(AppEvent::Search {
            query: "dune".into(),
            result: Ok(vec![summary(438631)]),
        });
        assert_eq!(app.browse.search.results.len(), 1);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.browse.search.query.is_empty());
        assert!(app.browse.search.results.is_empty());
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_escape_returns() {
        let mut app = offline_app(true);
        app.start();
        app.apply(AppEvent::Rows {
            epoch: 0,
            event: RowEvent::Single(RowResult {
                key: RowKey::Trending,
                titles: vec![summary(5), summary(6)],
            }),
        });
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.route(), Route::Movie(6));
        assert_eq!(app.detail.id, Some(6));

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.route(), Route::Home);
    }

    #[tokio::test]
    async fn test_hero_more_info() {
        let mut app = offline_app(true);
        app.start();
        app.browse.hero = Some(summary(99));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.route(), Route::Movie(99));
    }
}
