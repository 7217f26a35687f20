//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the same client, session store and
//! route guard the TUI uses. Each handler takes CLI args and Output, returns
//! ExitCode.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::app::browse::BrowseState;
use crate::app::{PROFILE_EMAIL_FALLBACK, PROFILE_NAME_FALLBACK};
use crate::cli::{
    BrowseCmd, Cli, Command, ExitCode, ForgotPasswordCmd, GenreCmd, GoogleLoginCmd, InfoCmd,
    ListCmd, LoginCmd, Output, ResetPasswordCmd, SearchCmd, SignupCmd, StatusMessage,
};
use crate::config::Config;
use crate::fetch::{self, FetchPlan};
use crate::models::{
    LoginRequest, MessageResponse, ResetPasswordRequest, RowKey, Session, SignupRequest,
    TitleSummary, UserProfile,
};
use crate::router::Route;
use crate::session::{Resolution, RouteGuard, SessionContext};

// =============================================================================
// Context
// =============================================================================

/// Client and guard shared by every handler
pub struct CommandContext {
    pub api: ApiClient,
    guard: RouteGuard,
}

impl CommandContext {
    pub fn new(api: ApiClient, guard: RouteGuard) -> Self {
        Self { api, guard }
    }

    /// Build from global flags: `--config`, `--api-url`, and the stored session
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load(),
        };

        let session = SessionContext::open_default().context("Could not read stored session")?;

        let api = config.client(Arc::new(session), cli.api_url.as_deref());
        debug!(base_url = %api.base_url(), "cli client ready");
        Ok(Self::new(api, config.guard()))
    }

    fn session(&self) -> &Arc<SessionContext> {
        self.api.session()
    }

    /// Same check the TUI runs before rendering `/home`
    fn require_session(&self, output: &Output) -> Result<(), ExitCode> {
        match self.guard.resolve(Route::Home, self.session()) {
            Resolution::Render(_) => Ok(()),
            Resolution::Redirect(_) => Err(output.error(
                "Not signed in. Run `movieflix login <username>` first.",
                ExitCode::Unauthorized,
            )),
        }
    }

    fn store_session(&self, session: Session, output: &Output) -> ExitCode {
        let profile = session.profile.clone();
        if let Err(e) = self.session().begin(session) {
            return output.error(format!("Could not store session: {}", e), ExitCode::Error);
        }
        print_or_fail(output, &profile)
    }
}

/// Dispatch a parsed subcommand
pub async fn run(ctx: &CommandContext, command: Command, output: &Output) -> ExitCode {
    match command {
        Command::Login(cmd) => login_cmd(ctx, cmd, output).await,
        Command::Signup(cmd) => signup_cmd(ctx, cmd, output).await,
        Command::ForgotPassword(cmd) => forgot_password_cmd(ctx, cmd, output).await,
        Command::ResetPassword(cmd) => reset_password_cmd(ctx, cmd, output).await,
        Command::GoogleLogin(cmd) => google_login_cmd(ctx, cmd, output).await,
        Command::Logout => logout_cmd(ctx, output),
        Command::Whoami => whoami_cmd(ctx, output),
        Command::Trending(cmd) => row_cmd(ctx, RowKey::Trending, &cmd, output).await,
        Command::Popular(cmd) => row_cmd(ctx, RowKey::Popular, &cmd, output).await,
        Command::TvShows(cmd) => row_cmd(ctx, RowKey::TvShows, &cmd, output).await,
        Command::Movies(cmd) => row_cmd(ctx, RowKey::Movies, &cmd, output).await,
        Command::Genre(cmd) => genre_cmd(ctx, cmd, output).await,
        Command::Search(cmd) => search_cmd(ctx, cmd, output).await,
        Command::Info(cmd) => info_cmd(ctx, cmd, output).await,
        Command::Browse(cmd) => browse_cmd(ctx, cmd, output).await,
        Command::Health => health_cmd(ctx, output).await,
    }
}

fn print_or_fail<T: Serialize>(output: &Output, data: T) -> ExitCode {
    if let Err(e) = output.print(data) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Auth Commands
// =============================================================================

pub async fn login_cmd(ctx: &CommandContext, cmd: LoginCmd, output: &Output) -> ExitCode {
    output.info(format!("Signing in as {}...", cmd.username));

    let req = LoginRequest {
        username: cmd.username,
        password: cmd.password,
    };
    match ctx.api.login(&req).await {
        Ok(session) => ctx.store_session(session, output),
        Err(e) => output.api_error("Login failed", &e),
    }
}

pub async fn google_login_cmd(
    ctx: &CommandContext,
    cmd: GoogleLoginCmd,
    output: &Output,
) -> ExitCode {
    if cmd.credential.trim().is_empty() {
        return output.error("Credential must not be empty", ExitCode::InvalidArgs);
    }

    match ctx.api.google_login(cmd.credential.trim()).await {
        Ok(session) => ctx.store_session(session, output),
        Err(e) => output.api_error("Google Login failed", &e),
    }
}

pub async fn signup_cmd(ctx: &CommandContext, cmd: SignupCmd, output: &Output) -> ExitCode {
    for (label, value) in [
        ("Username", &cmd.username),
        ("Email", &cmd.email),
        ("Password", &cmd.password),
    ] {
        if value.trim().is_empty() {
            return output.error(format!("{} is required", label), ExitCode::InvalidArgs);
        }
    }

    let req = SignupRequest {
        username: cmd.username,
        email: cmd.email,
        mobile: cmd.mobile,
        password: cmd.password,
    };
    match ctx.api.signup(&req).await {
        Ok(resp) => print_or_fail(output, resp),
        Err(e) => output.api_error("Signup failed", &e),
    }
}

pub async fn forgot_password_cmd(
    ctx: &CommandContext,
    cmd: ForgotPasswordCmd,
    output: &Output,
) -> ExitCode {
    match ctx.api.forgot_password(&cmd.email).await {
        Ok(resp) => {
            if let Some(token) = &resp.debug_token {
                info!(reset_token = %token, "password reset token issued");
            }
            print_or_fail(output, MessageResponse { message: resp.message })
        }
        Err(e) => output.api_error("Password reset failed", &e),
    }
}

pub async fn reset_password_cmd(
    ctx: &CommandContext,
    cmd: ResetPasswordCmd,
    output: &Output,
) -> ExitCode {
    let req = ResetPasswordRequest {
        token: cmd.token,
        new_password: cmd.new_password,
    };
    match ctx.api.reset_password(&req).await {
        Ok(resp) => print_or_fail(output, resp),
        Err(e) => output.api_error("Password reset failed", &e),
    }
}

pub fn logout_cmd(ctx: &CommandContext, output: &Output) -> ExitCode {
    match ctx.session().end() {
        Ok(()) => print_or_fail(output, StatusMessage::ok("Logged out")),
        Err(e) => output.error(format!("Could not clear session: {}", e), ExitCode::Error),
    }
}

pub fn whoami_cmd(ctx: &CommandContext, output: &Output) -> ExitCode {
    if let Err(code) = ctx.require_session(output) {
        return code;
    }

    let profile = ctx.session().profile();
    let username = profile
        .as_ref()
        .map(|p| p.username.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| PROFILE_NAME_FALLBACK.to_string());
    let email = profile
        .map(|p| p.email)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| PROFILE_EMAIL_FALLBACK.to_string());

    print_or_fail(output, UserProfile { username, email })
}

// =============================================================================
// Catalog Commands
// =============================================================================

async fn row_cmd(ctx: &CommandContext, key: RowKey, cmd: &ListCmd, output: &Output) -> ExitCode {
    if let Err(code) = ctx.require_session(output) {
        return code;
    }

    output.info(format!("Fetching {}...", key.heading()));
    match ctx.api.fetch_row(key).await {
        Ok(titles) => print_titles(output, cmd.shape(titles)),
        Err(e) => output.api_error(&format!("{} fetch failed", key.heading()), &e),
    }
}

pub async fn genre_cmd(ctx: &CommandContext, cmd: GenreCmd, output: &Output) -> ExitCode {
    match RowKey::from_name(&cmd.genre) {
        Some(key) if key.genre_id().is_some() => row_cmd(ctx, key, &cmd.list, output).await,
        _ => output.error(
            format!(
                "Unknown genre '{}'. Use action, comedy, horror, romance, documentaries or their ids.",
                cmd.genre
            ),
            ExitCode::InvalidArgs,
        ),
    }
}

pub async fn search_cmd(ctx: &CommandContext, cmd: SearchCmd, output: &Output) -> ExitCode {
    if cmd.query.chars().count() <= crate::app::browse::SEARCH_MIN_CHARS {
        return output.error(
            "Search query must be longer than 2 characters",
            ExitCode::InvalidArgs,
        );
    }
    if let Err(code) = ctx.require_session(output) {
        return code;
    }

    output.info(format!("Searching for: {}", cmd.query));
    match ctx.api.search(&cmd.query).await {
        Ok(titles) => print_titles(output, cmd.list.shape(titles)),
        Err(e) => output.api_error("Search failed", &e),
    }
}

pub async fn info_cmd(ctx: &CommandContext, cmd: InfoCmd, output: &Output) -> ExitCode {
    if let Err(code) = ctx.require_session(output) {
        return code;
    }

    output.info(format!("Getting info for: {}", cmd.id));
    match ctx.api.movie_detail(cmd.id).await {
        Ok(Some(detail)) => {
            if output.json {
                return print_or_fail(output, &detail);
            }
            println!("{}", detail);
            if !detail.genres.is_empty() {
                println!("{}", detail.genres_str());
            }
            if !detail.overview.is_empty() {
                println!();
                println!("{}", detail.overview);
            }
            ExitCode::Success
        }
        Ok(None) => output.error("Movie not found", ExitCode::NotFound),
        Err(e) => output.api_error("Movie info failed", &e),
    }
}

/// Rows in browse order plus the featured title
#[derive(Debug, Serialize)]
struct BrowseReport {
    hero: Option<TitleSummary>,
    rows: Vec<BrowseRow>,
}

#[derive(Debug, Serialize)]
struct BrowseRow {
    key: RowKey,
    heading: &'static str,
    titles: Vec<TitleSummary>,
}

pub async fn browse_cmd(ctx: &CommandContext, cmd: BrowseCmd, output: &Output) -> ExitCode {
    if let Err(code) = ctx.require_session(output) {
        return code;
    }

    output.info("Loading browse rows...");
    let mut state = BrowseState::default();
    fetch::execute(&ctx.api, &FetchPlan::browse(), |event| state.apply(event)).await;

    let shape = ListCmd {
        limit: cmd.limit,
        all: false,
    };
    let rows: Vec<BrowseRow> = RowKey::ALL
        .into_iter()
        .map(|key| BrowseRow {
            key,
            heading: key.heading(),
            titles: shape.shape(state.rows.get(key).to_vec()),
        })
        .collect();

    if output.json {
        return print_or_fail(
            output,
            BrowseReport {
                hero: state.hero,
                rows,
            },
        );
    }

    if let Some(hero) = &state.hero {
        println!("Featured: {}", hero);
        println!();
    }
    for row in rows {
        println!("{}", row.heading);
        if row.titles.is_empty() {
            println!("  (empty)");
        }
        for title in &row.titles {
            println!("{:>8}  {}", title.id, title);
        }
        println!();
    }
    ExitCode::Success
}

pub async fn health_cmd(ctx: &CommandContext, output: &Output) -> ExitCode {
    match ctx.api.health().await {
        Ok(status) => print_or_fail(output, status),
        Err(e) => output.api_error("Health check failed", &e),
    }
}

fn print_titles(output: &Output, titles: Vec<TitleSummary>) -> ExitCode {
    if let Err(e) = output.print_titles(&titles) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
