//! CLI - Command Line Interface for Movieflix
//!
//! Every endpoint the TUI uses is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Sign in (stores the session like the TUI does)
//! movieflix login alice --password hunter2
//!
//! # Browse
//! movieflix trending --limit 5
//! movieflix genre horror --json
//! movieflix search "blade runner"
//! movieflix info 78
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::ApiError;
use crate::models::TitleSummary;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit status for subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// No session, or the server refused the credential
    Unauthorized = 4,
    /// Nothing found for the given id or email
    NotFound = 5,
}

impl ExitCode {
    /// Map an API failure to its exit code
    pub fn from_api_error(err: &ApiError) -> Self {
        match err {
            ApiError::Transport(_) => ExitCode::NetworkError,
            e if e.is_unauthorized() => ExitCode::Unauthorized,
            e if e.is_not_found() => ExitCode::NotFound,
            _ => ExitCode::Error,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Movieflix - browse the Movieflix catalog from a terminal
///
/// With no subcommand the interactive TUI starts.
#[derive(Parser, Debug)]
#[command(
    name = "movieflix",
    version,
    about = "Terminal client for the Movieflix catalog",
    long_about = "Sign in, browse catalog rows, search titles and read details.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  movieflix                          Launch interactive TUI\n\
                  movieflix login alice -p secret    Sign in\n\
                  movieflix search \"blade runner\"    Search titles\n\
                  movieflix info 78 --json           Title details as JSON"
)]
pub struct Cli {
    /// Print JSON (implied when stdout is not a terminal)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Only print results and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// API gateway base URL
    #[arg(long, global = true, env = "MOVIEFLIX_API_URL")]
    pub api_url: Option<String>,

    /// Omit to start the TUI
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// A subcommand was given
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with username and password
    Login(LoginCmd),

    /// Create an account
    Signup(SignupCmd),

    /// Start a password reset
    ForgotPassword(ForgotPasswordCmd),

    /// Finish a password reset with the emailed token
    ResetPassword(ResetPasswordCmd),

    /// Sign in with a Google ID token
    GoogleLogin(GoogleLoginCmd),

    /// Clear the stored session
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Trending movies this week
    #[command(visible_alias = "tr")]
    Trending(ListCmd),

    /// Popular movies
    Popular(ListCmd),

    /// Popular TV shows
    TvShows(ListCmd),

    /// Top rated movies
    Movies(ListCmd),

    /// Movies in a genre (action, comedy, horror, romance, documentaries, or a genre id)
    Genre(GenreCmd),

    /// Search titles
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Details for one title
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Load every browse row the way the home screen does
    Browse(BrowseCmd),

    /// Check the API gateway
    Health,
}

// =============================================================================
// Auth Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct LoginCmd {
    pub username: String,

    #[arg(long, short = 'p', env = "MOVIEFLIX_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SignupCmd {
    #[arg(long, short = 'u')]
    pub username: String,

    #[arg(long, short = 'e')]
    pub email: String,

    /// Optional
    #[arg(long, short = 'm', default_value = "")]
    pub mobile: String,

    #[arg(long, short = 'p', env = "MOVIEFLIX_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct ForgotPasswordCmd {
    pub email: String,
}

#[derive(Args, Debug)]
pub struct ResetPasswordCmd {
    /// Token from the reset email
    pub token: String,

    #[arg(long, short = 'p', env = "MOVIEFLIX_NEW_PASSWORD", hide_env_values = true)]
    pub new_password: String,
}

#[derive(Args, Debug)]
pub struct GoogleLoginCmd {
    /// ID token issued by Google Sign-In
    pub credential: String,
}

// =============================================================================
// Catalog Commands
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ListCmd {
    /// At most this many titles
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Include titles without a poster
    #[arg(long, short = 'a')]
    pub all: bool,
}

impl Default for ListCmd {
    fn default() -> Self {
        Self {
            limit: 20,
            all: false,
        }
    }
}

impl ListCmd {
    /// Apply the poster filter and limit
    pub fn shape(&self, mut titles: Vec<TitleSummary>) -> Vec<TitleSummary> {
        if !self.all {
            titles.retain(|t| t.has_poster());
        }
        titles.truncate(self.limit);
        titles
    }
}

#[derive(Args, Debug)]
pub struct GenreCmd {
    /// Row name or genre id
    pub genre: String,

    #[command(flatten)]
    pub list: ListCmd,
}

#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query; must be longer than 2 characters
    #[arg(required = true)]
    pub query: String,

    #[command(flatten)]
    pub list: ListCmd,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Catalog id of the title
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct BrowseCmd {
    /// Titles per row
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: usize,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Envelope for `--json` output: `data` on success, `error` and `exit_code` on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Plain `{status, message}` reply for commands with nothing else to say
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Where results and errors go, per `--json` / `--quiet`
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print a result
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a title list: JSON, or one `id  title (year) ★ rating` line each
    pub fn print_titles(&self, titles: &[TitleSummary]) -> anyhow::Result<()> {
        if self.json {
            return self.print(titles);
        }
        for title in titles {
            println!("{:>8}  {}", title.id, title);
        }
        Ok(())
    }

    /// Report a failure on stderr and hand back its exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Report an API failure with the server's message when it sent one
    pub fn api_error(&self, context: &str, err: &ApiError) -> ExitCode {
        let detail = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        self.error(format!("{}: {}", context, detail), ExitCode::from_api_error(err))
    }

    /// Progress note on stderr, text mode only
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["movieflix"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::Unauthorized), 4);
        assert_eq!(i32::from(ExitCode::NotFound), 5);
    }

    #[test]
    fn test_exit_code_from_status() {
        let unauthorized = ApiError::Status {
            status: 401,
            message: None,
        };
        assert_eq!(ExitCode::from_api_error(&unauthorized), ExitCode::Unauthorized);

        let missing = ApiError::Status {
            status: 404,
            message: Some("User with this email not found".into()),
        };
        assert_eq!(ExitCode::from_api_error(&missing), ExitCode::NotFound);

        let server = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(ExitCode::from_api_error(&server), ExitCode::Error);
    }

    #[test]
    fn test_list_shape_filters_and_limits() {
        let titles: Vec<TitleSummary> = (1..=5)
            .map(|id| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "title": format!("T{}", id),
                    "poster_path": if id % 2 == 0 { serde_json::Value::Null } else { format!("/{}.jpg", id).into() }
                }))
                .unwrap()
            })
            .collect();

        let cmd = ListCmd { limit: 2, all: false };
        let ids: Vec<u64> = cmd.shape(titles.clone()).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let cmd = ListCmd { limit: 10, all: true };
        assert_eq!(cmd.shape(titles).len(), 5);
    }
}
