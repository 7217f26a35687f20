//! Data structures shared across Movieflix
//!
//! Organized by domain:
//! - **Catalog**: title summaries, title details, genres, row keys
//! - **Auth**: user profile, session, request/response bodies

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Missing and `null` both decode to the default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Catalog Models
// =============================================================================

/// One entry in a catalog row or search result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    pub id: u64,
    // Movies use "title", TV uses "name"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
}

impl TitleSummary {
    /// Display title: `title` for movies, `name` for TV
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Whether this entry has artwork and should be shown in a row
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(extract_year)
    }
}

impl fmt::Display for TitleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} ★ {:.1}", self.display_title(), year_str, self.vote_average)
    }
}

/// Genre tag attached to a title detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full metadata for a single title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleDetail {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f32,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adult: bool,
}

impl TitleDetail {
    /// Release year, the part of `release_date` before the first `-`
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Audience rating badge
    pub fn audience_badge(&self) -> &'static str {
        if self.adult {
            "18+"
        } else {
            "13+"
        }
    }

    pub fn genres_str(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TitleDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(year) = self.release_year() {
            write!(f, " ({})", year)?;
        }
        if let Some(runtime) = self.runtime {
            write!(f, " - {} min", runtime)?;
        }
        write!(f, " - ★ {:.1} - {}", self.vote_average, self.audience_badge())
    }
}

fn extract_year(date: &str) -> Option<&str> {
    date.split('-').next().filter(|y| !y.is_empty())
}

/// Named catalog row on the browsing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKey {
    Trending,
    Popular,
    TvShows,
    Movies,
    Action,
    Comedy,
    Horror,
    Romance,
    Documentaries,
}

impl RowKey {
    pub const ALL: [RowKey; 9] = [
        RowKey::Trending,
        RowKey::Popular,
        RowKey::TvShows,
        RowKey::Movies,
        RowKey::Action,
        RowKey::Comedy,
        RowKey::Horror,
        RowKey::Romance,
        RowKey::Documentaries,
    ];

    /// Genre rows in fetch order
    pub const GENRES: [RowKey; 5] = [
        RowKey::Action,
        RowKey::Comedy,
        RowKey::Horror,
        RowKey::Romance,
        RowKey::Documentaries,
    ];

    /// Row name as used in the row set
    pub fn name(&self) -> &'static str {
        match self {
            RowKey::Trending => "trending",
            RowKey::Popular => "popular",
            RowKey::TvShows => "tvShows",
            RowKey::Movies => "movies",
            RowKey::Action => "action",
            RowKey::Comedy => "comedy",
            RowKey::Horror => "horror",
            RowKey::Romance => "romance",
            RowKey::Documentaries => "documentaries",
        }
    }

    /// Shelf heading shown above the row
    pub fn heading(&self) -> &'static str {
        match self {
            RowKey::Trending => "Trending Now",
            RowKey::Popular => "Popular on Movieflix",
            RowKey::TvShows => "TV Shows",
            RowKey::Movies => "Top Rated Movies",
            RowKey::Action => "Action Movies",
            RowKey::Comedy => "Comedy Hits",
            RowKey::Horror => "Scary Movies",
            RowKey::Romance => "Romance",
            RowKey::Documentaries => "Documentaries",
        }
    }

    /// Catalog genre id for genre rows
    pub fn genre_id(&self) -> Option<u32> {
        match self {
            RowKey::Action => Some(28),
            RowKey::Comedy => Some(35),
            RowKey::Horror => Some(27),
            RowKey::Romance => Some(10749),
            RowKey::Documentaries => Some(99),
            _ => None,
        }
    }

    /// Look up a row by name or genre id ("horror", "27")
    pub fn from_name(s: &str) -> Option<RowKey> {
        let s = s.trim();
        RowKey::ALL.into_iter().find(|k| {
            k.name().eq_ignore_ascii_case(s)
                || k.genre_id().is_some_and(|id| id.to_string() == s)
        })
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Profile returned alongside a session credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Authenticated session: opaque bearer credential plus profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: String,
    pub profile: UserProfile,
}

/// Body for POST /login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body for POST /signup
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Body for POST /reset-password
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Response from /login and /google-login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserProfile,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            credential: resp.access_token,
            profile: resp.user,
        }
    }
}

/// Generic `{message}` response (signup, reset-password)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Response from /forgot-password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgotPasswordResponse {
    #[serde(default)]
    pub message: String,
    /// Reset token echoed back by non-production deployments. Logged, never printed.
    #[serde(default, skip_serializing)]
    pub debug_token: Option<String>,
}

/// Response from /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub tmdb_api: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}
