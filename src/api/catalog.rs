//! Catalog endpoints: rows, search, title detail, health

use serde::Deserialize;

use super::client::{ApiClient, ApiError};
use crate::models::{HealthStatus, RowKey, TitleDetail, TitleSummary};

/// `{results: [...]}` list envelope
#[derive(Debug, Deserialize)]
struct ResultsPage {
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    results: Vec<TitleSummary>,
}

impl ApiClient {
    /// Trending movies this week
    pub async fn trending(&self) -> Result<Vec<TitleSummary>, ApiError> {
        self.list("/trending").await
    }

    pub async fn popular(&self) -> Result<Vec<TitleSummary>, ApiError> {
        self.list("/popular").await
    }

    pub async fn tv_shows(&self) -> Result<Vec<TitleSummary>, ApiError> {
        self.list("/tv-shows").await
    }

    /// Top rated movies
    pub async fn movies(&self) -> Result<Vec<TitleSummary>, ApiError> {
        self.list("/movies").await
    }

    pub async fn movies_by_genre(&self, genre_id: u32) -> Result<Vec<TitleSummary>, ApiError> {
        self.list(&format!("/movies/genre/{}", genre_id)).await
    }

    /// Search titles; the query reaches the server verbatim
    pub async fn search(&self, query: &str) -> Result<Vec<TitleSummary>, ApiError> {
        self.list(&format!("/search?q={}", urlencoding::encode(query)))
            .await
    }

    /// Fetch one title; `None` when the server has nothing for this id
    pub async fn movie_detail(&self, id: u64) -> Result<Option<TitleDetail>, ApiError> {
        self.get_optional(&format!("/movie/{}", id)).await
    }

    /// Fetch whichever endpoint backs a browse row
    pub async fn fetch_row(&self, key: RowKey) -> Result<Vec<TitleSummary>, ApiError> {
        match key {
            RowKey::Trending => self.trending().await,
            RowKey::Popular => self.popular().await,
            RowKey::TvShows => self.tv_shows().await,
            RowKey::Movies => self.movies().await,
            genre => match genre.genre_id() {
                Some(id) => self.movies_by_genre(id).await,
                None => Err(ApiError::InvalidResponse(format!(
                    "row {} has no endpoint",
                    genre
                ))),
            },
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health").await
    }

    async fn list(&self, path: &str) -> Result<Vec<TitleSummary>, ApiError> {
        let page: ResultsPage = self.get_json(path).await?;
        Ok(page.results)
    }
}
