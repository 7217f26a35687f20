//! Detail screen state

use tracing::{debug, warn};

use crate::models::TitleDetail;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailStatus {
    #[default]
    Loading,
    /// Empty reply or failed fetch
    NotFound,
    Loaded(TitleDetail),
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub id: Option<u64>,
    pub status: DetailStatus,
    pub scroll: u16,
}

impl DetailState {
    /// Start showing `id`
    pub fn begin(&mut self, id: u64) {
        self.id = Some(id);
        self.status = DetailStatus::Loading;
        self.scroll = 0;
    }

    /// Apply a fetch result; results for another id are ignored
    pub fn apply(&mut self, id: u64, result: Result<Option<TitleDetail>, String>) -> bool {
        if self.id != Some(id) {
            debug!(id, current = ?self.id, "dropping stale detail result");
            return false;
        }

        self.status = match result {
            Ok(Some(detail)) => DetailStatus::Loaded(detail),
            Ok(None) => DetailStatus::NotFound,
            Err(e) => {
                warn!(id, error = %e, "detail fetch failed");
                DetailStatus::NotFound
            }
        };
        true
    }

    pub fn detail(&self) -> Option<&TitleDetail> {
        match &self.status {
            DetailStatus::Loaded(d) => Some(d),
            _ => None,
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}
