//! Browse screen state: catalog rows, hero banner, tabs, search

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::fetch::{RowEvent, RowResult};
use crate::models::{RowKey, TitleSummary};

// =============================================================================
// Tabs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    TvShows,
    Movies,
    NewAndPopular,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::TvShows, Tab::Movies, Tab::NewAndPopular];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::TvShows => "TV Shows",
            Tab::Movies => "Movies",
            Tab::NewAndPopular => "New & Popular",
        }
    }

    /// Rows shown under this tab, in display order
    pub fn rows(&self) -> &'static [RowKey] {
        match self {
            Tab::Home => &RowKey::ALL,
            Tab::TvShows => &[RowKey::TvShows],
            Tab::Movies => &[
                RowKey::Movies,
                RowKey::Action,
                RowKey::Comedy,
                RowKey::Horror,
                RowKey::Romance,
                RowKey::Documentaries,
            ],
            Tab::NewAndPopular => &[RowKey::Trending, RowKey::Popular],
        }
    }

    pub fn next(&self) -> Tab {
        let idx = Tab::ALL.iter().position(|t| t == self).unwrap_or(0);
        Tab::ALL[(idx + 1) % Tab::ALL.len()]
    }
}

// =============================================================================
// Row set
// =============================================================================

/// Row name to titles, filled in as fetches settle
#[derive(Debug, Clone, Default)]
pub struct CatalogRowSet {
    rows: HashMap<RowKey, Vec<TitleSummary>>,
    loaded: HashSet<RowKey>,
}

impl CatalogRowSet {
    pub fn get(&self, key: RowKey) -> &[TitleSummary] {
        self.rows.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loaded(&self, key: RowKey) -> bool {
        self.loaded.contains(&key)
    }

    pub fn set(&mut self, key: RowKey, titles: Vec<TitleSummary>) {
        self.rows.insert(key, titles);
        self.loaded.insert(key);
    }

    pub fn all_loaded(&self) -> bool {
        RowKey::ALL.iter().all(|k| self.loaded.contains(k))
    }
}

// =============================================================================
// Search
// =============================================================================

/// Minimum query length (in characters) that triggers a search, exclusive
pub const SEARCH_MIN_CHARS: usize = 2;

/// What the caller should do after the query changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Fetch(String),
    Clear,
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<TitleSummary>,
}

impl SearchState {
    pub fn push(&mut self, c: char) -> SearchAction {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.on_input(query)
    }

    pub fn pop(&mut self) -> SearchAction {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.on_input(query)
    }

    /// Record the new query; short queries clear results without a request
    pub fn on_input(&mut self, query: String) -> SearchAction {
        self.query = query;
        if self.is_active() {
            SearchAction::Fetch(self.query.clone())
        } else {
            self.results.clear();
            SearchAction::Clear
        }
    }

    pub fn is_active(&self) -> bool {
        self.query.chars().count() > SEARCH_MIN_CHARS
    }

    /// Apply results for `query`; stale results are dropped
    pub fn apply_results(&mut self, query: &str, results: Vec<TitleSummary>) -> bool {
        if !self.is_active() || self.query != query {
            debug!(query, current = %self.query, "dropping stale search results");
            return false;
        }
        self.results = results;
        true
    }

    pub fn heading(&self) -> String {
        format!("Search Results for \"{}\"", self.query)
    }
}

// =============================================================================
// Browse state
// =============================================================================

/// One row as displayed: heading plus titles that have artwork
#[derive(Debug, Clone)]
pub struct RowView<'a> {
    pub heading: String,
    pub titles: Vec<&'a TitleSummary>,
    pub loaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pub rows: CatalogRowSet,
    pub hero: Option<TitleSummary>,
    pub tab: Tab,
    pub search: SearchState,
    /// The initial load has been kicked off
    pub started: bool,
    pub row_cursor: usize,
    pub item_cursor: usize,
}

impl BrowseState {
    pub fn apply(&mut self, event: RowEvent) {
        self.apply_with_rng(event, &mut rand::thread_rng());
    }

    pub fn apply_with_rng<R: Rng + ?Sized>(&mut self, event: RowEvent, rng: &mut R) {
        match event {
            RowEvent::Batch(results) => self.apply_batch_with_rng(results, rng),
            RowEvent::Single(RowResult { key, titles }) => self.rows.set(key, titles),
        }
        self.clamp_cursor();
    }

    /// Commit a settled group and pick the hero from trending ++ popular
    pub fn apply_batch_with_rng<R: Rng + ?Sized>(&mut self, results: Vec<RowResult>, rng: &mut R) {
        for RowResult { key, titles } in results {
            self.rows.set(key, titles);
        }

        if self.hero.is_none() {
            let pool: Vec<&TitleSummary> = self
                .rows
                .get(RowKey::Trending)
                .iter()
                .chain(self.rows.get(RowKey::Popular))
                .collect();
            self.hero = pool.choose(rng).map(|t| (*t).clone());
            debug!(hero = ?self.hero.as_ref().map(|h| h.id), pool = pool.len(), "hero picked");
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.row_cursor = 0;
        self.item_cursor = 0;
    }

    /// Rows for the current view: search results while searching, else the tab's rows
    pub fn visible_rows(&self) -> Vec<RowView<'_>> {
        if self.search.is_active() {
            return vec![RowView {
                heading: self.search.heading(),
                titles: self.search.results.iter().filter(|t| t.has_poster()).collect(),
                loaded: true,
            }];
        }

        self.tab
            .rows()
            .iter()
            .map(|key| RowView {
                heading: key.heading().to_string(),
                titles: self.rows.get(*key).iter().filter(|t| t.has_poster()).collect(),
                loaded: self.rows.is_loaded(*key),
            })
            .collect()
    }

    pub fn selected_title(&self) -> Option<&TitleSummary> {
        let rows = self.visible_rows();
        rows.get(self.row_cursor)
            .and_then(|row| row.titles.get(self.item_cursor).copied())
    }

    pub fn move_row(&mut self, delta: isize) {
        let count = self.visible_rows().len();
        if count == 0 {
            return;
        }
        self.row_cursor = step(self.row_cursor, delta, count);
        self.item_cursor = 0;
    }

    pub fn move_item(&mut self, delta: isize) {
        let len = self
            .visible_rows()
            .get(self.row_cursor)
            .map(|r| r.titles.len())
            .unwrap_or(0);
        if len == 0 {
            return;
        }
        self.item_cursor = step(self.item_cursor, delta, len);
    }

    pub fn clamp_cursor(&mut self) {
        let rows = self.visible_rows();
        let row_count = rows.len();
        let row_cursor = self.row_cursor.min(row_count.saturating_sub(1));
        let item_len = rows.get(row_cursor).map(|r| r.titles.len()).unwrap_or(0);
        let item_cursor = self.item_cursor.min(item_len.saturating_sub(1));
        self.row_cursor = row_cursor;
        self.item_cursor = item_cursor;
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}
