//! Browse-screen fetch orchestration
//!
//! A [`FetchPlan`] is an ordered list of groups. A parallel group runs all of
//! its rows at once and reports them together after every row settles. A
//! sequential group runs one row at a time and reports each as it lands.
//! A failing row never affects its siblings: it is logged and reported as an
//! empty list.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::models::{RowKey, TitleSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Parallel,
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchGroup {
    pub mode: GroupMode,
    pub rows: Vec<RowKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub groups: Vec<FetchGroup>,
}

impl FetchPlan {
    /// Core rows together, then the genre rows one by one
    pub fn browse() -> Self {
        Self {
            groups: vec![
                FetchGroup {
                    mode: GroupMode::Parallel,
                    rows: vec![
                        RowKey::Trending,
                        RowKey::Popular,
                        RowKey::TvShows,
                        RowKey::Movies,
                    ],
                },
                FetchGroup {
                    mode: GroupMode::Sequential,
                    rows: RowKey::GENRES.to_vec(),
                },
            ],
        }
    }
}

/// One settled row
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult {
    pub key: RowKey,
    pub titles: Vec<TitleSummary>,
}

/// What the plan reports back as it progresses
#[derive(Debug, Clone, PartialEq)]
pub enum RowEvent {
    /// Every row of a parallel group
    Batch(Vec<RowResult>),
    /// One row of a sequential group
    Single(RowResult),
}

/// Fetch one row, degrading any failure to an empty list
pub async fn fetch_isolated(api: &ApiClient, key: RowKey) -> RowResult {
    let titles = match api.fetch_row(key).await {
        Ok(titles) => titles,
        Err(e) => {
            warn!(row = %key, error = %e, "row fetch failed");
            Vec::new()
        }
    };
    RowResult { key, titles }
}

/// Run the plan, handing each batch or row to `sink` as it settles
pub async fn execute<F>(api: &ApiClient, plan: &FetchPlan, mut sink: F)
where
    F: FnMut(RowEvent),
{
    for group in &plan.groups {
        match group.mode {
            GroupMode::Parallel => {
                let results =
                    join_all(group.rows.iter().map(|key| fetch_isolated(api, *key))).await;
                debug!(rows = results.len(), "parallel group settled");
                sink(RowEvent::Batch(results));
            }
            GroupMode::Sequential => {
                for key in &group.rows {
                    let result = fetch_isolated(api, *key).await;
                    debug!(row = %key, count = result.titles.len(), "row settled");
                    sink(RowEvent::Single(result));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_plan_shape() {
        let plan = FetchPlan::browse();
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.groups[0].mode, GroupMode::Parallel);
        assert_eq!(plan.groups[0].rows.len(), 4);
        assert_eq!(plan.groups[1].mode, GroupMode::Sequential);
        assert_eq!(
            plan.groups[1].rows,
            vec![
                RowKey::Action,
                RowKey::Comedy,
                RowKey::Horror,
                RowKey::Romance,
                RowKey::Documentaries
            ]
        );
    }

    #[test]
    fn test_plan_covers_every_row_once() {
        let plan = FetchPlan::browse();
        let mut rows: Vec<RowKey> = plan.groups.iter().flat_map(|g| g.rows.clone()).collect();
        rows.sort();
        assert_eq!(rows, RowKey::ALL.to_vec());
    }
}
