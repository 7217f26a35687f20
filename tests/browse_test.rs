//! Browse flow tests
//!
//! Row fetch orchestration, failure isolation, hero selection and search,
//! driven through the fetch plan and the App against a mockito gateway.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};
use movieflix::api::ApiClient;
use movieflix::app::browse::BrowseState;
use movieflix::app::App;
use movieflix::fetch::{self, FetchPlan, RowEvent};
use movieflix::models::{RowKey, Session, UserProfile};
use movieflix::router::Route;
use movieflix::session::{RouteGuard, SessionContext};

fn signed_in() -> Arc<SessionContext> {
    let session = SessionContext::ephemeral();
    session
        .begin(Session {
            credential: "t1".into(),
            profile: UserProfile {
                username: "alice".into(),
                email: "alice@example.com".into(),
            },
        })
        .unwrap();
    Arc::new(session)
}

fn page(ids: &[u64]) -> String {
    let results: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Title {}", id),
                "poster_path": format!("/{}.jpg", id),
                "vote_average": 7.0
            })
        })
        .collect();
    serde_json::json!({ "results": results }).to_string()
}

/// Mock every row endpoint in `RowKey::ALL` order; the `failing` path answers 500
async fn mock_rows(server: &mut ServerGuard, failing: Option<&str>) -> Vec<Mock> {
    let rows: [(&str, &[u64]); 9] = [
        ("/api/trending", &[1, 2]),
        ("/api/popular", &[3, 4]),
        ("/api/tv-shows", &[5]),
        ("/api/movies", &[6]),
        ("/api/movies/genre/28", &[28]),
        ("/api/movies/genre/35", &[35]),
        ("/api/movies/genre/27", &[27]),
        ("/api/movies/genre/10749", &[10749]),
        ("/api/movies/genre/99", &[99]),
    ];
    let mut mocks = Vec::new();
    for (path, ids) in rows {
        let mock = server.mock("GET", path);
        let mock = if failing == Some(path) {
            mock.with_status(500).with_body(r#"{"error": "upstream timeout"}"#)
        } else {
            mock.with_status(200).with_body(page(ids))
        };
        mocks.push(mock.create_async().await);
    }
    mocks
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

async fn pump_until<F: Fn(&App) -> bool>(app: &mut App, done: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(app) {
            if !app.pump().await {
                break;
            }
        }
    })
    .await
    .expect("timed out waiting for app events");
}

// =============================================================================
// Fetch plan
// =============================================================================

#[tokio::test]
async fn test_failing_row_does_not_affect_siblings() {
    let mut server = Server::new_async().await;
    mock_rows(&mut server, Some("/api/movies/genre/27")).await;
    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());

    let mut events = Vec::new();
    fetch::execute(&api, &FetchPlan::browse(), |event| events.push(event)).await;

    // One batch for the core rows, then one event per genre row
    assert_eq!(events.len(), 6);
    match &events[0] {
        RowEvent::Batch(rows) => {
            let keys: Vec<RowKey> = rows.iter().map(|r| r.key).collect();
            assert_eq!(
                keys,
                vec![RowKey::Trending, RowKey::Popular, RowKey::TvShows, RowKey::Movies]
            );
        }
        other => panic!("expected batch, got {:?}", other),
    }

    let singles: Vec<(RowKey, usize)> = events[1..]
        .iter()
        .map(|e| match e {
            RowEvent::Single(r) => (r.key, r.titles.len()),
            other => panic!("expected single row, got {:?}", other),
        })
        .collect();
    assert_eq!(
        singles,
        vec![
            (RowKey::Action, 1),
            (RowKey::Comedy, 1),
            (RowKey::Horror, 0),
            (RowKey::Romance, 1),
            (RowKey::Documentaries, 1),
        ]
    );
}

#[tokio::test]
async fn test_failing_core_row_stays_in_batch() {
    let mut server = Server::new_async().await;
    mock_rows(&mut server, Some("/api/trending")).await;
    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());

    let mut events = Vec::new();
    fetch::execute(&api, &FetchPlan::browse(), |event| events.push(event)).await;

    let batch = match &events[0] {
        RowEvent::Batch(rows) => rows.clone(),
        other => panic!("expected batch, got {:?}", other),
    };
    let counts: Vec<(RowKey, usize)> = batch.iter().map(|r| (r.key, r.titles.len())).collect();
    assert_eq!(
        counts,
        vec![
            (RowKey::Trending, 0),
            (RowKey::Popular, 2),
            (RowKey::TvShows, 1),
            (RowKey::Movies, 1),
        ]
    );
    // Genre rows still follow
    assert_eq!(events.len(), 6);

    // The hero can only come from the surviving popular row
    let mut state = BrowseState::default();
    for event in events {
        state.apply(event);
    }
    let hero = state.hero.as_ref().map(|h| h.id);
    assert!(matches!(hero, Some(3 | 4)), "hero {:?} not from popular", hero);
    assert!(state.rows.is_loaded(RowKey::Trending));
    assert!(state.rows.get(RowKey::Trending).is_empty());
}

#[tokio::test]
async fn test_rows_requested_with_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/api/".into()))
        .match_header("authorization", "Bearer t1")
        .with_status(200)
        .with_body(page(&[1]))
        .expect(9)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());
    fetch::execute(&api, &FetchPlan::browse(), |_| {}).await;
    mock.assert_async().await;
}

// =============================================================================
// App
// =============================================================================

#[tokio::test]
async fn test_home_loads_rows_and_picks_hero() {
    let mut server = Server::new_async().await;
    mock_rows(&mut server, Some("/api/movies/genre/27")).await;
    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());
    let mut app = App::new(api, RouteGuard::default());

    app.start();
    assert_eq!(app.route(), Route::Home);

    pump_until(&mut app, |app| app.browse.rows.all_loaded()).await;

    let hero = app.browse.hero.as_ref().map(|h| h.id);
    assert!(matches!(hero, Some(1..=4)), "hero {:?} not from trending/popular", hero);

    assert_eq!(app.browse.rows.get(RowKey::Action).len(), 1);
    assert!(app.browse.rows.is_loaded(RowKey::Horror));
    assert!(app.browse.rows.get(RowKey::Horror).is_empty());
    assert_eq!(app.route(), Route::Home);
}

#[tokio::test]
async fn test_short_query_makes_no_request() {
    let mut server = Server::new_async().await;
    mock_rows(&mut server, None).await;
    let search = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());
    let mut app = App::new(api, RouteGuard::default());
    app.start();
    pump_until(&mut app, |app| app.browse.rows.all_loaded()).await;

    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(key(KeyCode::Char('d')));
    app.handle_key(key(KeyCode::Char('u')));
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.drain();

    search.assert_async().await;
    assert!(app.browse.search.results.is_empty());
    // Still the tab's rows
    assert_eq!(app.browse.visible_rows().len(), RowKey::ALL.len());
}

#[tokio::test]
async fn test_third_character_triggers_search() {
    let mut server = Server::new_async().await;
    mock_rows(&mut server, None).await;
    let search = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("q".into(), "dun".into()))
        .with_status(200)
        .with_body(page(&[438631]))
        .expect(1)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());
    let mut app = App::new(api, RouteGuard::default());
    app.start();

    app.handle_key(key(KeyCode::Char('/')));
    for c in "dun".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    pump_until(&mut app, |app| !app.browse.search.results.is_empty()).await;

    search.assert_async().await;
    let rows = app.browse.visible_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].heading, "Search Results for \"dun\"");
    assert_eq!(rows[0].titles[0].id, 438631);
}

#[tokio::test]
async fn test_back_from_detail_keeps_loaded_rows() {
    let mut server = Server::new_async().await;
    let rows = mock_rows(&mut server, None).await;
    server
        .mock("GET", "/api/movie/1")
        .with_status(200)
        .with_body(r#"{"id": 1, "title": "Title 1"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(format!("{}/api", server.url()), signed_in());
    let mut app = App::new(api, RouteGuard::default());
    app.start();
    pump_until(&mut app, |app| app.browse.rows.all_loaded()).await;

    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.route(), Route::Movie(1));
    pump_until(&mut app, |app| app.detail.detail().is_some()).await;

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.route(), Route::Home);
    assert!(app.browse.rows.all_loaded());

    // Each row endpoint was hit exactly once
    tokio::time::sleep(Duration::from_millis(100)).await;
    for mock in &rows {
        mock.assert_async().await;
    }
}
