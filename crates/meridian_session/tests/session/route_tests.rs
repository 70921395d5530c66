use std::time::Duration;

use meridian_catalog::location_suggestion::LocationSuggestion;
use meridian_routing::coordinate::Coordinate;
use meridian_session::{
    session::RouteSession,
    session_params::SessionParams,
    session_state::{SessionError, SessionState},
};
use tokio::time::sleep;

use crate::test_utils::{self, CountingProvider, ScriptedSearch};

#[tokio::test(start_paused = true)]
async fn test_downtown_plaza_to_central_park() {
    let session = RouteSession::new(&SessionParams::default());

    session.select_start(test_utils::downtown_plaza());
    let state = session.state();
    assert_eq!(state.start_query, "Downtown Plaza");
    assert!(!state.is_loading);
    assert!(state.route.is_none());

    session.select_destination(test_utils::central_park());
    let state = session.state();
    assert_eq!(state.destination_query, "Central Park");
    assert!(state.is_loading);

    let state = session.wait_until(SessionState::is_route_ready).await.unwrap();
    let route = state.route.unwrap();

    assert!((route.distance_km() - 8.6).abs() < 0.1);
    assert_eq!(route.display_distance(), "8.51 km");
    assert_eq!(route.duration_minutes, 13);
    assert_eq!(route.path.len(), 51);
    assert_eq!(route.path[0], Coordinate::new(40.7128, -74.0060));
    assert_eq!(route.path[50], Coordinate::new(40.7829, -73.9654));
    assert_eq!(state.marker_position, Some(route.start));
    assert!(!state.is_animating);
}

#[tokio::test(start_paused = true)]
async fn test_route_computed_once_per_pair() {
    let provider = CountingProvider::default();
    let session = test_utils::create_session(
        ScriptedSearch::new(Duration::from_millis(300)),
        provider.clone(),
    );

    session.select_start(test_utils::downtown_plaza());
    session.select_destination(test_utils::central_park());
    session.wait_until(SessionState::is_route_ready).await.unwrap();

    session.select_destination(test_utils::central_park());
    session.select_start(test_utils::downtown_plaza());
    sleep(Duration::from_secs(2)).await;

    assert_eq!(provider.calls(), 1);
    assert!(!session.state().is_loading);

    session.select_destination(test_utils::times_square());
    let destination = test_utils::times_square().coordinate;
    let state = session
        .wait_until(|s| s.is_route_ready() && s.route.as_ref().is_some_and(|r| r.end == destination))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(state.marker_position, Some(test_utils::downtown_plaza().coordinate));
}

#[tokio::test(start_paused = true)]
async fn test_newer_selection_supersedes_pending_route() {
    let provider = CountingProvider::default();
    let session = test_utils::create_session(
        ScriptedSearch::new(Duration::from_millis(300)),
        provider.clone(),
    );

    session.select_start(test_utils::downtown_plaza());
    session.select_destination(test_utils::central_park());
    sleep(Duration::from_millis(100)).await;
    session.select_destination(test_utils::times_square());

    sleep(Duration::from_millis(450)).await;
    // The first computation finished but was superseded.
    let state = session.state();
    assert!(state.route.is_none());
    assert!(state.is_loading);

    let state = session.wait_until(SessionState::is_route_ready).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(
        state.route.unwrap().end,
        test_utils::times_square().coordinate
    );
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_pending_route() {
    let provider = CountingProvider::default();
    let session = test_utils::create_session(
        ScriptedSearch::new(Duration::from_millis(300)),
        provider.clone(),
    );

    session.update_destination_query("park");
    session.select_start(test_utils::downtown_plaza());
    session.select_destination(test_utils::central_park());
    session.clear_selections();

    assert_eq!(session.state(), SessionState::default());

    sleep(Duration::from_secs(2)).await;
    assert_eq!(provider.calls(), 1);
    assert_eq!(session.state(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn test_clear_resets_every_field() {
    let session = test_utils::create_routed_session().await;
    session.update_start_query("times");
    session.wait_until(|s| !s.start_suggestions.is_empty()).await.unwrap();

    session.clear_selections();

    let state = session.state();
    assert_eq!(state.start_query, "");
    assert_eq!(state.destination_query, "");
    assert!(state.start_suggestions.is_empty());
    assert!(state.selected_start.is_none());
    assert!(state.selected_destination.is_none());
    assert!(state.route.is_none());
    assert!(state.marker_position.is_none());
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_computation_failure_keeps_prior_route() {
    let provider = CountingProvider::default();
    let session = test_utils::create_session(
        ScriptedSearch::new(Duration::from_millis(300)),
        provider.clone(),
    );

    session.select_start(test_utils::downtown_plaza());
    session.select_destination(test_utils::central_park());
    let prior = session
        .wait_until(SessionState::is_route_ready)
        .await
        .unwrap()
        .route;

    provider.fail(true);
    session.select_destination(test_utils::times_square());
    let state = session.wait_until(|s| s.error.is_some()).await.unwrap();

    assert!(!state.is_loading);
    assert_eq!(state.route, prior);
    assert!(matches!(state.error, Some(SessionError::Computation(_))));
    assert_eq!(state.selected_destination, Some(test_utils::times_square()));

    // The failed pair is retried when selected again.
    provider.fail(false);
    session.select_destination(test_utils::times_square());
    assert!(session.state().is_loading);

    let state = session.wait_until(|s| !s.is_loading).await.unwrap();
    assert_eq!(provider.calls(), 3);
    assert!(state.error.is_none());
    assert_eq!(
        state.route.unwrap().end,
        test_utils::times_square().coordinate
    );
}

#[tokio::test(start_paused = true)]
async fn test_non_finite_coordinate_releases_loading() {
    let session = RouteSession::new(&SessionParams::default());
    let broken = LocationSuggestion::new("x", "Broken", "Nowhere", Coordinate::new(f64::NAN, 0.0));

    session.select_start(broken);
    session.select_destination(test_utils::central_park());
    assert!(session.state().is_loading);

    let state = session.wait_until(|s| !s.is_loading).await.unwrap();
    assert!(state.route.is_none());
    assert!(state.marker_position.is_none());

    // The pair is computed again when selected again.
    session.select_destination(test_utils::central_park());
    assert!(session.state().is_loading);

    let state = session.wait_until(|s| !s.is_loading).await.unwrap();
    assert!(state.route.is_none());
}
