use std::time::Duration;

use meridian_session::{
    session::RouteSession, session_params::SessionParams, session_state::SessionState,
};
use tokio::time::{Instant, sleep};

use crate::test_utils;

#[tokio::test(start_paused = true)]
async fn test_start_without_route_is_ignored() {
    let session = RouteSession::new(&SessionParams::default());
    session.select_start(test_utils::downtown_plaza());

    session.start_animation();

    assert!(!session.state().is_animating);
}

#[tokio::test(start_paused = true)]
async fn test_animation_runs_to_the_end() {
    let session = test_utils::create_routed_session().await;
    let route = session.state().route.unwrap();
    let before = Instant::now();

    session.start_animation();
    assert!(session.state().is_animating);

    sleep(Duration::from_millis(2500)).await;
    let state = session.state();
    assert!(state.is_animating);
    let marker = state.marker_position.unwrap();
    assert_ne!(marker, route.start);
    assert_ne!(marker, route.end);
    assert!(route.path.contains(&marker));

    let state = session.wait_until(|s| !s.is_animating).await.unwrap();
    assert_eq!(state.marker_position, Some(route.end));
    assert!(before.elapsed() >= Duration::from_millis(4990));
    assert!(before.elapsed() < Duration::from_millis(5100));
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_ignored() {
    let session = test_utils::create_routed_session().await;
    let updates = test_utils::count_animation_updates(session.subscribe());

    session.start_animation();
    session.start_animation();
    sleep(Duration::from_millis(2500)).await;
    session.start_animation();

    let updates = updates.await.unwrap();
    // One flag change each way around 51 marker moves.
    assert!((51..=53).contains(&updates), "got {updates} updates");
    assert!(!session.state().is_animating);
}

#[tokio::test(start_paused = true)]
async fn test_reset_returns_marker_to_start() {
    let session = test_utils::create_routed_session().await;

    session.start_animation();
    sleep(Duration::from_secs(1)).await;
    assert_ne!(
        session.state().marker_position,
        Some(test_utils::downtown_plaza().coordinate)
    );

    session.reset_animation();

    let state = session.state();
    assert!(!state.is_animating);
    assert_eq!(
        state.marker_position,
        Some(test_utils::downtown_plaza().coordinate)
    );

    // No emission after the reset.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(session.state(), state);
}

#[tokio::test(start_paused = true)]
async fn test_reset_without_start_leaves_marker_absent() {
    let session = RouteSession::new(&SessionParams::default());

    session.reset_animation();

    let state = session.state();
    assert!(!state.is_animating);
    assert!(state.marker_position.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_clear_cancels_animation() {
    let session = test_utils::create_routed_session().await;

    session.start_animation();
    sleep(Duration::from_secs(1)).await;
    session.clear_selections();

    assert_eq!(session.state(), SessionState::default());

    sleep(Duration::from_secs(10)).await;
    assert_eq!(session.state(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn test_replay_after_completion() {
    let session = test_utils::create_routed_session().await;

    session.start_animation();
    session.wait_until(|s| !s.is_animating).await.unwrap();

    session.start_animation();
    assert!(session.state().is_animating);

    sleep(Duration::from_secs(1)).await;
    let route = session.state().route.unwrap();
    assert_ne!(session.state().marker_position, Some(route.end));
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_reset() {
    let session = test_utils::create_routed_session().await;

    session.start_animation();
    sleep(Duration::from_secs(1)).await;
    session.reset_animation();
    session.start_animation();

    let before = Instant::now();
    let state = session.wait_until(|s| !s.is_animating).await.unwrap();

    assert!(before.elapsed() >= Duration::from_millis(4990));
    assert_eq!(state.marker_position, Some(state.route.unwrap().end));
}

#[tokio::test(start_paused = true)]
async fn test_new_route_stops_running_animation() {
    let session = test_utils::create_routed_session().await;

    session.start_animation();
    sleep(Duration::from_secs(1)).await;
    session.select_destination(test_utils::suggestion("6"));

    let destination = test_utils::suggestion("6").coordinate;
    let state = session
        .wait_until(|s| s.route.as_ref().is_some_and(|r| r.end == destination))
        .await
        .unwrap();
    let route = state.route.clone().unwrap();
    assert!(!state.is_animating);
    assert_eq!(state.marker_position, Some(route.start));

    sleep(Duration::from_secs(10)).await;
    let state = session.state();
    assert!(!state.is_animating);
    assert!(route.path.contains(&state.marker_position.unwrap()));

    session.start_animation();
    let state = session.wait_until(|s| !s.is_animating).await.unwrap();
    assert_eq!(state.marker_position, Some(route.end));
}
