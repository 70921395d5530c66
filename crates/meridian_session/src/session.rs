use std::{future::Future, sync::Arc};

use futures::StreamExt;
use meridian_catalog::{
    catalog::LocationCatalog, location_search::LocationSearch,
    location_suggestion::LocationSuggestion,
};
use meridian_routing::{
    coordinate::Coordinate,
    route_calculator::RouteCalculator,
    route_provider::RouteProvider,
};
use parking_lot::Mutex;
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    animation::AnimationScheduler,
    session_params::SessionParams,
    session_state::{SearchField, SessionError, SessionState},
};

/// Identifies the selected pair a route was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteKey {
    start_id: String,
    destination_id: String,
}

/// Request generations and task handles. Only ever locked for short, synchronous
/// sections; the state channel is always locked after it.
#[derive(Default)]
struct SessionControl {
    start_search: u64,
    destination_search: u64,
    route: u64,
    route_key: Option<RouteKey>,
    animation: u64,
    animation_task: Option<AbortHandle>,
    tasks: JoinSet<()>,
}

impl SessionControl {
    fn search_generation(&self, field: SearchField) -> u64 {
        match field {
            SearchField::Start => self.start_search,
            SearchField::Destination => self.destination_search,
        }
    }

    fn next_search(&mut self, field: SearchField) -> u64 {
        let generation = match field {
            SearchField::Start => &mut self.start_search,
            SearchField::Destination => &mut self.destination_search,
        };
        *generation += 1;
        *generation
    }

    fn next_route(&mut self, key: Option<RouteKey>) -> u64 {
        self.route += 1;
        self.route_key = key;
        self.route
    }

    fn stop_animation(&mut self) {
        self.animation += 1;
        if let Some(task) = self.animation_task.take() {
            task.abort();
        }
    }

    fn spawn<F>(&mut self, task: F) -> AbortHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        while let Some(result) = self.tasks.try_join_next() {
            match result {
                Err(error) if error.is_panic() => {
                    warn!("RouteSession: task panicked: {}", error)
                }
                _ => {}
            }
        }
        self.tasks.spawn(task)
    }
}

struct SessionInner<S, P> {
    search: S,
    provider: P,
    scheduler: AnimationScheduler,
    state: watch::Sender<SessionState>,
    control: Mutex<SessionControl>,
}

/// Clears `is_loading` when a route computation ends, however it ends. A computation
/// that unwinds before publishing a result also forgets its pair so it can be retried.
struct LoadingGuard<'a, S, P> {
    inner: &'a SessionInner<S, P>,
    generation: u64,
}

impl<S, P> Drop for LoadingGuard<'_, S, P> {
    fn drop(&mut self) {
        let mut control = self.inner.control.lock();
        if control.route != self.generation {
            return;
        }

        let interrupted = self.inner.state.send_if_modified(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });

        if interrupted {
            if std::thread::panicking() {
                warn!("RouteSession: route computation #{} panicked", self.generation);
            }
            control.route_key = None;
        }
    }
}

impl<S, P> SessionInner<S, P>
where
    S: LocationSearch,
    P: RouteProvider,
{
    async fn run_search(self: Arc<Self>, field: SearchField, generation: u64, query: String) {
        let result = self.search.search(&query).await;

        let control = self.control.lock();
        if control.search_generation(field) != generation {
            debug!("RouteSession: discarding stale {} results for {:?}", field, query);
            return;
        }

        match result {
            Ok(suggestions) => {
                debug!(
                    "RouteSession: {} suggestions for {} query {:?}",
                    suggestions.len(),
                    field,
                    query
                );
                self.state.send_modify(|state| {
                    *state.suggestions_mut(field) = suggestions;
                    if state.error.as_ref().is_some_and(|e| e.is_lookup(field)) {
                        state.error = None;
                    }
                });
            }
            Err(failure) => {
                warn!("RouteSession: {} search for {:?} failed: {}", field, query, failure);
                self.state.send_modify(|state| {
                    state.error = Some(SessionError::Lookup { field, failure });
                });
            }
        }
    }

    async fn run_route(self: Arc<Self>, generation: u64, start: Coordinate, end: Coordinate) {
        let _loading = LoadingGuard {
            inner: &self,
            generation,
        };

        let result = self.provider.compute(start, end).await;

        let mut control = self.control.lock();
        if control.route != generation {
            debug!("RouteSession: discarding superseded route {} -> {}", start, end);
            return;
        }

        match result {
            Ok(route) => {
                info!(
                    "RouteSession: route ready, {} in {}",
                    route.display_distance(),
                    route.display_duration()
                );
                // Playback of the previous route must not move the new marker.
                control.stop_animation();
                self.state.send_modify(|state| {
                    state.marker_position = Some(route.start);
                    state.route = Some(route);
                    state.is_loading = false;
                    state.is_animating = false;
                    if state.error.as_ref().is_some_and(SessionError::is_computation) {
                        state.error = None;
                    }
                });
            }
            Err(failure) => {
                warn!("RouteSession: route {} -> {} failed: {}", start, end, failure);
                // Selecting the same pair again retries.
                control.route_key = None;
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.error = Some(failure.into());
                });
            }
        }
    }

    async fn run_animation(self: Arc<Self>, generation: u64, path: Vec<Coordinate>) {
        let mut points = std::pin::pin!(self.scheduler.play(path));

        while let Some(point) = points.next().await {
            let control = self.control.lock();
            if control.animation != generation {
                return;
            }
            self.state.send_modify(|state| state.marker_position = Some(point));
        }

        let mut control = self.control.lock();
        if control.animation == generation {
            control.animation_task = None;
            self.state.send_modify(|state| state.is_animating = false);
            debug!("RouteSession: animation finished");
        }
    }
}

/// Drives location searches, selections, route computation and marker playback for
/// one user, and publishes every change as a [`SessionState`] snapshot.
///
/// Operations return immediately and run their slow parts as tasks on the current
/// Tokio runtime, so they must be called from within one. Dropping the session
/// aborts its pending tasks.
pub struct RouteSession<S = LocationCatalog, P = RouteCalculator>
where
    S: LocationSearch,
    P: RouteProvider,
{
    inner: Arc<SessionInner<S, P>>,
}

impl RouteSession {
    /// Session over the built-in catalog and calculator.
    pub fn new(params: &SessionParams) -> Self {
        Self::with_catalog(LocationCatalog::default(), params)
    }

    pub fn with_catalog(catalog: LocationCatalog, params: &SessionParams) -> Self {
        RouteSession::with_providers(
            catalog.with_latency(params.search_latency),
            RouteCalculator::new(params.route_calculator_params()),
            AnimationScheduler::new(params.animation_duration),
        )
    }
}

impl<S, P> RouteSession<S, P>
where
    S: LocationSearch,
    P: RouteProvider,
{
    pub fn with_providers(search: S, provider: P, scheduler: AnimationScheduler) -> Self {
        let (state, _) = watch::channel(SessionState::default());

        Self {
            inner: Arc::new(SessionInner {
                search,
                provider,
                scheduler,
                state,
                control: Mutex::new(SessionControl::default()),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Resolves with the first snapshot, current one included, matching `predicate`.
    pub async fn wait_until<F>(&self, predicate: F) -> Result<SessionState, watch::error::RecvError>
    where
        F: FnMut(&SessionState) -> bool,
    {
        let mut receiver = self.subscribe();
        let state = receiver.wait_for(predicate).await?;
        Ok(state.clone())
    }

    pub fn update_start_query(&self, text: impl Into<String>) {
        self.update_query(SearchField::Start, text.into());
    }

    pub fn update_destination_query(&self, text: impl Into<String>) {
        self.update_query(SearchField::Destination, text.into());
    }

    pub fn select_start(&self, suggestion: LocationSuggestion) {
        self.select(SearchField::Start, suggestion);
    }

    pub fn select_destination(&self, suggestion: LocationSuggestion) {
        self.select(SearchField::Destination, suggestion);
    }

    /// Back to an empty session. Pending searches and route computations are
    /// discarded and a running animation is cancelled.
    pub fn clear_selections(&self) {
        let mut control = self.inner.control.lock();
        control.next_search(SearchField::Start);
        control.next_search(SearchField::Destination);
        control.next_route(None);
        control.stop_animation();

        self.inner.state.send_modify(|state| *state = SessionState::default());
        debug!("RouteSession: selections cleared");
    }

    /// Plays the marker along the current route. Does nothing without a route or
    /// while an animation is already running.
    pub fn start_animation(&self) {
        let mut control = self.inner.control.lock();

        let mut path = None;
        self.inner.state.send_if_modified(|state| {
            if state.is_animating {
                return false;
            }
            let Some(route) = &state.route else {
                return false;
            };

            path = Some(route.path.clone());
            state.is_animating = true;
            true
        });

        let Some(path) = path else {
            debug!("RouteSession: animation request ignored");
            return;
        };

        control.stop_animation();
        let generation = control.animation;
        let inner = Arc::clone(&self.inner);
        let task = control.spawn(inner.run_animation(generation, path));
        control.animation_task = Some(task);
    }

    /// Stops the animation and puts the marker back on the selected start, if any.
    pub fn reset_animation(&self) {
        let mut control = self.inner.control.lock();
        control.stop_animation();

        self.inner.state.send_modify(|state| {
            state.is_animating = false;
            if let Some(start) = &state.selected_start {
                state.marker_position = Some(start.coordinate);
            }
        });
    }

    fn update_query(&self, field: SearchField, text: String) {
        let mut control = self.inner.control.lock();
        let generation = control.next_search(field);

        self.inner.state.send_modify(|state| {
            if text.is_empty() {
                state.suggestions_mut(field).clear();
            }
            *state.query_mut(field) = text.clone();
        });

        if text.is_empty() {
            return;
        }

        debug!("RouteSession: {} search #{} for {:?}", field, generation, text);
        let inner = Arc::clone(&self.inner);
        control.spawn(inner.run_search(field, generation, text));
    }

    fn select(&self, field: SearchField, suggestion: LocationSuggestion) {
        let mut control = self.inner.control.lock();
        control.next_search(field);

        let mut request = None;
        self.inner.state.send_modify(|state| {
            *state.query_mut(field) = suggestion.name.clone();
            state.suggestions_mut(field).clear();
            *state.selection_mut(field) = Some(suggestion);

            let (Some(start), Some(destination)) =
                (&state.selected_start, &state.selected_destination)
            else {
                return;
            };

            let key = RouteKey {
                start_id: start.id.clone(),
                destination_id: destination.id.clone(),
            };
            if control.route_key.as_ref() == Some(&key) {
                return;
            }

            let generation = control.next_route(Some(key));
            request = Some((generation, start.coordinate, destination.coordinate));
            state.is_loading = true;
        });

        if let Some((generation, start, end)) = request {
            debug!("RouteSession: route request #{} {} -> {}", generation, start, end);
            let inner = Arc::clone(&self.inner);
            control.spawn(inner.run_route(generation, start, end));
        }
    }
}

impl<S, P> Drop for RouteSession<S, P>
where
    S: LocationSearch,
    P: RouteProvider,
{
    fn drop(&mut self) {
        self.inner.control.lock().tasks.abort_all();
    }
}
