//! The route orchestrator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::RouteConfig;
use crate::domain::{Itinerary, TravelMode, TravelRequest};
use crate::error::PlanError;
use crate::itinerary::normalize;
use crate::plan::{PlanView, SearchResponse};
use crate::provider::{
    MapSurface, ProviderError, RoutingProvider, RoutingSession, policy_code,
};

use super::event::{RouteEvent, SearchId};

/// Whether a search is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestratorState {
    Idle,
    Searching,
}

/// What a caller waiting on one search observed.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The search finished: an itinerary or a not-found error
    Completed(Result<Itinerary, PlanError>),
    /// A newer search or a clear replaced this one
    Superseded,
    /// No outcome arrived in time
    TimedOut,
}

struct ActiveSession {
    id: SearchId,
    session: Arc<dyn RoutingSession>,
    task: Option<JoinHandle<()>>,
}

struct Inner {
    next_id: SearchId,
    current: Option<SearchId>,
    state: OrchestratorState,
    active: Option<ActiveSession>,
}

/// Runs route searches against a provider, one at a time.
///
/// # Guarantees
///
/// - Before a new session is created, the previous session's results and
///   every map overlay have been cleared
/// - At most one [`RouteEvent`] is emitted per search, and only if that
///   search is still the latest when it completes
///
/// Must be used from within a tokio runtime.
pub struct RouteOrchestrator {
    provider: Arc<dyn RoutingProvider>,
    map: Arc<dyn MapSurface>,
    config: RouteConfig,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<RouteEvent>,
}

impl RouteOrchestrator {
    pub fn new(
        provider: Arc<dyn RoutingProvider>,
        map: Arc<dyn MapSurface>,
        config: RouteConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            provider,
            map,
            config,
            inner: Arc::new(Mutex::new(Inner {
                next_id: 0,
                current: None,
                state: OrchestratorState::Idle,
                active: None,
            })),
            events,
        }
    }

    /// Subscribes to result events.
    ///
    /// Subscribe before calling [`search`](Self::search) to be sure of
    /// seeing its outcome.
    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.events.subscribe()
    }

    /// Returns the current state.
    pub fn state(&self) -> OrchestratorState {
        self.lock().state
    }

    /// Returns the id of the search whose result would still be shown.
    pub fn current_search(&self) -> Option<SearchId> {
        self.lock().current
    }

    /// Starts a search, superseding any search in flight.
    ///
    /// The outcome arrives later as a [`RouteEvent`] carrying the returned id.
    pub fn search(&self, request: &TravelRequest) -> SearchId {
        let mut inner = self.lock();
        teardown(&mut inner, self.map.as_ref());

        inner.next_id += 1;
        let id = inner.next_id;
        inner.current = Some(id);
        inner.state = OrchestratorState::Searching;

        let mode = request.mode();
        let policy = request.effective_policy().map(policy_code);
        let session = self.provider.create_session(mode, policy);
        let search = session.search(request.start(), request.end());

        info!(search_id = id, %mode, policy = ?request.effective_policy(), "starting route search");

        let task = tokio::spawn(run_search(
            id,
            mode,
            search,
            Arc::clone(&self.inner),
            self.events.clone(),
            self.config.not_found_message.clone(),
        ));

        inner.active = Some(ActiveSession {
            id,
            session,
            task: Some(task),
        });

        id
    }

    /// Tears down the active search and clears the map.
    ///
    /// A search in flight is cancelled and will not emit an event.
    pub fn clear(&self) {
        let mut inner = self.lock();
        teardown(&mut inner, self.map.as_ref());
        inner.current = None;
        debug!("route cleared");
    }

    /// Waits for the outcome of search `id` on a receiver obtained before
    /// the search started.
    ///
    /// If the receiver lags behind by more than `event_capacity` events,
    /// the event for `id` may be lost; a newer search then makes this
    /// report [`SearchOutcome::Superseded`] even when `id` completed.
    pub async fn wait_for(
        &self,
        events: &mut broadcast::Receiver<RouteEvent>,
        id: SearchId,
        timeout: Duration,
    ) -> SearchOutcome {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Err(_) => return SearchOutcome::TimedOut,
                Ok(Ok(event)) if event.search_id() == id => {
                    return SearchOutcome::Completed(event.into_result());
                }
                Ok(Ok(_)) | Ok(Err(broadcast::error::RecvError::Lagged(_))) => {
                    if self.current_search() != Some(id) {
                        return SearchOutcome::Superseded;
                    }
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => return SearchOutcome::Superseded,
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock_inner(&self.inner)
    }
}

fn lock_inner(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cancels the active search, clears its rendered results and the map.
fn teardown(inner: &mut Inner, map: &dyn MapSurface) {
    if let Some(active) = inner.active.take() {
        if let Some(task) = active.task {
            task.abort();
        }
        active.session.clear_results();
        debug!(search_id = active.id, "tore down route session");
    }
    map.clear_overlays();
    inner.state = OrchestratorState::Idle;
}

async fn run_search(
    id: SearchId,
    mode: TravelMode,
    search: BoxFuture<'static, Result<SearchResponse, ProviderError>>,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<RouteEvent>,
    not_found_message: String,
) {
    let outcome = search.await;

    let mut inner = lock_inner(&inner);
    if inner.current != Some(id) {
        debug!(search_id = id, "discarding result of superseded search");
        return;
    }
    inner.state = OrchestratorState::Idle;
    if let Some(active) = inner.active.as_mut().filter(|a| a.id == id) {
        active.task = None;
    }

    let plan_error = |message: String| RouteEvent::PlanError {
        search_id: id,
        message,
    };

    let event = match outcome {
        Ok(response) if response.is_success() => match response.plan(0) {
            Some(plan) => RouteEvent::PlanComplete {
                search_id: id,
                itinerary: normalize(&PlanView::new(plan, mode)),
            },
            None => {
                warn!(search_id = id, "provider reported success with no plans");
                plan_error(not_found_message)
            }
        },
        Ok(_) => {
            info!(search_id = id, %mode, "no route found");
            plan_error(not_found_message)
        }
        Err(e) => {
            warn!(search_id = id, error = %e, "route search failed");
            plan_error(not_found_message)
        }
    };

    // Sent under the lock so a concurrent search cannot slip in between
    // the currency check and the send. Sending only fails when nobody is
    // subscribed, and then there is no one to tell.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Distance, PolicyId, StepType, TravelTime};
    use crate::mock::MockMapSurface;
    use crate::plan::{Direction, RawLegs, RawPlan, RawRoute};
    use crate::provider::ProviderPolicy;
    use futures::FutureExt;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{broadcast::error::TryRecvError, oneshot};

    type Reply = Result<SearchResponse, ProviderError>;

    /// A provider whose searches resolve only when the test says so.
    #[derive(Default)]
    struct ScriptedProvider {
        replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        sessions: Mutex<Vec<(TravelMode, Option<ProviderPolicy>)>>,
        cleared: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn expect_search(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(rx);
            tx
        }

        fn cleared(&self) -> usize {
            self.cleared.load(Ordering::SeqCst)
        }
    }

    struct ScriptedSession {
        reply: Mutex<Option<oneshot::Receiver<Reply>>>,
        cleared: Arc<AtomicUsize>,
    }

    impl RoutingProvider for ScriptedProvider {
        fn create_session(
            &self,
            mode: TravelMode,
            policy: Option<ProviderPolicy>,
        ) -> Arc<dyn RoutingSession> {
            self.sessions.lock().unwrap().push((mode, policy));
            Arc::new(ScriptedSession {
                reply: Mutex::new(self.replies.lock().unwrap().pop_front()),
                cleared: Arc::clone(&self.cleared),
            })
        }
    }

    impl RoutingSession for ScriptedSession {
        fn search(
            &self,
            _start: Coordinate,
            _end: Coordinate,
        ) -> BoxFuture<'static, Reply> {
            let reply = self.reply.lock().unwrap().take();
            async move {
                match reply {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(ProviderError::Fixture("reply dropped".into()))),
                    None => Ok(SearchResponse::failure()),
                }
            }
            .boxed()
        }

        fn clear_results(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn orchestrator() -> (RouteOrchestrator, Arc<ScriptedProvider>, Arc<MockMapSurface>) {
        orchestrator_with(RouteConfig::default())
    }

    fn orchestrator_with(
        config: RouteConfig,
    ) -> (RouteOrchestrator, Arc<ScriptedProvider>, Arc<MockMapSurface>) {
        let provider = Arc::new(ScriptedProvider::default());
        let map = Arc::new(MockMapSurface::new());
        let orch = RouteOrchestrator::new(
            Arc::clone(&provider) as Arc<dyn RoutingProvider>,
            Arc::clone(&map) as Arc<dyn MapSurface>,
            config,
        );
        (orch, provider, map)
    }

    fn transit_fixture() -> SearchResponse {
        let json = std::fs::read_to_string("data/mock_plans/transit.json").unwrap();
        serde_json::from_str(&json).unwrap()
    }

    fn request(mode: TravelMode, policy: Option<PolicyId>) -> TravelRequest {
        TravelRequest::new(
            Coordinate::new(118.7846, 32.0417),
            Coordinate::new(118.7860, 32.0227),
            mode,
            policy,
        )
        .unwrap()
    }

    fn walking_plan(description: &str) -> SearchResponse {
        SearchResponse::success(vec![RawPlan {
            distance: Distance::from_meters(2100),
            duration: TravelTime::from_seconds(1800),
            legs: RawLegs::Uniform {
                routes: vec![RawRoute {
                    distance: Distance::from_meters(2100),
                    duration: TravelTime::from_seconds(1800),
                    directions: vec![Direction {
                        description: description.into(),
                        distance: Distance::from_meters(2100),
                    }],
                }],
            },
        }])
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn completed_search_emits_itinerary() {
        let (orch, provider, _map) = orchestrator();
        let mut rx = orch.subscribe();
        let reply = provider.expect_search();

        let id = orch.search(&request(TravelMode::Walking, None));
        assert_eq!(orch.state(), OrchestratorState::Searching);

        reply.send(Ok(walking_plan("<b>head south</b>"))).unwrap();
        let event = rx.recv().await.unwrap();

        assert_eq!(event.search_id(), id);
        let itinerary = event.into_result().unwrap();
        assert_eq!(itinerary.steps[0].instruction, "head south");
        assert_eq!(itinerary.distance, "2.1km");
        assert_eq!(orch.state(), OrchestratorState::Idle);
    }

    #[tokio::test]
    async fn superseded_search_never_emits() {
        let (orch, provider, map) = orchestrator();
        let mut rx = orch.subscribe();
        let reply_a = provider.expect_search();
        let reply_b = provider.expect_search();

        let a = orch.search(&request(TravelMode::Driving, None));
        let b = orch.search(&request(TravelMode::Transit, None));
        assert!(b > a);

        // A's session was cleared before B's was created.
        assert_eq!(provider.cleared(), 1);
        assert_eq!(map.clear_count(), 2);

        let _ = reply_a.send(Ok(walking_plan("from A")));
        reply_b.send(Ok(transit_fixture())).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.search_id(), b);
        let itinerary = event.into_result().unwrap();
        assert!(itinerary.steps.iter().any(|s| s.instruction.starts_with("S1号线")
            && s.step_type == StepType::Subway));

        settle().await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn clear_cancels_search_in_flight() {
        let (orch, provider, map) = orchestrator();
        let mut rx = orch.subscribe();
        let reply = provider.expect_search();

        orch.search(&request(TravelMode::Walking, None));
        orch.clear();

        assert_eq!(orch.state(), OrchestratorState::Idle);
        assert_eq!(orch.current_search(), None);
        assert_eq!(provider.cleared(), 1);
        assert_eq!(map.clear_count(), 2);

        let _ = reply.send(Ok(walking_plan("too late")));
        settle().await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn failure_status_emits_not_found() {
        let (orch, provider, _map) = orchestrator();
        let mut rx = orch.subscribe();
        let reply = provider.expect_search();

        let id = orch.search(&request(TravelMode::Transit, None));
        reply.send(Ok(SearchResponse::failure())).unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.search_id(), id);
        assert_eq!(
            event.into_result(),
            Err(PlanError::RouteNotFound {
                message: RouteConfig::default().not_found_message
            })
        );
    }

    #[tokio::test]
    async fn transport_error_and_empty_plans_emit_not_found() {
        let (orch, provider, _map) = orchestrator();
        let mut rx = orch.subscribe();

        let reply = provider.expect_search();
        orch.search(&request(TravelMode::Driving, None));
        reply
            .send(Err(ProviderError::ScriptLoad("offline".into())))
            .unwrap();
        assert!(rx.recv().await.unwrap().into_result().is_err());

        let reply = provider.expect_search();
        orch.search(&request(TravelMode::Driving, None));
        reply.send(Ok(SearchResponse::success(vec![]))).unwrap();
        assert!(rx.recv().await.unwrap().into_result().is_err());
    }

    #[tokio::test]
    async fn policy_forwarded_only_for_policy_modes() {
        let (orch, provider, _map) = orchestrator();

        orch.search(&request(
            TravelMode::Driving,
            Some(PolicyId::DrivingAvoidHighways),
        ));
        orch.search(&request(TravelMode::Walking, Some(PolicyId::TransitLeastTime)));
        orch.search(&request(TravelMode::Transit, None));

        let sessions = provider.sessions.lock().unwrap().clone();
        assert_eq!(
            sessions,
            vec![
                (TravelMode::Driving, Some(ProviderPolicy(3))),
                (TravelMode::Walking, None),
                (TravelMode::Transit, None),
            ]
        );
    }

    #[tokio::test]
    async fn wait_for_reports_supersession() {
        let (orch, provider, _map) = orchestrator();
        let mut rx = orch.subscribe();
        let _reply_a = provider.expect_search();
        let reply_b = provider.expect_search();

        let a = orch.search(&request(TravelMode::Walking, None));
        orch.search(&request(TravelMode::Walking, None));
        reply_b.send(Ok(walking_plan("from B"))).unwrap();

        let outcome = orch.wait_for(&mut rx, a, Duration::from_secs(5)).await;
        assert_eq!(outcome, SearchOutcome::Superseded);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_times_out() {
        let (orch, provider, _map) = orchestrator();
        let mut rx = orch.subscribe();
        let _reply = provider.expect_search();

        let id = orch.search(&request(TravelMode::Walking, None));
        let outcome = orch.wait_for(&mut rx, id, Duration::from_secs(1)).await;
        assert_eq!(outcome, SearchOutcome::TimedOut);
    }

    #[tokio::test]
    async fn lagging_receiver_loses_completed_search() {
        let (orch, provider, _map) = orchestrator_with(RouteConfig {
            event_capacity: 1,
            ..RouteConfig::default()
        });
        let mut rx = orch.subscribe();

        let reply = provider.expect_search();
        let a = orch.search(&request(TravelMode::Walking, None));
        reply.send(Ok(walking_plan("from A"))).unwrap();
        settle().await;

        let reply = provider.expect_search();
        orch.search(&request(TravelMode::Walking, None));
        reply.send(Ok(walking_plan("from B"))).unwrap();
        settle().await;

        // A's event was overwritten before anyone read it.
        let outcome = orch.wait_for(&mut rx, a, Duration::from_secs(5)).await;
        assert_eq!(outcome, SearchOutcome::Superseded);
    }
}
