use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::{broadcast, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use shared::{TimeRange, DEFAULT_ASSET_ID};

use crate::config::DashboardConfig;
use crate::error::FetchError;
use crate::fallback::{placeholder_chart, placeholder_global, placeholder_metrics, placeholder_ranking};
use crate::merge::{decide, FallbackPolicy, Merge, Slot, SlotOutcome};
use crate::snapshot::{DashboardSnapshot, RefreshEvent};
use crate::source::{self, MarketDataSource, RANKING_PAGE_SIZE};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub policy: FallbackPolicy,
    /// `None` disables auto-refresh.
    pub refresh_interval: Option<Duration>,
    pub default_asset: String,
    pub default_range_days: u32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            policy: FallbackPolicy::default(),
            refresh_interval: Some(Duration::from_secs(30)),
            default_asset: DEFAULT_ASSET_ID.to_string(),
            default_range_days: TimeRange::default().days(),
        }
    }
}

impl From<&DashboardConfig> for ControllerOptions {
    fn from(config: &DashboardConfig) -> Self {
        ControllerOptions {
            policy: config.fallback_policy,
            refresh_interval: config.refresh_interval,
            default_asset: config.default_coin.clone(),
            default_range_days: config.default_range.days(),
        }
    }
}

/// Polls the market data source and publishes [`DashboardSnapshot`]s.
///
/// Handles are cheap to clone and share one state. Dropping the last handle
/// stops the auto-refresh timer.
pub struct DashboardController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for DashboardController<S> {
    fn clone(&self) -> Self {
        DashboardController {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    source: Arc<S>,
    options: ControllerOptions,
    state: watch::Sender<DashboardSnapshot>,
    events: broadcast::Sender<RefreshEvent>,
    refresh_tickets: AtomicU64,
    chart_tickets: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S> Drop for Inner<S> {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

impl<S: MarketDataSource> DashboardController<S> {
    pub fn new(source: Arc<S>, options: ControllerOptions) -> Self {
        let initial = DashboardSnapshot::new(options.default_asset.clone(), options.default_range_days);
        let (state, _) = watch::channel(initial);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        DashboardController {
            inner: Arc::new(Inner {
                source,
                options,
                state,
                events,
                refresh_tickets: AtomicU64::new(0),
                chart_tickets: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.inner.options
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<RefreshEvent> {
        self.inner.events.subscribe()
    }

    /// Runs one refresh cycle: fetches the four slots concurrently, waits for all
    /// of them, then applies the outcomes in a single state update.
    ///
    /// Never fails. Slot failures are logged and handled by the fallback policy.
    /// If a newer cycle has already been applied by the time this one settles,
    /// its results are discarded.
    pub async fn refresh(&self, notify: bool) {
        let inner = &self.inner;
        let ticket = inner.refresh_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let chart_ticket = inner.chart_tickets.fetch_add(1, Ordering::SeqCst) + 1;

        let mut selection = (String::new(), 0);
        inner.state.send_modify(|snap| {
            snap.loading = true;
            snap.error = None;
            snap.in_flight += 1;
            selection = (snap.selected_asset.clone(), snap.selected_range_days);
        });
        let (asset_id, days) = selection;
        let mut guard = InFlight::new(&inner.state);

        if notify {
            info!("Refreshing market data (cycle {})", ticket);
            let _ = inner.events.send(RefreshEvent::Started { cycle: ticket });
        } else {
            debug!("Refreshing market data (cycle {})", ticket);
        }

        let global = {
            let data = Arc::clone(&inner.source);
            tokio::spawn(async move { source::fetch_global(data.as_ref()).await })
        };
        let metrics = {
            let data = Arc::clone(&inner.source);
            tokio::spawn(async move { source::fetch_headline_metrics(data.as_ref()).await })
        };
        let chart = {
            let data = Arc::clone(&inner.source);
            tokio::spawn(async move { source::fetch_chart(data.as_ref(), &asset_id, days).await })
        };
        let ranking = {
            let data = Arc::clone(&inner.source);
            tokio::spawn(async move { source::fetch_ranking(data.as_ref(), RANKING_PAGE_SIZE).await })
        };

        let (global, metrics, chart, ranking) = tokio::join!(global, metrics, chart, ranking);

        let policy = inner.options.policy;
        let global = decide(settle(Slot::Global, global), policy, placeholder_global);
        let metrics = decide(settle(Slot::Metrics, metrics), policy, placeholder_metrics);
        let chart = decide(settle(Slot::Chart, chart), policy, || placeholder_chart(days));
        let ranking = decide(settle(Slot::Ranking, ranking), policy, placeholder_ranking);

        let failed: Vec<Slot> = [
            (Slot::Global, global.is_failure()),
            (Slot::Metrics, metrics.is_failure()),
            (Slot::Chart, chart.is_failure()),
            (Slot::Ranking, ranking.is_failure()),
        ]
        .into_iter()
        .filter_map(|(slot, failed)| failed.then_some(slot))
        .collect();

        let mut stale = false;
        guard.disarm();
        inner.state.send_modify(|snap| {
            snap.leave_flight();

            if ticket <= snap.cycle {
                debug!("Dropping results of cycle {}, cycle {} already applied", ticket, snap.cycle);
                stale = true;
                return;
            }
            snap.cycle = ticket;

            if let Some(global) = snap.merge_slot(Slot::Global, global) {
                snap.global = Some(global);
            }
            if let Some(metrics) = snap.merge_slot(Slot::Metrics, metrics) {
                snap.metrics = metrics;
            }
            if chart_ticket > snap.chart_ticket {
                snap.chart_ticket = chart_ticket;
                if let Some(chart) = snap.merge_slot(Slot::Chart, chart) {
                    snap.chart = chart;
                }
            } else {
                debug!("Dropping chart of cycle {}, a newer chart request was applied", ticket);
            }
            if let Some(ranking) = snap.merge_slot(Slot::Ranking, ranking) {
                snap.ranking = ranking;
            }
            snap.last_update = Some(Utc::now());
        });

        if notify {
            if failed.is_empty() {
                info!("Refresh cycle {} complete", ticket);
            } else {
                info!("Refresh cycle {} complete, {} of 4 slots failed", ticket, failed.len());
            }
            let _ = inner.events.send(RefreshEvent::Finished { cycle: ticket, failed, stale });
        }
    }

    /// Loads the chart for `asset_id` over `days` and makes it the selection used
    /// by later refreshes.
    pub async fn fetch_chart_data(&self, asset_id: &str, days: u32) {
        let inner = &self.inner;

        if days == 0 {
            let err = FetchError::InvalidRange(days);
            warn!("Rejected chart request for {}: {}", asset_id, err);
            inner.state.send_modify(|snap| snap.record_failure(Slot::Chart, &err));
            return;
        }

        let ticket = inner.chart_tickets.fetch_add(1, Ordering::SeqCst) + 1;
        inner.state.send_modify(|snap| {
            snap.selected_asset = asset_id.to_string();
            snap.selected_range_days = days;
        });

        debug!("Fetching {} day chart for {}", days, asset_id);
        let outcome = SlotOutcome::from(source::fetch_chart(inner.source.as_ref(), asset_id, days).await);
        if let SlotOutcome::Failed(err) = &outcome {
            warn!("Failed to fetch chart for {}: {}", asset_id, err);
        }
        let merge = decide(outcome, inner.options.policy, || placeholder_chart(days));

        inner.state.send_modify(|snap| {
            if ticket <= snap.chart_ticket {
                debug!("Dropping chart for {}, a newer chart was applied", asset_id);
                return;
            }
            snap.chart_ticket = ticket;

            let succeeded = matches!(merge, Merge::Apply(_));
            if let Some(chart) = snap.merge_slot(Slot::Chart, merge) {
                snap.chart = chart;
            }
            if succeeded {
                snap.error = None;
            }
        });
    }

    /// Starts the periodic refresh. Does nothing if it is already running or the
    /// interval is disabled. The first refresh happens one interval from now.
    pub fn start_auto_refresh(&self) {
        let Some(period) = self.inner.options.refresh_interval else {
            debug!("Auto-refresh is disabled");
            return;
        };

        let mut timer = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Auto-refresh already running");
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        *timer = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                DashboardController { inner }.refresh(false).await;
            }
        }));
        info!("Auto-refresh started, every {}s", period.as_secs_f64());
    }

    pub fn stop_auto_refresh(&self) {
        let handle = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Auto-refresh stopped");
        }
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Releases this refresh's share of the loading flag if the refresh future is
/// dropped before it settles, e.g. when the timer is aborted mid-tick.
struct InFlight<'a> {
    state: &'a watch::Sender<DashboardSnapshot>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<DashboardSnapshot>) -> Self {
        InFlight { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Refresh cancelled before it settled");
            self.state.send_modify(DashboardSnapshot::leave_flight);
        }
    }
}

fn settle<T>(slot: Slot, joined: Result<Result<T, FetchError>, JoinError>) -> SlotOutcome<T> {
    match joined {
        Ok(Ok(value)) => SlotOutcome::Fresh(value),
        Ok(Err(err)) => {
            warn!("Failed to fetch {}: {}", slot, err);
            SlotOutcome::Failed(err)
        }
        Err(err) => {
            error!("Fetch task for {} did not complete: {}", slot, err);
            SlotOutcome::Failed(FetchError::Orchestration)
        }
    }
}
