use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use foodwise_core::FoodItemId;
use foodwise_events::{ChangeBus, Event, InventoryChange, Subscription};
use foodwise_inventory::{
    ExpiryNotification, NotificationSnapshot, NotificationThresholds, SavedFoodItem,
    derive_notifications,
};

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_RESCAN_INTERVAL, FoodwiseConfig};
use crate::store::{CollectionBackend, InventoryStore};

use super::WorkerHandle;

/// Longest the worker blocks before re-checking shutdown and timers.
const MAX_TICK: Duration = Duration::from_millis(250);

/// What the watcher needs from the inventory.
pub trait ExpirySource: Send + Sync + 'static {
    /// The expiring-soon set at `now`, in insertion order.
    fn expiring_at(&self, now: DateTime<Utc>) -> Vec<SavedFoodItem>;

    /// Returns true (and signals subscribers) if another writer changed the data.
    fn poll_external_change(&self) -> bool;

    fn subscribe_changes(&self) -> Subscription<InventoryChange>;
}

impl<B, E> ExpirySource for InventoryStore<B, E>
where
    B: CollectionBackend + 'static,
    E: ChangeBus<InventoryChange> + 'static,
{
    fn expiring_at(&self, now: DateTime<Utc>) -> Vec<SavedFoodItem> {
        self.expiring_soon_at(self.expiring_threshold_days(), now)
    }

    fn poll_external_change(&self) -> bool {
        self.check_external_change()
    }

    fn subscribe_changes(&self) -> Subscription<InventoryChange> {
        self.subscribe()
    }
}

impl<S> ExpirySource for Arc<S>
where
    S: ExpirySource + ?Sized,
{
    fn expiring_at(&self, now: DateTime<Utc>) -> Vec<SavedFoodItem> {
        (**self).expiring_at(now)
    }

    fn poll_external_change(&self) -> bool {
        (**self).poll_external_change()
    }

    fn subscribe_changes(&self) -> Subscription<InventoryChange> {
        (**self).subscribe_changes()
    }
}

/// Receives one call per critical item per watcher lifetime.
pub trait AlertSink: Send + Sync + 'static {
    fn alert(&self, notification: &ExpiryNotification);
}

impl<A> AlertSink for Arc<A>
where
    A: AlertSink + ?Sized,
{
    fn alert(&self, notification: &ExpiryNotification) {
        (**self).alert(notification)
    }
}

/// Emits alerts as `warn` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn alert(&self, notification: &ExpiryNotification) {
        warn!(
            item_id = %notification.item_id(),
            days_left = notification.days_left,
            detail = %notification.use_before(),
            "{}",
            notification.headline()
        );
    }
}

#[derive(Debug, Clone)]
pub struct ExpiryWatcherConfig {
    pub rescan_interval: Duration,
    pub poll_interval: Duration,
    pub thresholds: NotificationThresholds,
}

impl Default for ExpiryWatcherConfig {
    fn default() -> Self {
        Self {
            rescan_interval: DEFAULT_RESCAN_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            thresholds: NotificationThresholds::default(),
        }
    }
}

impl ExpiryWatcherConfig {
    pub fn from_config(config: &FoodwiseConfig) -> Self {
        Self {
            rescan_interval: config.rescan_interval,
            poll_interval: config.poll_interval,
            ..Self::default()
        }
    }

    pub fn with_rescan_interval(mut self, interval: Duration) -> Self {
        self.rescan_interval = interval;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_thresholds(mut self, thresholds: NotificationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

struct WatcherState {
    source: Arc<dyn ExpirySource>,
    sink: Arc<dyn AlertSink>,
    thresholds: NotificationThresholds,
    latest: RwLock<NotificationSnapshot>,
    alerted: Mutex<HashSet<FoodItemId>>,
    in_flight: AtomicBool,
    rescans: AtomicU64,
}

impl WatcherState {
    /// Re-derive notifications. Returns false if another rescan was running.
    fn rescan(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("expiry rescan already in flight; skipped");
            return false;
        }

        let now = Utc::now();
        let expiring = self.source.expiring_at(now);
        let snapshot = derive_notifications(&expiring, now, &self.thresholds);

        if let Ok(mut alerted) = self.alerted.lock() {
            for notification in snapshot.critical() {
                if alerted.insert(notification.item_id()) {
                    self.sink.alert(notification);
                }
            }
            // Forget items that were deleted or have expired.
            alerted.retain(|id| snapshot.critical().any(|n| n.item_id() == *id));
        }

        debug!(
            expiring = snapshot.len(),
            critical = snapshot.critical().count(),
            warnings = snapshot.warnings().count(),
            "expiry rescan complete"
        );

        if let Ok(mut latest) = self.latest.write() {
            *latest = snapshot;
        }
        self.rescans.fetch_add(1, Ordering::Relaxed);
        self.in_flight.store(false, Ordering::Release);
        true
    }
}

/// Background worker that keeps the expiry notifications current.
///
/// Rescans happen once at spawn, after store changes (bursts coalesce into a
/// single rescan), on a fixed interval, and after writes by other processes
/// are detected. Rescans only read the store.
pub struct ExpiryWatcher {
    state: Arc<WatcherState>,
    handle: WorkerHandle,
}

impl ExpiryWatcher {
    /// Perform the initial scan and start the worker thread.
    pub fn spawn<S, A>(source: S, sink: A, config: ExpiryWatcherConfig) -> std::io::Result<Self>
    where
        S: ExpirySource,
        A: AlertSink,
    {
        let source: Arc<dyn ExpirySource> = Arc::new(source);
        let subscription = source.subscribe_changes();

        let state = Arc::new(WatcherState {
            source,
            sink: Arc::new(sink),
            thresholds: config.thresholds,
            latest: RwLock::new(NotificationSnapshot::empty(Utc::now())),
            alerted: Mutex::new(HashSet::new()),
            in_flight: AtomicBool::new(false),
            rescans: AtomicU64::new(0),
        });
        state.rescan();

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let worker_state = state.clone();
        let join = thread::Builder::new()
            .name("expiry-watcher".to_string())
            .spawn(move || watch_loop(&worker_state, subscription, shutdown_rx, &config))?;

        info!("expiry watcher started");
        Ok(Self {
            state,
            handle: WorkerHandle::new(shutdown_tx, join),
        })
    }

    /// The most recent notification snapshot.
    pub fn latest(&self) -> NotificationSnapshot {
        match self.state.latest.read() {
            Ok(latest) => latest.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Rescan on the calling thread. Returns false if skipped because another
    /// rescan was in flight.
    pub fn rescan_now(&self) -> bool {
        self.state.rescan()
    }

    /// Number of completed rescans.
    pub fn rescan_count(&self) -> u64 {
        self.state.rescans.load(Ordering::Relaxed)
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(self) {
        self.handle.shutdown();
        info!("expiry watcher stopped");
    }
}

impl core::fmt::Debug for ExpiryWatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExpiryWatcher")
            .field("rescans", &self.rescan_count())
            .finish_non_exhaustive()
    }
}

fn watch_loop(
    state: &WatcherState,
    sub: Subscription<InventoryChange>,
    shutdown_rx: mpsc::Receiver<()>,
    config: &ExpiryWatcherConfig,
) {
    let tick = config.poll_interval.min(MAX_TICK);
    let mut last_rescan = Instant::now();
    let mut last_poll = Instant::now();

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(change) => {
                let coalesced = sub.drain().len();
                debug!(kind = change.event_type(), coalesced, "inventory change received");
                state.rescan();
                last_rescan = Instant::now();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_poll.elapsed() >= config.poll_interval {
            // A detected change arrives through the subscription on the next tick.
            state.source.poll_external_change();
            last_poll = Instant::now();
        }

        if last_rescan.elapsed() >= config.rescan_interval {
            state.rescan();
            last_rescan = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;
    use foodwise_core::{FoodCategory, Packaging};
    use foodwise_events::InMemoryChangeBus;
    use foodwise_inventory::NewFoodItem;

    use super::*;
    use crate::store::InMemoryBackend;

    type TestStore = InventoryStore<Arc<InMemoryBackend>, Arc<InMemoryChangeBus<InventoryChange>>>;

    #[derive(Default)]
    struct RecordingSink {
        alerts: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn names(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl AlertSink for RecordingSink {
        fn alert(&self, notification: &ExpiryNotification) {
            self.alerts.lock().unwrap().push(notification.item.name.clone());
        }
    }

    fn store_on(backend: Arc<InMemoryBackend>) -> Arc<TestStore> {
        Arc::new(InventoryStore::new(backend, Arc::new(InMemoryChangeBus::new())))
    }

    fn item(name: &str, expires_in: ChronoDuration) -> NewFoodItem {
        NewFoodItem {
            name: name.to_string(),
            category: FoodCategory::Dairy,
            expiry_date: Utc::now() + expires_in,
            expiry_days: 1.0,
            temperature: 4.0,
            humidity: 40.0,
            packaging: Packaging::Plastic,
        }
    }

    fn fast_config() -> ExpiryWatcherConfig {
        ExpiryWatcherConfig::default().with_poll_interval(Duration::from_millis(20))
    }

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        cond()
    }

    #[test]
    fn scans_once_at_spawn() {
        let store = store_on(InMemoryBackend::arc());
        store.save(item("Milk", ChronoDuration::hours(12))).unwrap();
        store.save(item("Ham", ChronoDuration::days(10))).unwrap();

        let sink = Arc::new(RecordingSink::default());
        let watcher = ExpiryWatcher::spawn(store, sink.clone(), fast_config()).unwrap();

        let latest = watcher.latest();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest.notifications[0].item.name, "Milk");
        assert_eq!(sink.names(), vec!["Milk"]);
        watcher.shutdown();
    }

    #[test]
    fn store_changes_trigger_a_rescan() {
        let store = store_on(InMemoryBackend::arc());
        let watcher =
            ExpiryWatcher::spawn(store.clone(), TracingAlertSink, fast_config()).unwrap();
        assert!(watcher.latest().is_empty());

        store.save(item("Yogurt", ChronoDuration::hours(40))).unwrap();
        assert!(wait_until(|| watcher.latest().len() == 1));
        assert_eq!(watcher.latest().warnings().count(), 1);

        store.clear().unwrap();
        assert!(wait_until(|| watcher.latest().is_empty()));
        watcher.shutdown();
    }

    #[test]
    fn critical_items_alert_only_once() {
        let store = store_on(InMemoryBackend::arc());
        let sink = Arc::new(RecordingSink::default());
        store.save(item("Milk", ChronoDuration::hours(5))).unwrap();

        let watcher = ExpiryWatcher::spawn(store.clone(), sink.clone(), fast_config()).unwrap();
        assert!(watcher.rescan_now());
        assert!(watcher.rescan_now());

        store.save(item("Cream", ChronoDuration::hours(10))).unwrap();
        assert!(wait_until(|| sink.names().len() == 2));
        watcher.rescan_now();

        assert_eq!(sink.names(), vec!["Milk", "Cream"]);
        watcher.shutdown();
    }

    #[test]
    fn alerted_set_forgets_items_that_leave_the_window() {
        let store = store_on(InMemoryBackend::arc());
        let sink = Arc::new(RecordingSink::default());
        let milk = store.save(item("Milk", ChronoDuration::hours(5))).unwrap();
        store.save(item("Cream", ChronoDuration::hours(10))).unwrap();

        let watcher = ExpiryWatcher::spawn(store.clone(), sink.clone(), fast_config()).unwrap();
        assert_eq!(watcher.state.alerted.lock().unwrap().len(), 2);

        store.delete(milk.id).unwrap();
        assert!(wait_until(|| watcher.latest().len() == 1));
        watcher.rescan_now();

        let alerted = watcher.state.alerted.lock().unwrap().clone();
        assert_eq!(alerted.len(), 1);
        assert!(!alerted.contains(&milk.id));
        watcher.shutdown();
    }

    #[test]
    fn overlapping_rescan_is_skipped() {
        let store = store_on(InMemoryBackend::arc());
        let watcher = ExpiryWatcher::spawn(store, TracingAlertSink, fast_config()).unwrap();

        watcher.state.in_flight.store(true, Ordering::SeqCst);
        assert!(!watcher.rescan_now());
        watcher.state.in_flight.store(false, Ordering::SeqCst);
        assert!(watcher.rescan_now());
        watcher.shutdown();
    }

    #[test]
    fn writes_by_another_handle_are_picked_up() {
        let backend = InMemoryBackend::arc();
        let other_window = store_on(backend.clone());
        let this_window = store_on(backend);

        let watcher = ExpiryWatcher::spawn(this_window, TracingAlertSink, fast_config()).unwrap();
        other_window.save(item("Spinach", ChronoDuration::hours(20))).unwrap();

        assert!(wait_until(|| watcher.latest().len() == 1));
        watcher.shutdown();
    }

    #[test]
    fn periodic_rescan_runs_without_changes() {
        let store = store_on(InMemoryBackend::arc());
        let config = fast_config().with_rescan_interval(Duration::from_millis(30));
        let watcher = ExpiryWatcher::spawn(store, TracingAlertSink, config).unwrap();

        assert!(wait_until(|| watcher.rescan_count() >= 3));
        watcher.shutdown();
    }
}
