// ── Polling tasks ──
//
// Each view owns one repeating fetch task. The task fetches immediately,
// then on every interval tick or explicit refresh, until its cancellation
// token fires. `PollGuard` owns the token through a `DropGuard`, so dropping
// the guard always stops the task.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

use crate::config::{PollConfig, RetryPolicy};
use crate::error::CoreError;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-wide monotonically increasing sequence number.
///
/// Taken when a fetch starts, so a slow response that lands after a newer
/// one carries the smaller number.
pub fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate<T> {
    Loaded { seq: u64, data: T },
    /// All attempts failed; `attempts` includes the first try.
    Failed {
        seq: u64,
        error: CoreError,
        attempts: u32,
    },
}

impl<T> PollUpdate<T> {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Loaded { seq, .. } | Self::Failed { seq, .. } => *seq,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PollUpdate<U> {
        match self {
            Self::Loaded { seq, data } => PollUpdate::Loaded { seq, data: f(data) },
            Self::Failed {
                seq,
                error,
                attempts,
            } => PollUpdate::Failed {
                seq,
                error,
                attempts,
            },
        }
    }
}

/// Cadence and retry settings for one poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Repeat period. `None` fetches once and then only on [`PollGuard::refresh`].
    pub interval: Option<Duration>,
    /// Per-attempt deadline; an attempt that exceeds it fails with
    /// [`CoreError::Timeout`].
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

/// Views that poll on their own timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolledView {
    Dashboard,
    Feeds,
    Alerts,
}

impl PolledView {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Feeds => "feeds",
            Self::Alerts => "alerts",
        }
    }
}

impl PollConfig {
    /// Settings for `view`, honoring `auto_refresh`.
    pub fn settings_for(&self, view: PolledView) -> PollSettings {
        let period = match view {
            PolledView::Dashboard => self.dashboard_interval,
            PolledView::Feeds => self.feeds_interval,
            PolledView::Alerts => self.alerts_interval,
        };
        PollSettings {
            interval: self.auto_refresh.then_some(period),
            timeout: self.request_timeout,
            retry: self.retry,
        }
    }
}

/// Handle to a running poller. Dropping it cancels the task.
#[derive(Debug)]
pub struct PollGuard {
    name: &'static str,
    token: CancellationToken,
    refresh: Arc<Notify>,
    _drop: DropGuard,
}

impl PollGuard {
    /// Trigger an immediate fetch outside the regular schedule.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Spawn a poller for `fetch`, delivering each cycle's outcome to `deliver`.
///
/// The task stops when `parent` or the returned guard is cancelled, when the
/// guard is dropped, or when `deliver` returns `false` (receiver gone).
pub fn spawn_poller<T, F, Fut, D>(
    name: &'static str,
    settings: PollSettings,
    parent: &CancellationToken,
    fetch: F,
    mut deliver: D,
) -> PollGuard
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    D: FnMut(PollUpdate<T>) -> bool + Send + 'static,
{
    let token = parent.child_token();
    let refresh = Arc::new(Notify::new());

    let cancel = token.clone();
    let notified = Arc::clone(&refresh);
    tokio::spawn(async move {
        debug!(poller = name, interval = ?settings.interval, "poller started");
        let mut ticker = settings.interval.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        // Immediate first fetch, then on schedule.
        let mut due = true;
        loop {
            if due {
                let Some(update) = run_cycle(name, &fetch, &settings, &cancel).await else {
                    break;
                };
                if !deliver(update) {
                    break;
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = notified.notified() => due = true,
                () = next_tick(ticker.as_mut()) => due = true,
            }
        }
        debug!(poller = name, "poller stopped");
    });

    PollGuard {
        name,
        token: token.clone(),
        refresh,
        _drop: token.drop_guard(),
    }
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// One fetch with bounded retry of transient errors.
/// Returns `None` if cancelled mid-cycle.
async fn run_cycle<T, F, Fut>(
    name: &'static str,
    fetch: &F,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Option<PollUpdate<T>>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let seq = next_sequence();
    let retry = settings.retry;
    let mut attempt: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return None,
            result = tokio::time::timeout(settings.timeout, fetch()) => {
                result.unwrap_or_else(|_| Err(CoreError::Timeout {
                    operation: name.to_owned(),
                    timeout_ms: u64::try_from(settings.timeout.as_millis()).unwrap_or(u64::MAX),
                }))
            }
        };
        attempt += 1;

        match result {
            Ok(data) => return Some(PollUpdate::Loaded { seq, data }),
            Err(error) if error.is_transient() && attempt <= retry.max_retries => {
                let delay = retry.delay_for(attempt);
                warn!(poller = name, %error, attempt, ?delay, "transient fetch failure, retrying");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return None,
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(error) => {
                warn!(poller = name, %error, attempts = attempt, "fetch failed");
                return Some(PollUpdate::Failed {
                    seq,
                    error,
                    attempts: attempt,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use tokio::sync::mpsc;

    fn settings(interval_secs: u64) -> PollSettings {
        PollSettings {
            interval: Some(Duration::from_secs(interval_secs)),
            timeout: Duration::from_secs(300),
            retry: RetryPolicy::default(),
        }
    }

    fn channel<T: Send + 'static>() -> (
        impl FnMut(PollUpdate<T>) -> bool + Send + 'static,
        mpsc::UnboundedReceiver<PollUpdate<T>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (move |update| tx.send(update).is_ok(), rx)
    }

    fn counting_fetch(
        calls: &Arc<AtomicU32>,
    ) -> impl Fn() -> std::future::Ready<Result<u32, CoreError>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || std::future::ready(Ok(calls.fetch_add(1, Ordering::SeqCst) + 1))
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_on_interval() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let (deliver, mut rx) = channel();
        let _guard = spawn_poller("test", settings(30), &root, counting_fetch(&calls), deliver);

        let first = rx.recv().await.expect("first update");
        assert!(matches!(first, PollUpdate::Loaded { data: 1, .. }));

        let start = Instant::now();
        let second = rx.recv().await.expect("second update");
        assert!(matches!(second, PollUpdate::Loaded { data: 2, .. }));
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(second.seq() > first.seq());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_stops_polling() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let (deliver, mut rx) = channel();
        let guard = spawn_poller("test", settings(15), &root, counting_fetch(&calls), deliver);

        rx.recv().await.expect("first update");
        drop(guard);
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn parent_cancellation_stops_polling() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let (deliver, mut rx) = channel();
        let guard = spawn_poller("test", settings(15), &root, counting_fetch(&calls), deliver);

        rx.recv().await.expect("first update");
        root.cancel();
        assert!(guard.is_cancelled());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_triggers_an_extra_fetch() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let (deliver, mut rx) = channel();
        let guard = spawn_poller(
            "test",
            PollSettings {
                interval: None,
                ..settings(0)
            },
            &root,
            counting_fetch(&calls),
            deliver,
        );

        rx.recv().await.expect("first update");
        guard.refresh();
        let update = rx.recv().await.expect("refreshed update");
        assert!(matches!(update, PollUpdate::Loaded { data: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_retry_until_exhausted() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err::<(), _>(CoreError::Unavailable {
                message: "down".into(),
            }))
        };
        let (deliver, mut rx) = channel();
        let _guard = spawn_poller("test", settings(60), &root, fetch, deliver);

        let start = Instant::now();
        let update = rx.recv().await.expect("failure update");
        match update {
            PollUpdate::Failed { attempts, error, .. } => {
                assert_eq!(attempts, 4);
                assert!(error.is_transient());
            }
            PollUpdate::Loaded { .. } => panic!("expected failure"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 500ms + 1s + 2s of backoff
        assert!(start.elapsed() >= Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_then_success() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if n == 0 {
                Err(CoreError::Timeout {
                    operation: "get_alerts".into(),
                    timeout_ms: 300,
                })
            } else {
                Ok(n)
            })
        };
        let (deliver, mut rx) = channel();
        let _guard = spawn_poller("test", settings(60), &root, fetch, deliver);

        let update = rx.recv().await.expect("update");
        assert!(matches!(update, PollUpdate::Loaded { data: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failures_are_not_retried() {
        let root = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err::<(), _>(CoreError::Internal("bad payload".into())))
        };
        let (deliver, mut rx) = channel();
        let _guard = spawn_poller("test", settings(60), &root, fetch, deliver);

        let update = rx.recv().await.expect("failure update");
        assert!(matches!(update, PollUpdate::Failed { attempts: 1, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_time_out_as_transient() {
        let root = CancellationToken::new();
        let fetch = || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<u32, CoreError>(0)
        };
        let (deliver, mut rx) = channel();
        let _guard = spawn_poller(
            "slow",
            PollSettings {
                timeout: Duration::from_secs(1),
                retry: RetryPolicy {
                    max_retries: 1,
                    ..RetryPolicy::default()
                },
                ..settings(60)
            },
            &root,
            fetch,
            deliver,
        );

        match rx.recv().await.expect("update") {
            PollUpdate::Failed {
                error, attempts, ..
            } => {
                assert_eq!(attempts, 2);
                assert_eq!(
                    error,
                    CoreError::Timeout {
                        operation: "slow".into(),
                        timeout_ms: 1000,
                    }
                );
            }
            PollUpdate::Loaded { .. } => panic!("expected timeout"),
        }
    }

    #[test]
    fn view_intervals() {
        let config = PollConfig::default();
        assert_eq!(
            config.settings_for(PolledView::Alerts).interval,
            Some(Duration::from_secs(15))
        );
        assert_eq!(
            config.settings_for(PolledView::Dashboard).interval,
            Some(Duration::from_secs(30))
        );

        let manual = PollConfig {
            auto_refresh: false,
            ..PollConfig::default()
        };
        assert_eq!(manual.settings_for(PolledView::Feeds).interval, None);
    }

    #[test]
    fn map_preserves_sequence() {
        let update = PollUpdate::Loaded { seq: 9, data: 2 }.map(|n| n * 10);
        assert_eq!(update, PollUpdate::Loaded { seq: 9, data: 20 });
    }
}
