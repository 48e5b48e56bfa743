// ── Background poller ──
//
// A cancellable repeating timer. One tick runs at a time; ticks missed
// while a slow one is in flight are skipped rather than queued.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Start calling `tick` every `period`, first after one full period.
    ///
    /// The poller stops when either [`stop`](Self::stop) is called or
    /// `parent` is cancelled.
    pub(crate) fn spawn<F, Fut>(period: Duration, parent: &CancellationToken, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = parent.child_token();
        let token = cancel.clone();
        debug!(period_ms = period.as_millis(), "starting poller");

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    () = tick() => {}
                }
            }
            debug!("poller stopped");
        });

        Self { cancel, handle }
    }

    /// Cancel the timer and wait for the task to exit. No tick starts or
    /// finishes after this returns.
    pub(crate) async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}
