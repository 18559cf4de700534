//! Scoped polling tasks.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// A spawned poller that is aborted when the handle is dropped.
///
/// With no interval the tick runs once. Otherwise it runs immediately and
/// then every `interval`; a slow tick delays the next one rather than
/// bunching them up.
#[derive(Debug)]
pub struct PollHandle {
    label: &'static str,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Spawns `tick` on the current tokio runtime.
    pub fn spawn<F, Fut>(label: &'static str, interval: Option<Duration>, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let Some(period) = interval else {
                debug!(poller = label, "single read");
                tick().await;
                return;
            };

            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                debug!(poller = label, "poll tick");
                tick().await;
            }
        });

        Self { label, task }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// True once a single read completed or the task was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting(counter: &Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_ticks_until_dropped() {
        let counter = Arc::new(AtomicU32::new(0));
        let handle = PollHandle::spawn("test", Some(Duration::from_secs(3)), counting(&counter));

        // Immediate tick, then at 3s and 6s.
        tokio::time::sleep(Duration::from_millis(6_500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        drop(handle);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn single_read_runs_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let handle = PollHandle::spawn("once", None, counting(&counter));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
        assert_eq!(handle.label(), "once");
    }
}
