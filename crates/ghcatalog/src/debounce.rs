//! Trailing-edge debouncing on the tokio timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Collapses bursts of calls into one delayed delivery of the last value.
///
/// Every [`call`](Self::call) aborts the pending timer and starts a new one,
/// so the target only runs once the input has been quiet for `delay`. The
/// pending timer is aborted on [`cancel`](Self::cancel) and on drop.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    target: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, target: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            target: Arc::new(target),
            pending: None,
        }
    }

    /// Schedule `value` for delivery, replacing whatever was pending.
    pub fn call(&mut self, value: T) {
        self.cancel();

        let target = Arc::clone(&self.target);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            target(value);
        }));
    }

    /// Drop the pending delivery, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a delivery is scheduled and has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recording(delay: Duration) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(delay, move |v| {
            sink.lock().expect("lock").push(v);
        });
        (debouncer, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_value_of_a_burst_is_delivered() {
        let (mut debouncer, seen) = recording(Duration::from_millis(300));

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(3);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(seen.lock().expect("lock").is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*seen.lock().expect("lock"), vec![3]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_quiet_period_each_fire() {
        let (mut debouncer, seen) = recording(Duration::from_millis(50));

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(*seen.lock().expect("lock"), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_delivery() {
        let (mut debouncer, seen) = recording(Duration::from_millis(50));

        debouncer.call(7);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_delivery() {
        let (mut debouncer, seen) = recording(Duration::from_millis(50));

        debouncer.call(9);
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(seen.lock().expect("lock").is_empty());
    }
}
