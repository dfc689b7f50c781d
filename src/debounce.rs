//! Debounced input scheduling.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Delays a callback until calls have been quiet for `delay`.
///
/// Each [`call`](Debouncer::call) cancels the pending timer and starts a new
/// one carrying only the latest value: at most one timer is pending at any
/// time, and earlier values are dropped rather than queued.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Wraps `callback` with a quiet period of `delay`.
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Returns the quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules the callback with `value`, replacing any pending call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call(&mut self, value: T) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            callback(value);
        }));
    }

    /// Drops the pending call, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a call is waiting for its quiet period to end.
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
    use super::*;
    use tokio::sync::mpsc;

    fn recorder() -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(300), move |value: String| {
            let _ = tx.send(value);
        });
        (debouncer, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(value) = rx.try_recv() {
            out.push(value);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let (mut debouncer, mut rx) = recorder();
        for text in ["c", "ca", "cat", "cata"] {
            debouncer.call(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(drain(&mut rx).is_empty());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(drain(&mut rx), vec!["cata".to_string()]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_fire_separately() {
        let (mut debouncer, mut rx) = recorder();
        debouncer.call("ab".to_string());
        sleep(Duration::from_millis(350)).await;
        debouncer.call("abc".to_string());
        sleep(Duration::from_millis(350)).await;
        assert_eq!(drain(&mut rx), vec!["ab".to_string(), "abc".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_delay() {
        let (mut debouncer, mut rx) = recorder();
        debouncer.call("ab".to_string());
        sleep(Duration::from_millis(299)).await;
        assert!(drain(&mut rx).is_empty());
        assert!(debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (mut debouncer, mut rx) = recorder();
        debouncer.call("ab".to_string());
        debouncer.cancel();
        sleep(Duration::from_millis(500)).await;
        assert!(drain(&mut rx).is_empty());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_delay_accessor() {
        let debouncer: Debouncer<()> = Debouncer::new(Duration::from_millis(300), |_| {});
        assert_eq!(debouncer.delay(), Duration::from_millis(300));
    }
}
