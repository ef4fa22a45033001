//! Trigger coalescing.

use std::time::Duration;

use tokio::sync::mpsc;

/// Sending half of a [`Debouncer`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DebounceTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl DebounceTrigger {
    /// Request a run. Silently ignored once the debouncer is gone.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

/// Collapses bursts of triggers into one run after a quiet window.
#[derive(Debug)]
pub struct Debouncer {
    rx: mpsc::UnboundedReceiver<()>,
    quiet: Duration,
    pending: usize,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> (DebounceTrigger, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (DebounceTrigger { tx }, Self { rx, quiet, pending: 0 })
    }

    /// Wait for a trigger, then until no further trigger arrives for the
    /// quiet window. Returns the number of coalesced triggers, or `None`
    /// once every trigger handle is dropped and nothing is queued.
    ///
    /// Cancel safe: triggers received by a dropped call are counted by the
    /// next one.
    pub async fn next(&mut self) -> Option<usize> {
        if self.pending == 0 {
            self.rx.recv().await?;
            self.pending = 1;
        }

        loop {
            match tokio::time::timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(())) => self.pending += 1,
                Ok(None) | Err(_) => return Some(std::mem::take(&mut self.pending)),
            }
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_coalesced() {
        let (trigger, mut debouncer) = Debouncer::new(Duration::from_millis(300));

        for _ in 0..5 {
            trigger.trigger();
        }

        let start = Instant::now();
        assert_eq!(debouncer.next().await, Some(5));
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_triggers_inside_window_extend_it() {
        let (trigger, mut debouncer) = Debouncer::new(Duration::from_millis(300));

        let feeder = tokio::spawn(async move {
            for _ in 0..3 {
                trigger.trigger();
                sleep(Duration::from_millis(200)).await;
            }
            // keep the sender alive past the window
            sleep(Duration::from_secs(5)).await;
        });

        let start = Instant::now();
        assert_eq!(debouncer.next().await, Some(3));
        // last trigger at 400ms + 300ms quiet
        assert!(start.elapsed() >= Duration::from_millis(700));
        feeder.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_are_separate_runs() {
        let (trigger, mut debouncer) = Debouncer::new(Duration::from_millis(100));

        trigger.trigger();
        assert_eq!(debouncer.next().await, Some(1));

        trigger.trigger();
        trigger.trigger();
        assert_eq!(debouncer.next().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_wait_keeps_count() {
        let (trigger, mut debouncer) = Debouncer::new(Duration::from_millis(300));
        trigger.trigger();
        trigger.trigger();

        let interrupted = tokio::time::timeout(Duration::from_millis(100), debouncer.next()).await;
        assert!(interrupted.is_err());

        trigger.trigger();
        assert_eq!(debouncer.next().await, Some(3));
    }

    #[tokio::test]
    async fn test_closed_after_senders_dropped() {
        let (trigger, mut debouncer) = Debouncer::new(Duration::from_millis(10));
        trigger.trigger();
        drop(trigger);

        assert_eq!(debouncer.next().await, Some(1));
        assert_eq!(debouncer.next().await, None);
    }
}
