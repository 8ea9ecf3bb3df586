//! Debounced callbacks
//!
//! A background task keeps the latest triggered value and runs the callback
//! once the input has been quiet for the configured delay. Every trigger
//! restarts the quiet period; only the final value is delivered.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

enum Command<T> {
    Push(T),
    Cancel,
}

/// Rate-limits a callback to one run per quiet period
///
/// Dropping the debouncer aborts its task; a pending value is discarded.
#[derive(Debug)]
pub struct Debouncer<T: Send + 'static> {
    commands: mpsc::UnboundedSender<Command<T>>,
    task: JoinHandle<()>,
    delay: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task on the current runtime
    ///
    /// # Panics
    /// If called outside a Tokio runtime
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(delay, receiver, callback));
        Self { commands, task, delay }
    }

    /// Record a new value and restart the quiet period
    pub fn trigger(&self, value: T) {
        if self.commands.send(Command::Push(value)).is_err() {
            tracing::debug!("debouncer task gone; value dropped");
        }
    }

    /// Discard the pending value, if any
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }

    /// Configured quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> std::fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(_) => f.write_str("Push"),
            Self::Cancel => f.write_str("Cancel"),
        }
    }
}

async fn run<T, F>(delay: Duration, mut commands: mpsc::UnboundedReceiver<Command<T>>, mut callback: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    let mut deadline = Instant::now();

    loop {
        // Commands first: a queued cancel beats an expired deadline.
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Push(value)) => {
                    pending = Some(value);
                    deadline = Instant::now() + delay;
                }
                Some(Command::Cancel) => pending = None,
                None => break,
            },
            () = sleep_until(deadline), if pending.is_some() => {
                if let Some(value) = pending.take() {
                    callback(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(String) + Send + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        (calls, move |value| sink.lock().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_once_with_final_value() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(250), callback);

        for text in ["p", "pa", "par", "park"] {
            debouncer.trigger(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        assert!(calls.lock().is_empty());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(*calls.lock(), vec!["park".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_run_separately() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(250), callback);

        debouncer.trigger("a".into());
        sleep(Duration::from_millis(400)).await;
        debouncer.trigger("b".into());
        sleep(Duration::from_millis(400)).await;

        assert_eq!(*calls.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(250), callback);

        debouncer.trigger("x".into());
        sleep(Duration::from_millis(100)).await;
        debouncer.cancel();
        sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_cancel_wins_over_expired_deadline() {
        for _ in 0..32 {
            let (calls, callback) = recorder();
            let debouncer = Debouncer::new(Duration::ZERO, callback);

            debouncer.trigger("stale".into());
            debouncer.cancel();
            sleep(Duration::from_millis(10)).await;

            assert!(calls.lock().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_task() {
        let (calls, callback) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(250), callback);

        debouncer.trigger("x".into());
        drop(debouncer);
        sleep(Duration::from_millis(500)).await;

        assert!(calls.lock().is_empty());
    }
}
