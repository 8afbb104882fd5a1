//! Cancellable one-second tick source.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Default spacing between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a spawned repeating tick task.
///
/// The task is aborted when the handle is dropped, so a handle going out
/// of scope on any exit path stops the ticks.
#[derive(Debug)]
pub struct TickHandle {
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Spawn a task that sends `()` on `tx` every `period`, starting one
    /// period from now. Must be called inside a tokio runtime.
    pub fn spawn(period: Duration, tx: mpsc::Sender<()>) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { task }
    }

}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (tx, mut rx) = mpsc::channel(1);
        let start = Instant::now();
        let _handle = TickHandle::spawn(TICK_PERIOD, tx);

        rx.recv().await.unwrap();
        let first = start.elapsed();
        assert!(first >= TICK_PERIOD && first < TICK_PERIOD * 2);
        rx.recv().await.unwrap();
        assert!(start.elapsed() >= TICK_PERIOD * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = TickHandle::spawn(TICK_PERIOD, tx);
        drop(handle);
        assert!(rx.recv().await.is_none());
    }
}
