// Countdown ticking for timed draft turns.
//
// The controller owns a spawned task that forwards one tick per second to
// the application loop over an mpsc channel. `disarm` aborts the task, so
// no new tick fires after it returns; a tick already queued in the channel
// is neutralized by the run's own phase check. Dropping the controller
// disarms it.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Cadence of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A single countdown tick delivered to the application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick;

/// Owns the repeating tick task for a draft run.
#[derive(Debug)]
pub struct TimerController {
    tick_tx: mpsc::Sender<TimerTick>,
    task: Option<JoinHandle<()>>,
}

impl TimerController {
    /// Create a disarmed controller that will deliver ticks through
    /// `tick_tx` once armed.
    pub fn new(tick_tx: mpsc::Sender<TimerTick>) -> Self {
        TimerController {
            tick_tx,
            task: None,
        }
    }

    /// Whether a tick task is currently scheduled.
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Start the tick task, replacing any previous one. The first tick
    /// arrives one full interval after arming.
    pub fn arm(&mut self) {
        self.disarm();
        let tx = self.tick_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            // The first interval tick completes immediately; consume it so
            // the countdown runs a full second before the first delivery.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(TimerTick).await.is_err() {
                    break;
                }
            }
        }));
        debug!("timer armed");
    }

    /// Stop the tick task. No further tick fires after this returns.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("timer disarmed");
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.disarm();
    }
}
