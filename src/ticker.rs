// File: ./src/ticker.rs
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Spawns the wall-clock pulse used to re-evaluate "has finished" state.
///
/// Sends the current time immediately, then once per `period`. The task ends
/// on its own once the receiver is dropped.
pub fn spawn_ticker(period: Duration) -> (mpsc::Receiver<DateTime<Utc>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(4);

    let handle = tokio::spawn(async move {
        let mut ticks = interval(period);
        // A late tick is still just "now"; don't replay the ones we missed.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticks.tick().await;
            if tx.send(Utc::now()).await.is_err() {
                log::debug!("Tick receiver closed, stopping ticker");
                break;
            }
        }
    });

    (rx, handle)
}
