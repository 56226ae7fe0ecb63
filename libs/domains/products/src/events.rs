//! Per-connection ticker behind `GET /products/events`.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::models::ProductEvent;

/// Spacing between events on the public endpoint
pub const EVENT_INTERVAL: Duration = Duration::from_secs(1);

const CHANNEL_CAPACITY: usize = 16;

/// Start a ticker emitting [`ProductEvent`]s numbered from 0, one per `period`.
///
/// The first event arrives one `period` after the call. The task stops as soon
/// as the returned stream is dropped.
pub fn spawn_ticker(period: Duration) -> (ReceiverStream<ProductEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = tokio::spawn(tick(tx, period));
    (ReceiverStream::new(rx), handle)
}

async fn tick(tx: mpsc::Sender<ProductEvent>, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    // A slow reader delays later events instead of receiving a burst.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    for sequence in 0u64.. {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tx.closed() => break,
        }

        if tx.send(ProductEvent::new(sequence)).await.is_err() {
            break;
        }
    }

    debug!("Event stream closed by client, ticker stopped");
}
