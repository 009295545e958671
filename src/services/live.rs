// Live dashboard: recompute on every pushed roster snapshot.
//
// A snapshot source (a store change feed, a poller) pushes the full company
// list; the listener answers each one with a freshly built dashboard.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::types::Company;

use super::dashboard::{build_dashboard, DashboardView};

/// Channel buffer size for outbound dashboard views
const VIEW_CHANNEL_SIZE: usize = 16;

/// Spawn a task that turns each snapshot into exactly one dashboard view.
///
/// The task ends when the snapshot sender is dropped or the view receiver
/// goes away. Must be called from within a tokio runtime.
pub fn spawn_snapshot_listener<C>(
    mut snapshots: mpsc::Receiver<Vec<Company>>,
    clock: C,
    recent_limit: usize,
) -> mpsc::Receiver<DashboardView>
where
    C: Fn() -> DateTime<Utc> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(VIEW_CHANNEL_SIZE);

    tokio::spawn(async move {
        while let Some(companies) = snapshots.recv().await {
            let view = build_dashboard(&companies, clock(), recent_limit);
            log::debug!("live: recomputed dashboard for {} companies", view.rows.len());
            if tx.send(view).await.is_err() {
                log::info!("live: dashboard receiver dropped, stopping listener");
                return;
            }
        }
        log::info!("live: snapshot source closed, stopping listener");
    });

    rx
}
