//! Status logging background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::{TimerSnapshot, TimerStatus};

/// Background task that logs status transitions published by the controller
///
/// Returns once the controller is dropped and the channel closes.
pub async fn status_log_task(mut updates: watch::Receiver<TimerSnapshot>) {
    info!("Starting status log task");

    let mut last_status = updates.borrow_and_update().status;
    let mut last_total = updates.borrow().total_seconds;

    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();

        if snapshot.status != last_status {
            match snapshot.status {
                TimerStatus::Running => info!("Timer running: {}", snapshot.display),
                TimerStatus::Idle => info!("Timer idle: {}", snapshot.display),
            }
            last_status = snapshot.status;
        } else if snapshot.total_seconds != last_total {
            debug!("Configured duration changed to {}", snapshot.display);
        }
        last_total = snapshot.total_seconds;
    }

    debug!("Timer update channel closed, status log task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::TimerController, tasks::CountdownEngine};

    #[tokio::test]
    async fn exits_when_controller_is_dropped() {
        let timer = TimerController::new(CountdownEngine::default(), None);
        let task = tokio::spawn(status_log_task(timer.subscribe()));

        timer.on_add_time(5, crate::state::TimeUnit::Seconds).unwrap();
        drop(timer);

        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
