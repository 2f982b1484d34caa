//! Periodic push of buffered build outcomes to every open connection.
//!
//! One loop serves all connections: each tick drains the buffers once and
//! fans the result out, so every client sees every signal.

use crate::dev::buffers::TickSignal;
use crate::dev::message::ReloadMessage;
use crate::dev::state::{BroadcastReport, SharedState};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Drains the reload buffers on a fixed interval.
pub struct Broadcaster {
    state: SharedState,
    interval: Duration,
}

impl Broadcaster {
    pub fn new(state: SharedState, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// Messages one tick sends, in order.
    ///
    /// Errors first, else a refresh, then always one heartbeat.
    pub fn messages_for(signal: TickSignal) -> Vec<ReloadMessage> {
        let mut messages = match signal {
            TickSignal::Idle => Vec::new(),
            TickSignal::Errors(errors) => errors.into_iter().map(ReloadMessage::Error).collect(),
            TickSignal::Refresh => vec![ReloadMessage::Refresh],
        };
        messages.push(ReloadMessage::Heartbeat);
        messages
    }

    /// Run one tick immediately.
    pub fn tick(&self) -> BroadcastReport {
        let signal = self.state.buffers.take_tick();

        match &signal {
            TickSignal::Errors(errors) => tracing::info!(
                "Sending {} build error(s) to {} client(s)",
                errors.len(),
                self.state.client_count()
            ),
            TickSignal::Refresh => tracing::info!(
                "Refreshing {} client(s)",
                self.state.client_count()
            ),
            TickSignal::Idle => {}
        }

        self.state.clients.broadcast(&Self::messages_for(signal))
    }

    /// Tick every interval until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = &mut shutdown => {
                    tracing::debug!("Broadcaster stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::message::EncodedError;
    use crate::dev::state::DevState;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::mpsc::Receiver;

    fn setup() -> (Broadcaster, SharedState) {
        let state = Arc::new(DevState::new(64));
        let broadcaster = Broadcaster::new(Arc::clone(&state), Duration::from_millis(250));
        (broadcaster, state)
    }

    fn queued(rx: &mut Receiver<ReloadMessage>) -> Vec<ReloadMessage> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[tokio::test]
    async fn test_change_refreshes_every_client_once() {
        let (broadcaster, state) = setup();
        let (_a, mut rx_a) = state.clients.register();
        let (_b, mut rx_b) = state.clients.register();

        state.buffers.record(PathBuf::from("/assets/app.js"), None);
        broadcaster.tick();
        broadcaster.tick();

        for rx in [&mut rx_a, &mut rx_b] {
            let messages = queued(rx);
            let refreshes = messages
                .iter()
                .filter(|m| **m == ReloadMessage::Refresh)
                .count();
            assert_eq!(refreshes, 1);
            assert_eq!(messages[0], ReloadMessage::Refresh);
        }
    }

    #[tokio::test]
    async fn test_idle_ticks_send_heartbeats() {
        let (broadcaster, state) = setup();
        let (_id, mut rx) = state.clients.register();

        for _ in 0..5 {
            broadcaster.tick();
        }

        let messages = queued(&mut rx);
        assert_eq!(messages.len(), 5);
        assert!(messages.iter().all(ReloadMessage::is_heartbeat));
    }

    #[tokio::test]
    async fn test_errors_suppress_refresh() {
        let (broadcaster, state) = setup();
        let (_id, mut rx) = state.clients.register();

        let error = EncodedError::encode("[ERROR] unexpected token");
        state
            .buffers
            .record(PathBuf::from("/assets/app.js"), Some(error.clone()));
        broadcaster.tick();

        assert_eq!(
            queued(&mut rx),
            vec![ReloadMessage::Error(error), ReloadMessage::Heartbeat]
        );
    }

    #[tokio::test]
    async fn test_disconnected_client_is_removed_on_next_tick() {
        let (broadcaster, state) = setup();
        let (gone, rx_gone) = state.clients.register();
        let (_kept, mut rx_kept) = state.clients.register();
        drop(rx_gone);

        let report = broadcaster.tick();
        assert_eq!(report.dropped, vec![gone]);
        assert_eq!(state.client_count(), 1);

        state.buffers.record(PathBuf::from("/assets/site.scss"), None);
        broadcaster.tick();
        assert!(queued(&mut rx_kept).contains(&ReloadMessage::Refresh));
    }

    #[tokio::test]
    async fn test_buffers_drained_without_clients() {
        let (broadcaster, state) = setup();
        state.buffers.record(PathBuf::from("/assets/app.js"), None);

        let report = broadcaster.tick();
        assert_eq!(report.delivered, 0);
        assert!(!state.buffers.has_changes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_until_shutdown() {
        let (broadcaster, state) = setup();
        let (_id, mut rx) = state.clients.register();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(broadcaster.run(async move {
            let _ = stop_rx.await;
        }));

        // First tick fires immediately, then one every 250ms.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        stop_tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(queued(&mut rx).len(), 5);
    }
}
