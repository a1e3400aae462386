//! Shutdown notification channel.

use tokio::sync::broadcast;

/// Coordinator for the drain trigger.
///
/// The signal listener (or a test) calls [`Shutdown::trigger`]; the
/// controller waits on a receiver obtained from [`Shutdown::subscribe`].
/// Subscribe before registering so a trigger arriving mid-registration is
/// not lost.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown notification.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every subscriber.
    pub fn trigger(&self) {
        let receivers = self.tx.send(()).unwrap_or(0);
        tracing::debug!(receivers, "Shutdown triggered");
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Park until a shutdown notification arrives.
///
/// A closed channel means nobody can trigger shutdown any more, which is
/// treated the same as a trigger.
pub async fn wait_for_shutdown(rx: &mut broadcast::Receiver<()>) {
    match rx.recv().await {
        Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        Err(broadcast::error::RecvError::Closed) => {
            tracing::debug!("Shutdown channel closed");
        }
    }
}
