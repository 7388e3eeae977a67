//! Stop signal shared by the HTTP server and every open log session.

use tokio_util::sync::CancellationToken;

/// Cloneable stop handle. Each websocket session waits on it and closes its
/// socket once [`trigger`](Shutdown::trigger) fires.
///
/// The signal is latched: tasks that start waiting after the trigger resolve
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the stop signal. Later calls are no-ops.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`trigger`](Self::trigger) has been called, including
    /// when it was called before this future was created.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }
}
