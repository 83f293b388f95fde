//! Cancellation of an in-flight completion call.

use tokio_util::sync::CancellationToken;

/// Cloneable handle used to abort a completion call from another task or thread.
///
/// Create one per call and pass it to
/// [`CompletionClient::complete_with_cancel`](super::CompletionClient::complete_with_cancel).
/// Canceling aborts the request currently on the wire; if no request is
/// outstanding the next iteration observes the flag before sending. Canceling
/// after the call returned has no effect.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token for one network request, canceled together with this handle.
    pub(crate) fn request_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}
