use tokio::sync::mpsc::UnboundedSender;
use toneshift_core::GenerationError;

#[derive(Debug)]
pub(crate) enum AppEvent {
    /// Outcome of the single in-flight generation request.
    GenerationComplete(Result<String, GenerationError>),

    /// The two-second "copied" acknowledgment window elapsed. `seq` echoes
    /// the copy action it belongs to so a newer copy is not cleared early.
    CopyAckExpired { seq: u64 },
}

#[derive(Clone, Debug)]
pub(crate) struct AppEventSender {
    tx: UnboundedSender<AppEvent>,
}

impl AppEventSender {
    pub(crate) fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    pub(crate) fn send(&self, event: AppEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::error!("event receiver dropped: {err}");
        }
    }
}
