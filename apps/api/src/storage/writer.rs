use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

use super::ResumeRepository;
use crate::models::resume::ResumeDocument;

enum WriteRequest {
    Save {
        user_id: String,
        document: ResumeDocument,
    },
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget write-through for resume snapshots.
///
/// Each enqueued snapshot is written by a single background task in the order
/// it was enqueued; nothing is coalesced. Failures are logged and dropped.
#[derive(Clone)]
pub struct WriteBehind {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl WriteBehind {
    /// Starts the writer task. Must be called from within a tokio runtime.
    pub fn spawn(repo: ResumeRepository) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                match request {
                    WriteRequest::Save { user_id, document } => {
                        if let Err(e) = repo.save(&user_id, &document).await {
                            error!(user_id, "Failed to persist resume: {e}");
                        }
                    }
                    WriteRequest::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    pub fn enqueue(&self, user_id: &str, document: ResumeDocument) {
        let request = WriteRequest::Save {
            user_id: user_id.to_string(),
            document,
        };
        if self.tx.send(request).is_err() {
            warn!(user_id, "Resume writer has stopped; snapshot dropped");
        }
    }

    /// Resolves once every write enqueued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteRequest::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}
