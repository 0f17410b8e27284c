//! Background task that debounces change requests.
//!
//! Requests go in through [`CommitLoop::submit`]; debounced commits come out
//! of [`CommitLoop::next_commit`] in the order they became due. Closing the
//! input flushes whatever is still pending.

use crate::debounce::EditBuffer;
use crate::errors::EditError;
use folio_model::ChangeRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Handle to a running commit loop
pub struct CommitLoop {
    input: mpsc::Sender<ChangeRequest>,
    commits: mpsc::Receiver<ChangeRequest>,
    task: JoinHandle<()>,
}

/// Start a commit loop on the current tokio runtime
pub fn spawn_commit_loop(window: Duration) -> CommitLoop {
    let (input, requests) = mpsc::channel(CHANNEL_CAPACITY);
    let (output, commits) = mpsc::channel(CHANNEL_CAPACITY);
    let task = tokio::spawn(run(EditBuffer::new(window), requests, output));

    CommitLoop {
        input,
        commits,
        task,
    }
}

impl CommitLoop {
    pub async fn submit(&self, request: ChangeRequest) -> Result<(), EditError> {
        self.input
            .send(request)
            .await
            .map_err(|_| EditError::LoopClosed)
    }

    /// Next committed request; `None` once the loop has finished
    pub async fn next_commit(&mut self) -> Option<ChangeRequest> {
        self.commits.recv().await
    }

    /// Close the input and collect the remaining commits
    pub async fn shutdown(self) -> Vec<ChangeRequest> {
        let CommitLoop {
            input,
            mut commits,
            task,
        } = self;
        drop(input);

        let mut remaining = Vec::new();
        while let Some(request) = commits.recv().await {
            remaining.push(request);
        }
        if let Err(error) = task.await {
            warn!(%error, "Commit loop task failed");
        }
        remaining
    }
}

async fn run(
    mut buffer: EditBuffer,
    mut requests: mpsc::Receiver<ChangeRequest>,
    output: mpsc::Sender<ChangeRequest>,
) {
    loop {
        let wake = buffer.next_deadline().map(Instant::from_std);

        let ready = tokio::select! {
            received = requests.recv() => match received {
                Some(request) => buffer
                    .push(request, Instant::now().into_std())
                    .into_iter()
                    .collect(),
                None => {
                    debug!(pending = buffer.len(), "Input closed, flushing pending edits");
                    let pending = buffer.flush();
                    emit(&output, pending).await;
                    return;
                }
            },
            _ = wait_for(wake) => buffer.poll(Instant::now().into_std()),
        };

        if !emit(&output, ready).await {
            debug!("Commit receiver dropped, stopping loop");
            return;
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Returns `false` when nobody listens anymore
async fn emit(output: &mpsc::Sender<ChangeRequest>, requests: Vec<ChangeRequest>) -> bool {
    for request in requests {
        if output.send(request).await.is_err() {
            return false;
        }
    }
    true
}
