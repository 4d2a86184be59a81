use crate::app::{Action, FetchOutcome, FetchRequest, RequestKind, ResponseOrdering, Source};
use crate::tmdb::MovieSource;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Runs fetch requests on background tasks and reports completions as actions.
///
/// One task slot per [`Source`]. Under [`ResponseOrdering::LatestRequest`] a
/// new request aborts the task still running in its slot.
pub struct Fetcher<S: MovieSource> {
    source: S,
    ordering: ResponseOrdering,
    tx: UnboundedSender<Action>,
    in_flight: HashMap<Source, JoinHandle<()>>,
}

impl<S: MovieSource> Fetcher<S> {
    pub fn new(source: S, ordering: ResponseOrdering) -> (Self, UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                source,
                ordering,
                tx,
                in_flight: HashMap::new(),
            },
            rx,
        )
    }

    pub fn spawn_all(&mut self, requests: Vec<FetchRequest>) {
        for request in requests {
            self.spawn(request);
        }
    }

    pub fn spawn(&mut self, request: FetchRequest) {
        let slot = request.source();
        if self.ordering == ResponseOrdering::LatestRequest {
            if let Some(previous) = self.in_flight.remove(&slot) {
                if !previous.is_finished() {
                    tracing::debug!(source = ?slot, "Aborting superseded request");
                    previous.abort();
                }
            }
        }

        let source = self.source.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = match &request.kind {
                RequestKind::Genres => source.genres().await.map(FetchOutcome::Genres),
                RequestKind::Discover(query) => {
                    source.discover(*query).await.map(FetchOutcome::Movies)
                }
                RequestKind::Search(query) => {
                    source.search(query.clone()).await.map(FetchOutcome::Movies)
                }
            };
            let action = match result {
                Ok(outcome) => Action::FetchSucceeded { request, outcome },
                Err(error) => Action::FetchFailed { request, error },
            };
            // The receiver is gone only when the UI loop has exited.
            let _ = tx.send(action);
        });
        self.in_flight.insert(slot, handle);
    }

    /// Abort everything still running.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }
}

impl<S: MovieSource> Drop for Fetcher<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
