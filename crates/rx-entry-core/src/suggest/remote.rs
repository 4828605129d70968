//! Remote candidate search.
//!
//! The provider is an external collaborator. Requests carry the token they
//! were issued under; responses echo it back so the engine can drop stale
//! ones.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::CandidateRecord;

use super::normalize_name;

/// Remote search errors. Never surfaced past the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteSearchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Search unavailable: {0}")]
    Unavailable(String),
}

pub type RemoteSearchResult<T> = Result<T, RemoteSearchError>;

/// A search the engine wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub token: u64,
    /// Normalized query text
    pub query: String,
}

/// The outcome of a [`RemoteRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub token: u64,
    pub outcome: RemoteSearchResult<Vec<CandidateRecord>>,
}

/// A name search backed by some remote catalogue.
pub trait RemoteSearch: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = RemoteSearchResult<Vec<CandidateRecord>>> + Send;
}

/// Substring search over a fixed list, for hosts without a remote catalogue.
#[derive(Debug, Clone, Default)]
pub struct InMemorySearch {
    records: Vec<CandidateRecord>,
}

impl InMemorySearch {
    pub fn new(records: Vec<CandidateRecord>) -> Self {
        Self { records }
    }

    fn matching(&self, query: &str) -> Vec<CandidateRecord> {
        let query = normalize_name(query);
        self.records
            .iter()
            .filter(|r| normalize_name(&r.name).contains(&query))
            .cloned()
            .collect()
    }
}

impl RemoteSearch for InMemorySearch {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = RemoteSearchResult<Vec<CandidateRecord>>> + Send {
        let results = self.matching(query);
        async move { Ok(results) }
    }
}

/// Runs requests on the tokio runtime and reports completions in arrival
/// order.
///
/// In-flight searches are never cancelled; a superseded one still completes
/// and is dropped by the engine's token check.
pub struct SearchDispatcher<P> {
    provider: Arc<P>,
    completions: mpsc::UnboundedSender<RemoteResponse>,
}

impl<P> SearchDispatcher<P>
where
    P: RemoteSearch + 'static,
{
    /// Create a dispatcher and the receiver its completions arrive on.
    pub fn new(provider: Arc<P>) -> (Self, mpsc::UnboundedReceiver<RemoteResponse>) {
        let (completions, rx) = mpsc::unbounded_channel();
        (
            Self {
                provider,
                completions,
            },
            rx,
        )
    }

    /// Spawn the search for `request`.
    pub fn dispatch(&self, request: RemoteRequest) -> JoinHandle<()> {
        let provider = Arc::clone(&self.provider);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = provider.search(&request.query).await;
            let response = RemoteResponse {
                token: request.token,
                outcome,
            };
            if completions.send(response).is_err() {
                debug!(token = request.token, "search completed after receiver closed");
            }
        })
    }
}
