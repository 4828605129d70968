//! Out-of-order remote completions and the full entry flow.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rx_entry_core::config::EngineConfig;
use rx_entry_core::models::CandidateRecord;
use rx_entry_core::session::{CommitOutcome, EntryField, Key, KeyOutcome, KeyPress};
use rx_entry_core::suggest::{
    CandidateIndex, RemoteSearch, RemoteSearchError, RemoteSearchResult, SearchDispatcher,
    SuggestionEngine,
};

/// Answers each known query after a fixed delay.
struct DelayedSearch {
    responses: HashMap<String, (Duration, Vec<CandidateRecord>)>,
}

impl DelayedSearch {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn respond(mut self, query: &str, delay_ms: u64, names: &[&str]) -> Self {
        let records = names.iter().map(|n| CandidateRecord::new(*n)).collect();
        self.responses
            .insert(query.to_string(), (Duration::from_millis(delay_ms), records));
        self
    }
}

impl RemoteSearch for DelayedSearch {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = RemoteSearchResult<Vec<CandidateRecord>>> + Send {
        let response = self.responses.get(query).cloned();
        let query = query.to_string();
        async move {
            match response {
                Some((delay, records)) => {
                    tokio::time::sleep(delay).await;
                    Ok(records)
                }
                None => Err(RemoteSearchError::Unavailable(query)),
            }
        }
    }
}

fn engine() -> SuggestionEngine {
    SuggestionEngine::new(&EngineConfig::default(), CandidateIndex::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_late_superseded_response_is_dropped() {
    let provider = DelayedSearch::new()
        .respond("para", 500, &["Paradox"])
        .respond("parac", 10, &["Paracetamol"]);
    let (dispatcher, mut completions) = SearchDispatcher::new(Arc::new(provider));
    let mut engine = engine();
    let t0 = Instant::now();

    engine.set_query("para", t0);
    let first = engine.poll(t0 + Duration::from_millis(250)).unwrap();
    dispatcher.dispatch(first.clone());

    engine.set_query("parac", t0 + Duration::from_millis(300));
    let second = engine.poll(t0 + Duration::from_millis(550)).unwrap();
    assert!(second.token > first.token);
    dispatcher.dispatch(second.clone());

    // fast second search arrives first
    let arrived = completions.recv().await.unwrap();
    assert_eq!(arrived.token, second.token);
    assert!(engine.complete(arrived));

    let arrived = completions.recv().await.unwrap();
    assert_eq!(arrived.token, first.token);
    assert!(!engine.complete(arrived));

    assert_eq!(engine.remote_results().len(), 1);
    assert_eq!(engine.hint_text(), "Paracetamol");
    assert!(!engine.is_searching());
}

#[tokio::test(start_paused = true)]
async fn test_early_superseded_response_is_dropped() {
    let provider = DelayedSearch::new()
        .respond("para", 10, &["Paradox"])
        .respond("parac", 500, &["Paracetamol"]);
    let (dispatcher, mut completions) = SearchDispatcher::new(Arc::new(provider));
    let mut engine = engine();
    let t0 = Instant::now();

    engine.set_query("para", t0);
    dispatcher.dispatch(engine.poll(t0 + Duration::from_millis(250)).unwrap());
    engine.set_query("parac", t0 + Duration::from_millis(255));
    dispatcher.dispatch(engine.poll(t0 + Duration::from_millis(505)).unwrap());

    // stale first search lands while the second is in flight
    assert!(!engine.complete(completions.recv().await.unwrap()));
    assert!(engine.is_searching());
    assert!(engine.remote_results().is_empty());

    assert!(engine.complete(completions.recv().await.unwrap()));
    assert_eq!(engine.hint_text(), "Paracetamol");
}

#[tokio::test(start_paused = true)]
async fn test_failed_search_falls_back_to_local() {
    let local = CandidateIndex::new(vec![CandidateRecord::new("Metformin")]);
    let mut engine = SuggestionEngine::new(&EngineConfig::default(), local).unwrap();
    let (dispatcher, mut completions) = SearchDispatcher::new(Arc::new(DelayedSearch::new()));
    let t0 = Instant::now();

    engine.set_query("metf", t0);
    dispatcher.dispatch(engine.poll(t0 + Duration::from_millis(250)).unwrap());

    let response = completions.recv().await.unwrap();
    assert!(response.outcome.is_err());
    assert!(engine.complete(response));
    assert!(engine.remote_results().is_empty());
    assert_eq!(engine.hint_text(), "Metformin");
}

#[test]
fn test_hint_accept_commit_flow() {
    let local = CandidateIndex::from_json(
        r#"[{"name":"Paracetamol","strength":"650 mg","frequency":"bd","duration":"5 days","when":"After food"}]"#,
    )
    .unwrap();
    let mut field = EntryField::new(&EngineConfig::default(), local).unwrap();
    let now = Instant::now();

    field.set_query("Para", now);
    assert_eq!(field.ghost_suffix(), "cetamol • 650 mg • bd • 5 days • After food");

    let accepted = field.press_key(KeyPress::new(Key::ArrowRight, 4), now);
    assert!(matches!(accepted, KeyOutcome::HintAccepted { .. }));

    let committed = field.press_key(KeyPress::new(Key::Enter, 0), now);
    assert!(matches!(
        committed,
        KeyOutcome::Committed(CommitOutcome::Added { .. })
    ));
    assert_eq!(field.query(), "");

    let entry = &field.entries().as_slice()[0];
    assert_eq!(entry.name, "Paracetamol");
    assert_eq!(entry.strength, "650 mg");
    assert_eq!(entry.frequency.as_str(), "1-0-1");
    assert_eq!(entry.timing, "After food");
    assert!(!entry.is_pediatric());
    assert_eq!(
        entry.summary(),
        "Strength: 650 mg | Freq: 1-0-1 | Duration: 5 days | When: After food"
    );
}
