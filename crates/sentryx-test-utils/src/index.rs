//! In-memory search index.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use sentryx_ingestion::{BulkItemResult, IndexAction, IndexError, ProjectionRecord, SearchIndex};

/// How the index answers bulk requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkBehaviour {
    /// Accept the request; items listed as rejected fail individually.
    Accept,
    /// Reject the whole request with this HTTP status.
    Reject(u16),
    /// Fail as if the cluster were unreachable.
    Unreachable,
}

#[derive(Default)]
struct Recorded {
    docs: BTreeMap<String, ProjectionRecord>,
    bulk_calls: usize,
    single_calls: usize,
}

/// Stores accepted records by id and counts requests by tier.
pub struct RecordingIndex {
    behaviour: BulkBehaviour,
    reject_ids: HashSet<String>,
    recorded: Mutex<Recorded>,
}

impl RecordingIndex {
    pub fn new(behaviour: BulkBehaviour) -> Self {
        Self { behaviour, reject_ids: HashSet::new(), recorded: Mutex::new(Recorded::default()) }
    }

    pub fn accepting() -> Self {
        Self::new(BulkBehaviour::Accept)
    }

    /// Reject writes of this document in either tier.
    pub fn reject(mut self, id: &str) -> Self {
        self.reject_ids.insert(id.to_string());
        self
    }

    pub fn get(&self, id: &str) -> Option<ProjectionRecord> {
        self.recorded.lock().unwrap().docs.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.recorded.lock().unwrap().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<String> {
        self.recorded.lock().unwrap().docs.keys().cloned().collect()
    }

    pub fn bulk_calls(&self) -> usize {
        self.recorded.lock().unwrap().bulk_calls
    }

    pub fn single_calls(&self) -> usize {
        self.recorded.lock().unwrap().single_calls
    }

    fn store(&self, action: &IndexAction) -> bool {
        if self.reject_ids.contains(&action.id) {
            return false;
        }
        self.recorded.lock().unwrap().docs.insert(action.id.clone(), action.body.clone());
        true
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    async fn bulk(&self, actions: &[IndexAction]) -> Result<Vec<BulkItemResult>, IndexError> {
        self.recorded.lock().unwrap().bulk_calls += 1;
        match self.behaviour {
            BulkBehaviour::Reject(status) => {
                return Err(IndexError::Status { status, body: "bulk rejected".into() });
            }
            BulkBehaviour::Unreachable => {
                return Err(IndexError::Transport("connection refused".into()));
            }
            BulkBehaviour::Accept => {}
        }
        Ok(actions
            .iter()
            .map(|a| {
                if self.store(a) {
                    BulkItemResult::ok(a.id.clone())
                } else {
                    BulkItemResult::failed(a.id.clone(), "document_parsing_exception")
                }
            })
            .collect())
    }

    async fn index_one(&self, action: &IndexAction) -> Result<(), IndexError> {
        self.recorded.lock().unwrap().single_calls += 1;
        if self.behaviour == BulkBehaviour::Unreachable {
            return Err(IndexError::Transport("connection refused".into()));
        }
        if self.store(action) {
            Ok(())
        } else {
            Err(IndexError::Status { status: 400, body: "document_parsing_exception".into() })
        }
    }
}
