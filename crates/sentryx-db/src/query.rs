//! Store query types.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use sentryx_common::Stage;

use crate::document::Document;

/// Predicate over stage flags.
///
/// A document matches when every stage in `completed` has its flag set and
/// the `pending` stage (if any) does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageFilter {
    pub completed: Vec<Stage>,
    pub pending: Option<Stage>,
}

impl StageFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Documents eligible to run `stage`: prerequisites done, stage not done.
    pub fn eligible_for(stage: Stage) -> Self {
        Self {
            completed: stage.prerequisites().to_vec(),
            pending: Some(stage),
        }
    }

    /// Documents that have completed all of `stages`.
    pub fn completed(stages: &[Stage]) -> Self {
        Self { completed: stages.to_vec(), pending: None }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.completed.iter().all(|s| doc.flag(*s))
            && self.pending.map_or(true, |s| !doc.flag(s))
    }
}

/// One page request.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub filter: StageFilter,
    pub limit: usize,
    /// Matching documents to pass over before the page starts.
    pub skip: usize,
    /// Identities never returned, whatever the filter says.
    pub exclude: HashSet<String>,
}

impl DocumentQuery {
    pub fn page(filter: StageFilter, limit: usize) -> Self {
        Self { filter, limit, ..Default::default() }
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_exclude(mut self, exclude: HashSet<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        !self.exclude.contains(&doc.id) && self.filter.matches(doc)
    }
}

/// One bucket of an aggregate grouping. `key` is `None` for documents
/// where the grouped field is absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: Option<String>,
    pub count: u64,
}

/// min / max / mean of a numeric field over matching documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Render a grouped value the way the stores report it.
pub fn group_key(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// Sort buckets by descending count, then key, matching the SQL backend.
pub fn sort_groups(groups: &mut [GroupCount]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pre: bool, enr: bool) -> Document {
        Document::new("d").with("preprocessed", pre).with("enriched", enr)
    }

    #[test]
    fn test_eligible_for_enrich() {
        let filter = StageFilter::eligible_for(Stage::Enrich);
        assert!(filter.matches(&doc(true, false)));
        assert!(!filter.matches(&doc(false, false)));
        assert!(!filter.matches(&doc(true, true)));
    }

    #[test]
    fn test_absent_flag_is_pending() {
        let filter = StageFilter::eligible_for(Stage::Preprocess);
        assert!(filter.matches(&Document::new("fresh")));
    }

    #[test]
    fn test_exclude_wins_over_filter() {
        let query = DocumentQuery::page(StageFilter::all(), 10)
            .with_exclude(HashSet::from(["d".to_string()]));
        assert!(!query.matches(&doc(false, false)));
    }

    #[test]
    fn test_group_key_rendering() {
        assert_eq!(group_key(None), None);
        assert_eq!(group_key(Some(&Value::Null)), None);
        assert_eq!(group_key(Some(&Value::from("en"))), Some("en".to_string()));
        assert_eq!(group_key(Some(&Value::from(3))), Some("3".to_string()));
    }
}
