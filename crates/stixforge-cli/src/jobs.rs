//! In-process job-status tracking, owned by the request layer.
//!
//! The extraction core stays stateless: it only calls `report` on the sink
//! it was given. This tracker keeps the latest status per document id, so
//! a later request for the same document simply wins.

use std::collections::HashMap;
use std::sync::Mutex;
use stixforge_domain::traits::{JobStatus, StatusSink};

/// Keyed in-memory store of the latest extraction status per document.
#[derive(Debug, Default)]
pub struct InMemoryJobTracker {
    states: Mutex<HashMap<String, JobStatus>>,
}

impl InMemoryJobTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest reported status for a document, if any.
    pub fn latest(&self, document_id: &str) -> Option<JobStatus> {
        self.states.lock().unwrap().get(document_id).cloned()
    }
}

impl StatusSink for InMemoryJobTracker {
    fn report(&self, document_id: &str, status: JobStatus) {
        self.states
            .lock()
            .unwrap()
            .insert(document_id.to_string(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_status_wins() {
        let tracker = InMemoryJobTracker::new();

        tracker.report("doc-1", JobStatus::CallingPrimary);
        tracker.report("doc-1", JobStatus::Completed { object_count: 4 });

        assert_eq!(
            tracker.latest("doc-1"),
            Some(JobStatus::Completed { object_count: 4 })
        );
    }

    #[test]
    fn test_documents_tracked_independently() {
        let tracker = InMemoryJobTracker::new();

        tracker.report("doc-1", JobStatus::CallingPrimary);
        tracker.report("doc-2", JobStatus::CallingSecondary);

        assert_eq!(tracker.latest("doc-1"), Some(JobStatus::CallingPrimary));
        assert_eq!(tracker.latest("doc-2"), Some(JobStatus::CallingSecondary));
        assert_eq!(tracker.latest("doc-3"), None);
    }
}
