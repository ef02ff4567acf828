//! Plan drafts and their revision history.
//!
//! A draft is never mutated once it has been evaluated: a retry produces
//! a new draft with `revision + 1`, and every draft is retained in the
//! history for audit.

use serde::{Deserialize, Serialize};

/// One drafted evacuation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    /// Plan text produced by the content-generation collaborator.
    pub content: String,
    /// 0 for the initial draft, incremented once per retry.
    pub revision: u32,
    /// The improvement suggestions this revision was asked to address.
    /// `None` on the initial draft.
    pub addressed_feedback: Option<Vec<String>>,
}

impl PlanDraft {
    /// Create the initial draft of a run.
    pub fn initial(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            revision: 0,
            addressed_feedback: None,
        }
    }

    /// Create the next revision, recording the feedback it addressed.
    pub fn revise(&self, content: impl Into<String>, addressed: Vec<String>) -> Self {
        Self {
            content: content.into(),
            revision: self.revision + 1,
            addressed_feedback: Some(addressed),
        }
    }
}

/// Ordered, append-only sequence of drafts produced across retries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisionHistory {
    drafts: Vec<PlanDraft>,
}

impl RevisionHistory {
    pub fn push(&mut self, draft: PlanDraft) {
        debug_assert!(
            self.drafts
                .last()
                .is_none_or(|last| draft.revision == last.revision + 1),
            "revisions must be contiguous"
        );
        self.drafts.push(draft);
    }

    pub fn latest(&self) -> Option<&PlanDraft> {
        self.drafts.last()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanDraft> {
        self.drafts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revise_increments_and_records_feedback() {
        let first = PlanDraft::initial("evacuate dc-east to zone-north");
        let second = first.revise(
            "evacuate dc-east to zone-north with helper fire-2",
            vec!["assign a helper to dc-east".to_string()],
        );

        assert_eq!(first.revision, 0);
        assert_eq!(second.revision, 1);
        assert!(first.addressed_feedback.is_none());
        assert_eq!(
            second.addressed_feedback.as_deref(),
            Some(&["assign a helper to dc-east".to_string()][..])
        );
        // the original draft is untouched
        assert_eq!(first.content, "evacuate dc-east to zone-north");
    }

    #[test]
    fn history_preserves_every_draft_in_order() {
        let mut history = RevisionHistory::default();
        let first = PlanDraft::initial("v0");
        let second = first.revise("v1", vec![]);
        history.push(first);
        history.push(second);

        assert_eq!(history.len(), 2);
        let revisions: Vec<u32> = history.iter().map(|d| d.revision).collect();
        assert_eq!(revisions, vec![0, 1]);
        assert_eq!(history.latest().unwrap().content, "v1");
    }
}
