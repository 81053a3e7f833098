//! Quote normalization and anonymization.
//!
//! Quotes leave this module as plain strings. The link back to the
//! participant stays in a [`QuoteLedger`], which cannot be serialized and is
//! never part of a classifier request.

use crate::core::{ParticipantId, QuestionId, ResponseSet, ResponseValue};

/// Quote index → participant, for internal auditing only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteLedger {
    participants: Vec<ParticipantId>,
}

impl QuoteLedger {
    pub fn participant_for(&self, quote_index: usize) -> Option<&ParticipantId> {
        self.participants.get(quote_index)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Anonymized quotes for one question, plus their ledger.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<String>,
    pub ledger: QuoteLedger,
}

impl QuoteBatch {
    /// Collect the answers to `question`, one per set, in set order.
    pub fn collect<'a>(
        sets: impl IntoIterator<Item = &'a ResponseSet>,
        question: QuestionId,
    ) -> Self {
        let mut batch = Self::default();
        for set in sets {
            if let Some(quote) = set.open_response(question).and_then(normalize_answer) {
                batch.quotes.push(quote);
                batch.ledger.participants.push(set.participant_id().clone());
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Trim and collapse whitespace; blank, skipped and numeric answers yield
/// nothing.
pub fn normalize_answer(value: &ResponseValue) -> Option<String> {
    let text = value.text()?;
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
