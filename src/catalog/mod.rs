//! The assessment catalog: 32 rated items and the open questions per phase.
//!
//! The catalog is process-wide, immutable configuration. It is built once on
//! first access into a read-only lookup table and never mutated afterwards.
//!
//! ```rust
//! use readiness::catalog::{catalog, Indicator};
//! use readiness::core::ItemId;
//!
//! let item = catalog().item(ItemId::new(7)).unwrap();
//! assert_eq!(item.indicator, Indicator::PracticalReadiness);
//! assert_eq!(catalog().items_for(Indicator::Overall).count(), 2);
//! ```

mod items;

use crate::core::{ItemId, Phase, QuestionId};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rated items in the catalog.
pub const ITEM_COUNT: usize = 32;

/// Readiness dimension an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    SelfReadiness,
    PracticalReadiness,
    ProfessionalReadiness,
    TeamReadiness,
    Overall,
}

impl Indicator {
    /// All indicators in report order, `Overall` last.
    pub const ALL: [Indicator; 5] = [
        Indicator::SelfReadiness,
        Indicator::PracticalReadiness,
        Indicator::ProfessionalReadiness,
        Indicator::TeamReadiness,
        Indicator::Overall,
    ];

    /// The four readiness dimensions, without the `Overall` pseudo-dimension.
    pub const READINESS: [Indicator; 4] = [
        Indicator::SelfReadiness,
        Indicator::PracticalReadiness,
        Indicator::ProfessionalReadiness,
        Indicator::TeamReadiness,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Indicator::SelfReadiness => "Self-Readiness",
            Indicator::PracticalReadiness => "Practical Readiness",
            Indicator::ProfessionalReadiness => "Professional Readiness",
            Indicator::TeamReadiness => "Team Readiness",
            Indicator::Overall => "Overall",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Indicator::SelfReadiness => "Personal awareness, values, presence and style",
            Indicator::PracticalReadiness => {
                "Time, delegation, listening, conversations and feedback"
            }
            Indicator::ProfessionalReadiness => {
                "Communication, trust, meetings, goals and accountability"
            }
            Indicator::TeamReadiness => "Operational requirements, safety, change and resilience",
            Indicator::Overall => "Overall readiness for the role",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What an item measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Focus {
    Knowledge,
    Awareness,
    Confidence,
    Behaviour,
}

impl Focus {
    pub const ALL: [Focus; 4] = [
        Focus::Knowledge,
        Focus::Awareness,
        Focus::Confidence,
        Focus::Behaviour,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Focus::Knowledge => "Knowledge",
            Focus::Awareness => "Awareness",
            Focus::Confidence => "Confidence",
            Focus::Behaviour => "Behaviour",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Focus::Knowledge => "Understanding of concepts, processes and frameworks",
            Focus::Awareness => "Recognition of own patterns, triggers and impact",
            Focus::Confidence => "Self-belief and comfort in capability",
            Focus::Behaviour => "Actions, habits and practices",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A rated statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub indicator: Indicator,
    pub focus: Focus,
    pub prompt_text: &'static str,
}

/// A free-text question asked in one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenQuestion {
    pub id: QuestionId,
    pub phase: Phase,
    pub prompt_text: &'static str,
    /// Short description of what was asked, used when prompting the classifier.
    pub theme_context: &'static str,
    /// Pre question whose answers this one reflects on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follows_up: Option<QuestionId>,
}

/// Read-only lookup table over the catalog.
#[derive(Debug)]
pub struct ItemCatalog {
    items: Vec<Item>,
    questions: Vec<OpenQuestion>,
}

static CATALOG: Lazy<ItemCatalog> = Lazy::new(|| ItemCatalog {
    items: items::rated_items(),
    questions: items::open_questions(),
});

/// The process-wide catalog.
pub fn catalog() -> &'static ItemCatalog {
    &CATALOG
}

impl ItemCatalog {
    /// Items ordered by id; index `i` holds item `i + 1`.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        let index = usize::from(id.get()).checked_sub(1)?;
        self.items.get(index)
    }

    pub fn contains_item(&self, raw_id: u8) -> bool {
        self.item(ItemId::new(raw_id)).is_some()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    pub fn items_for(&self, indicator: Indicator) -> impl Iterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(move |item| item.indicator == indicator)
    }

    pub fn items_with_focus(&self, focus: Focus) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(move |item| item.focus == focus)
    }

    pub fn open_questions(&self, phase: Phase) -> impl Iterator<Item = &OpenQuestion> + '_ {
        self.questions.iter().filter(move |q| q.phase == phase)
    }

    pub fn open_question(&self, phase: Phase, id: QuestionId) -> Option<&OpenQuestion> {
        self.open_questions(phase).find(|q| q.id == id)
    }

    /// The Pre question that `question` looks back on, if any.
    pub fn followed_up(&self, question: &OpenQuestion) -> Option<&OpenQuestion> {
        self.open_question(Phase::Pre, question.follows_up?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_has_32_unique_items_in_id_order() {
        let ids: Vec<u8> = catalog().item_ids().map(ItemId::get).collect();
        assert_eq!(ids, (1..=32).collect::<Vec<u8>>());
        let unique: BTreeSet<u8> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ITEM_COUNT);
    }

    #[test]
    fn indicator_ranges_match_framework() {
        let range = |indicator| {
            catalog()
                .items_for(indicator)
                .map(|item| item.id.get())
                .collect::<Vec<_>>()
        };
        assert_eq!(range(Indicator::SelfReadiness), (1..=6).collect::<Vec<_>>());
        assert_eq!(range(Indicator::PracticalReadiness), (7..=14).collect::<Vec<_>>());
        assert_eq!(range(Indicator::ProfessionalReadiness), (15..=22).collect::<Vec<_>>());
        assert_eq!(range(Indicator::TeamReadiness), (23..=30).collect::<Vec<_>>());
        assert_eq!(range(Indicator::Overall), vec![31, 32]);
    }

    #[test]
    fn every_item_belongs_to_exactly_one_indicator() {
        let total: usize = Indicator::ALL
            .iter()
            .map(|i| catalog().items_for(*i).count())
            .sum();
        assert_eq!(total, ITEM_COUNT);
    }

    #[test]
    fn focus_tags_cover_all_items() {
        let counts: Vec<usize> = Focus::ALL
            .iter()
            .map(|f| catalog().items_with_focus(*f).count())
            .collect();
        assert_eq!(counts.iter().sum::<usize>(), ITEM_COUNT);
        assert_eq!(counts, vec![5, 2, 5, 20]);
    }

    #[test]
    fn lookup_rejects_out_of_catalog_ids() {
        assert!(catalog().item(ItemId::new(0)).is_none());
        assert!(catalog().item(ItemId::new(33)).is_none());
        assert!(catalog().contains_item(32));
    }

    #[test]
    fn each_phase_has_three_open_questions() {
        for phase in [Phase::Pre, Phase::Post] {
            let ids: Vec<u8> = catalog()
                .open_questions(phase)
                .map(|q| q.id.get())
                .collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }
        let q = catalog()
            .open_question(Phase::Post, QuestionId::new(1))
            .unwrap();
        assert!(q.prompt_text.contains("takeaway"));
    }

    #[test]
    fn post_concern_question_follows_up_pre_concerns() {
        let post = catalog()
            .open_question(Phase::Post, QuestionId::new(3))
            .unwrap();
        let earlier = catalog().followed_up(post).unwrap();

        assert_eq!(earlier.phase, Phase::Pre);
        assert!(earlier.prompt_text.contains("concerns"));
        let others = catalog()
            .open_questions(Phase::Pre)
            .chain(catalog().open_questions(Phase::Post))
            .filter(|q| catalog().followed_up(q).is_some())
            .count();
        assert_eq!(others, 1);
    }
}
