use crate::core::{ParticipantId, Phase, ResponseSet};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A participant's Pre and Post sets, either of which may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhasePair<'a> {
    pub pre: Option<&'a ResponseSet>,
    pub post: Option<&'a ResponseSet>,
}

impl<'a> PhasePair<'a> {
    pub fn get(&self, phase: Phase) -> Option<&'a ResponseSet> {
        match phase {
            Phase::Pre => self.pre,
            Phase::Post => self.post,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pre.is_some() && self.post.is_some()
    }
}

/// The latest set per participant for `phase`.
///
/// Ties on `submitted_at` are broken by content so the winner does not
/// depend on input order.
pub fn latest_per_participant<'a>(
    sets: impl IntoIterator<Item = &'a ResponseSet>,
    phase: Phase,
) -> BTreeMap<ParticipantId, &'a ResponseSet> {
    let mut latest: BTreeMap<ParticipantId, &'a ResponseSet> = BTreeMap::new();
    for set in sets.into_iter().filter(|s| s.phase() == phase) {
        match latest.get(set.participant_id()) {
            Some(current) if recency(current, set) != Ordering::Less => {}
            _ => {
                latest.insert(set.participant_id().clone(), set);
            }
        }
    }
    latest
}

/// Group sets by participant, keeping the latest of each phase.
pub fn pair_by_participant<'a, I>(sets: I) -> BTreeMap<ParticipantId, PhasePair<'a>>
where
    I: IntoIterator<Item = &'a ResponseSet>,
    I::IntoIter: Clone,
{
    let sets = sets.into_iter();
    let mut pairs: BTreeMap<ParticipantId, PhasePair<'a>> = BTreeMap::new();
    for (participant, set) in latest_per_participant(sets.clone(), Phase::Pre) {
        pairs.entry(participant).or_default().pre = Some(set);
    }
    for (participant, set) in latest_per_participant(sets, Phase::Post) {
        pairs.entry(participant).or_default().post = Some(set);
    }
    pairs
}

fn recency(a: &ResponseSet, b: &ResponseSet) -> Ordering {
    a.submitted_at()
        .cmp(&b.submitted_at())
        .then_with(|| a.cohort_id().cmp(b.cohort_id()))
        .then_with(|| a.responses().cmp(b.responses()))
        .then_with(|| a.open_responses().cmp(b.open_responses()))
}
