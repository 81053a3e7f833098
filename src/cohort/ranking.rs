use crate::catalog::Indicator;
use crate::core::ParticipantId;
use crate::scoring::ScoreCard;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedParticipant {
    /// Standard competition rank: equal scores share a rank and the next
    /// rank skips ("1224").
    pub rank: usize,
    pub participant_id: ParticipantId,
    pub score: f64,
}

/// Rank participants by one indicator, highest first.
///
/// Cards without a score for `indicator` are left out. Tied participants are
/// listed by id.
pub fn rank_participants(cards: &[ScoreCard], indicator: Indicator) -> Vec<RankedParticipant> {
    let mut scored: Vec<(&ParticipantId, f64)> = cards
        .iter()
        .filter_map(|card| card.score(indicator).map(|s| (&card.participant_id, s)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut ranked: Vec<RankedParticipant> = Vec::with_capacity(scored.len());
    for (position, (participant_id, score)) in scored.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(previous) if previous.score == score => previous.rank,
            _ => position + 1,
        };
        ranked.push(RankedParticipant {
            rank,
            participant_id: participant_id.clone(),
            score,
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemId, Phase, ResponseValue};
    use crate::scoring::score_response_set;
    use crate::testkit::uniform_response_set;
    use pretty_assertions::assert_eq;

    fn card(participant: &str, rating: i32) -> ScoreCard {
        score_response_set(&uniform_response_set(participant, "c-1", Phase::Post, rating))
    }

    #[test]
    fn ties_share_rank_and_next_rank_skips() {
        let cards = vec![card("p-4", 3), card("p-2", 5), card("p-3", 5), card("p-1", 6)];

        let ranked: Vec<(usize, String)> = rank_participants(&cards, Indicator::Overall)
            .into_iter()
            .map(|r| (r.rank, r.participant_id.to_string()))
            .collect();

        assert_eq!(
            ranked,
            vec![
                (1, "p-1".to_string()),
                (2, "p-2".to_string()),
                (2, "p-3".to_string()),
                (4, "p-4".to_string()),
            ]
        );
    }

    #[test]
    fn participants_without_score_are_excluded() {
        let silent = score_response_set(
            &uniform_response_set("p-9", "c-1", Phase::Post, 6)
                .with_response(ItemId::new(31), ResponseValue::Skipped)
                .without_response(ItemId::new(32)),
        );
        let cards = vec![silent, card("p-1", 2)];

        let ranked = rank_participants(&cards, Indicator::Overall);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].participant_id, ParticipantId::new("p-1"));
    }
}
