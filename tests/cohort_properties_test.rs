use proptest::prelude::*;
use readiness::catalog::ITEM_COUNT;
use readiness::testkit::{response_set_from_ratings, response_set_from_values};
use readiness::{benchmark_cohort, score_response_set, CohortId, Indicator, Phase, ResponseSet, ResponseValue};

fn cohort_sets(ratings: &[Vec<i32>]) -> Vec<ResponseSet> {
    ratings
        .iter()
        .enumerate()
        .map(|(n, values)| {
            let mut row = [0; ITEM_COUNT];
            row.copy_from_slice(values);
            response_set_from_ratings(&format!("p-{n:03}"), "c-1", Phase::Pre, &row)
        })
        .collect()
}

fn ratings_strategy() -> impl Strategy<Value = Vec<Vec<i32>>> {
    prop::collection::vec(prop::collection::vec(1..=6i32, ITEM_COUNT), 1..12)
}

proptest! {
    #[test]
    fn benchmark_ignores_participant_order(ratings in ratings_strategy(), rotation in 0usize..12) {
        let sets = cohort_sets(&ratings);
        let mut reordered = sets.clone();
        reordered.reverse();
        let len = reordered.len();
        reordered.rotate_left(rotation % len);

        let cohort = CohortId::new("c-1");
        let original = benchmark_cohort(&cohort, Phase::Pre, &sets);
        let shuffled = benchmark_cohort(&cohort, Phase::Pre, &reordered);

        prop_assert_eq!(original, shuffled);
    }

    #[test]
    fn cohort_mean_is_mean_of_participant_scores(ratings in ratings_strategy()) {
        let sets = cohort_sets(&ratings);
        let benchmark = benchmark_cohort(&CohortId::new("c-1"), Phase::Pre, &sets);

        for indicator in Indicator::ALL {
            let scores: Vec<f64> = sets
                .iter()
                .filter_map(|s| score_response_set(s).score(indicator))
                .collect();
            let expected = scores.iter().sum::<f64>() / scores.len() as f64;
            let stats = benchmark.indicator(indicator).unwrap();

            prop_assert!((stats.mean - expected).abs() < 1e-9);
            prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            prop_assert_eq!(stats.participant_count, sets.len());
        }
    }
}

#[test]
fn mean_of_means_differs_from_pooled_average() {
    let sparse = response_set_from_values(
        "p-1",
        "c-1",
        Phase::Pre,
        [(1, ResponseValue::Rating(6))],
        Vec::<(u8, ResponseValue)>::new(),
    );
    let full = response_set_from_values(
        "p-2",
        "c-1",
        Phase::Pre,
        (1..=6).map(|item| (item, ResponseValue::Rating(1))),
        Vec::<(u8, ResponseValue)>::new(),
    );

    let benchmark = benchmark_cohort(&CohortId::new("c-1"), Phase::Pre, &[sparse, full]);
    let pooled = (6.0 + 6.0 * 1.0) / 7.0;

    assert_eq!(benchmark.mean(Indicator::SelfReadiness), Some(3.5));
    assert!((benchmark.mean(Indicator::SelfReadiness).unwrap() - pooled).abs() > 1.0);
}
