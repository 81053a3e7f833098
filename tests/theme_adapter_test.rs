mod common;

use common::cohort_submissions;
use pretty_assertions::assert_eq;
use readiness::config::{ClassifierSettings, RatingScale};
use readiness::catalog::catalog;
use readiness::testkit::{ScriptedClassifier, SubmissionBuilder};
use readiness::themes::{ClassifierError, ClassifierRequest, ThemeStatus};
use readiness::{
    CohortId, Phase, ReportPlanner, ResponseSet, ResponseValidator, ThemeClassifier,
    ThemeClassifierAdapter,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every request exactly as it would leave the process.
#[derive(Default)]
struct RecordingClassifier {
    requests: Mutex<Vec<String>>,
}

impl ThemeClassifier for RecordingClassifier {
    fn classify(&self, request: &ClassifierRequest) -> Result<String, ClassifierError> {
        let body = serde_json::to_string(request).map_err(|e| ClassifierError::Malformed(e.to_string()))?;
        self.requests.lock().unwrap().push(body);
        Ok(r#"Here you go: {"themes":[{"theme":"Confidence","count":2,"example":"More confident"}]}"#.to_string())
    }
}

fn cohort_sets(participants: usize) -> Vec<ResponseSet> {
    ResponseValidator::default()
        .validate_all(&cohort_submissions("c-1", participants, 3, 5))
        .valid
}

/// Post answers written without any mention of who gave them.
fn anonymous_post_sets() -> Vec<ResponseSet> {
    let validator = ResponseValidator::default();
    ["c-1-p1", "c-1-p2"]
        .into_iter()
        .map(|id| {
            let mut builder = SubmissionBuilder::post(id, "c-1").uniform(5);
            for question in catalog().open_questions(Phase::Post) {
                builder = builder.open_response(question.id.get(), "More confident in hard conversations");
            }
            validator.validate_result(&builder.build()).unwrap()
        })
        .collect()
}

#[test]
fn requests_carry_no_participant_identity() {
    let classifier = Arc::new(RecordingClassifier::default());
    let adapter =
        ThemeClassifierAdapter::new(classifier.clone(), ClassifierSettings::default()).unwrap();

    let summaries =
        adapter.summarize_phase(&CohortId::new("c-1"), Phase::Post, &anonymous_post_sets());

    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.status == ThemeStatus::Classified));
    assert_eq!(summaries[0].themes[0].label, "Confidence");
    assert_eq!(summaries[0].themes[0].example.as_deref(), Some("More confident"));

    let requests = classifier.requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    for body in requests.iter() {
        assert!(!body.contains("c-1-p1"));
        assert!(!body.contains("c-1-p2"));
        assert!(body.contains("More confident in hard conversations"));
    }
}

#[test]
fn timed_out_classifier_still_yields_an_impact_report() {
    let classifier =
        ScriptedClassifier::replying(r#"{"themes":[]}"#).with_delay(Duration::from_secs(3));
    let settings = ClassifierSettings {
        timeout: Duration::from_millis(50),
        ..ClassifierSettings::default()
    };
    let adapter = ThemeClassifierAdapter::new(Arc::new(classifier), settings).unwrap();

    let report = ReportPlanner::default()
        .build_impact_report(
            &CohortId::new("c-1"),
            &cohort_sets(2),
            &RatingScale::default(),
            &adapter,
        )
        .unwrap();

    assert_eq!(report.progress.matched_count, 2);
    assert_eq!(report.progress.share_improved, Some(1.0));
    assert!(report.themes.iter().all(|t| t.status == ThemeStatus::TimedOut));
    assert!(report.themes.iter().all(|t| t.themes.is_empty()));
}

#[test]
fn malformed_reply_degrades_every_question() {
    let adapter = ThemeClassifierAdapter::new(
        Arc::new(ScriptedClassifier::replying("no json in here")),
        ClassifierSettings::default(),
    )
    .unwrap();

    let summaries = adapter.summarize_phase(&CohortId::new("c-1"), Phase::Post, &cohort_sets(2));

    assert!(summaries.iter().all(|s| s.status == ThemeStatus::Malformed));
    assert!(summaries.iter().all(|s| s.total_quotes == 2));
}

#[cfg(unix)]
#[test]
fn external_command_classifier_round_trip() {
    use readiness::themes::CommandClassifier;

    let classifier = CommandClassifier::new(
        "sh",
        vec![
            "-c".to_string(),
            r#"cat > /dev/null; echo '{"themes":[{"theme":"Listening","count":1}]}'"#.to_string(),
        ],
    );
    let adapter =
        ThemeClassifierAdapter::new(Arc::new(classifier), ClassifierSettings::default()).unwrap();

    let summaries = adapter.summarize_phase(&CohortId::new("c-1"), Phase::Post, &cohort_sets(1));

    assert!(summaries.iter().all(|s| s.status == ThemeStatus::Classified));
    assert_eq!(summaries[0].themes[0].label, "Listening");
    assert_eq!(summaries[0].themes[0].supporting_quote_count, 1);
}

#[test]
fn concern_reflections_carry_earlier_concerns_as_context() {
    let validator = ResponseValidator::default();
    let submissions = vec![
        SubmissionBuilder::pre("c-1-p1", "c-1")
            .uniform(3)
            .open_response(3, "Worried about   delegating")
            .build(),
        SubmissionBuilder::pre("c-1-p2", "c-1")
            .uniform(3)
            .open_response(3, "Nervous about giving feedback")
            .build(),
        SubmissionBuilder::pre("c-2-p1", "c-2")
            .uniform(3)
            .open_response(3, "Concern from another cohort")
            .build(),
    ];
    let mut sets = validator.validate_all(&submissions).valid;
    sets.extend(anonymous_post_sets());

    let classifier = Arc::new(RecordingClassifier::default());
    let adapter =
        ThemeClassifierAdapter::new(classifier.clone(), ClassifierSettings::default()).unwrap();
    let concerns = catalog()
        .open_question(Phase::Post, readiness::QuestionId::new(3))
        .unwrap();

    let summary = adapter.summarize(&CohortId::new("c-1"), concerns, &sets);

    assert_eq!(summary.status, ThemeStatus::Classified);
    let requests = classifier.requests.lock().unwrap();
    let body: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(
        body["context_quotes"],
        serde_json::json!(["Worried about delegating", "Nervous about giving feedback"])
    );
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("- Nervous about giving feedback"));
    assert!(!requests[0].contains("another cohort"));
    assert!(!requests[0].contains("c-1-p"));
}
