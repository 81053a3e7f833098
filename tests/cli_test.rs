mod common;

use common::{cohort_submissions, Workspace};
use indoc::indoc;
use pretty_assertions::assert_eq;
use readiness::testkit::SubmissionBuilder;

#[test]
fn catalog_lists_items_and_questions() {
    let ws = Workspace::new();
    let value = ws.run_json(&["catalog"]);

    assert_eq!(value["items"].as_array().map(Vec::len), Some(32));
    assert_eq!(value["open_questions"].as_array().map(Vec::len), Some(6));
}

#[test]
fn validate_reports_every_problem_and_fails() {
    let ws = Workspace::new();
    let file = ws.write_json(
        "submissions.json",
        &vec![
            SubmissionBuilder::pre("p-1", "c-1").uniform(4).build(),
            SubmissionBuilder::pre("p-2", "c-1")
                .uniform(4)
                .without_rating(12)
                .rating(5, 0)
                .build(),
        ],
    );

    let output = ws
        .cmd()
        .arg("validate")
        .arg(&file)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("1 valid, 1 rejected"));
    assert!(text.contains("p-2"));
    assert!(text.contains("incomplete response"));
    assert!(text.contains("out of range"));
}

#[test]
fn validate_succeeds_for_clean_input() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 2, 3, 4));

    ws.cmd().arg("validate").arg(&file).assert().success();
}

#[test]
fn score_outputs_one_card_per_set() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 2, 3, 4));

    let value = ws.run_json(&["score", file.to_str().unwrap()]);
    let cards = value.as_array().unwrap();

    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0]["participant_id"], "c-1-p1");
    assert_eq!(cards[0]["phase"], "pre");
    assert_eq!(cards[0]["all_items_mean"], 3.0);
}

#[test]
fn compare_plans_progress_for_matched_participant() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 1, 3, 5));

    let value = ws.run_json(&["compare", file.to_str().unwrap(), "--participant", "c-1-p1"]);

    assert_eq!(value["kind"], "progress");
    assert_eq!(value["comparison"]["all_items_delta"], 2.0);
}

#[test]
fn compare_plans_baseline_from_stored_set() {
    let ws = Workspace::new();
    let file = ws.write(
        "sets.json",
        indoc! {r#"
            [
              {
                "participant_id": "p-9",
                "cohort_id": "autumn",
                "phase": "pre",
                "submitted_at": "2025-03-01T09:00:00Z",
                "responses": {
                  "1": {"rating": 4},
                  "2": {"rating": 2},
                  "31": {"rating": 5},
                  "32": "skipped"
                }
              }
            ]
        "#},
    );

    let value = ws.run_json(&["compare", file.to_str().unwrap(), "--participant", "p-9"]);

    assert_eq!(value["kind"], "baseline");
    assert_eq!(value["scores"]["indicators"]["SelfReadiness"]["mean_value"], 3.0);
    assert_eq!(value["scores"]["indicators"]["Overall"]["mean_value"], 5.0);
}

#[test]
fn stored_set_with_foreign_item_is_not_reported() {
    let ws = Workspace::new();
    let file = ws.write(
        "sets.json",
        indoc! {r#"
            [
              {
                "participant_id": "p-9",
                "cohort_id": "autumn",
                "phase": "pre",
                "submitted_at": "2025-03-01T09:00:00Z",
                "responses": {
                  "1": {"rating": 4},
                  "40": {"rating": 99}
                }
              }
            ]
        "#},
    );

    ws.cmd()
        .args(["compare", file.to_str().unwrap(), "--participant", "p-9"])
        .assert()
        .failure();
}

#[test]
fn compare_fails_for_unknown_participant() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 1, 3, 5));

    ws.cmd()
        .args(["compare", file.to_str().unwrap(), "--participant", "nobody"])
        .assert()
        .failure();
}

#[test]
fn cohort_benchmark_ranks_participants() {
    let ws = Workspace::new();
    let mut submissions = cohort_submissions("c-1", 1, 2, 4);
    submissions.push(SubmissionBuilder::pre("c-1-p2", "c-1").uniform(5).build());
    let file = ws.write_json("submissions.json", &submissions);

    let value = ws.run_json(&[
        "cohort",
        file.to_str().unwrap(),
        "--cohort",
        "c-1",
        "--phase",
        "pre",
    ]);

    assert_eq!(value["benchmark"]["participant_count"], 2);
    assert_eq!(value["benchmark"]["indicators"]["Overall"]["mean"], 3.5);
    assert_eq!(value["ranking"][0]["participant_id"], "c-1-p2");
    assert_eq!(value["ranking"][0]["rank"], 1);
}

#[test]
fn impact_degrades_themes_without_a_classifier() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 2, 3, 4));

    let value = ws.run_json(&["impact", file.to_str().unwrap(), "--cohort", "c-1"]);

    assert_eq!(value["progress"]["matched_count"], 2);
    let themes = value["themes"].as_array().unwrap();
    assert_eq!(themes.len(), 3);
    assert!(themes.iter().all(|t| t["status"] == "unavailable"));
}

#[test]
fn impact_requires_enough_matched_participants() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 1, 3, 4));

    ws.cmd()
        .args(["impact", file.to_str().unwrap(), "--cohort", "c-1"])
        .assert()
        .failure();
}

#[test]
fn explicit_config_changes_the_scale() {
    let ws = Workspace::new();
    let config = ws.write(
        "strict.toml",
        indoc! {r#"
            [scale]
            min = 1
            max = 4
            agree_threshold = 3
        "#},
    );
    let file = ws.write_json(
        "submissions.json",
        &vec![SubmissionBuilder::pre("p-1", "c-1").uniform(5).build()],
    );

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn init_writes_config_once() {
    let ws = Workspace::new();

    ws.cmd().arg("init").assert().success();
    assert!(ws.path().join(".readiness.toml").exists());

    ws.cmd().arg("init").assert().failure();
    ws.cmd().args(["init", "--force"]).assert().success();
}

#[test]
fn terminal_output_is_plain_when_piped() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 1, 3, 4));

    let output = ws
        .cmd()
        .args(["compare", file.to_str().unwrap(), "--participant", "c-1-p1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("Progress report: c-1-p1 (c-1)"));
    assert!(text.contains("+1.0"));
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn color_flag_overrides_no_color() {
    let ws = Workspace::new();
    let file = ws.write_json("submissions.json", &cohort_submissions("c-1", 1, 3, 4));

    let output = ws
        .cmd()
        .args(["compare", file.to_str().unwrap(), "--participant", "c-1-p1"])
        .args(["--color", "always"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains('\u{1b}'));

    ws.cmd()
        .args(["catalog", "--color", "sometimes"])
        .assert()
        .failure();
}
