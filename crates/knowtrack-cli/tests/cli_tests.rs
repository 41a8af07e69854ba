//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `knowtrack` command isolated from any config on the host.
fn knowtrack(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("knowtrack").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("KNOWTRACK_PASSING_SCORE")
        .env_remove("KNOWTRACK_WEAK_THRESHOLD");
    cmd
}

const RECORDS: &str = r#"[
    {
        "conceptId": "fractions",
        "masteryProbability": 0.95,
        "attempts": 10,
        "correctAttempts": 9,
        "nextReviewDate": "2025-03-07T12:00:00Z",
        "interval": 6,
        "easeFactor": 2.6
    },
    {
        "conceptId": "ratios",
        "masteryProbability": 0.2,
        "attempts": 5,
        "correctAttempts": 1,
        "nextReviewDate": "2025-03-12T12:00:00Z"
    },
    {
        "conceptId": "percentages",
        "masteryLevel": 0.55,
        "attempts": 4,
        "correctAttempts": 2,
        "nextReviewDate": "whenever"
    }
]"#;

fn write_records(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("records.json");
    std::fs::write(&path, RECORDS).unwrap();
    path
}

#[test]
fn summary_text() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .arg("summary")
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("mastered"))
        .stdout(predicate::str::contains("3 concept(s), average mastery 56.7%"));
}

#[test]
fn summary_json() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = knowtrack(dir.path())
        .args(["summary", "--format", "json", "--records"])
        .arg(&records)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total"], 3);
    assert_eq!(json["mastered"], 1);
    assert_eq!(json["developing"], 1);
    assert_eq!(json["novice"], 1);
}

#[test]
fn weak_lists_weakest_first() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = knowtrack(dir.path())
        .args(["weak", "--format", "json", "--records"])
        .arg(&records)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["conceptId"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["ratios", "percentages"]);
}

#[test]
fn weak_rejects_bad_threshold() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .args(["weak", "--threshold", "1.5", "--records"])
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("threshold"));
}

#[test]
fn due_orders_by_overdue_and_flags_bad_dates() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    let output = knowtrack(dir.path())
        .args(["due", "--format", "json", "--now", "2025-03-10T12:00:00Z", "--records"])
        .arg(&records)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let due = json.as_array().unwrap();
    assert_eq!(due.len(), 2);
    assert_eq!(due[0]["conceptId"], "percentages");
    assert_eq!(due[0]["daysOverdue"], 999);
    assert_eq!(due[1]["conceptId"], "fractions");
    assert_eq!(due[1]["daysOverdue"], 3);
}

#[test]
fn due_rejects_bad_now() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .args(["due", "--now", "someday", "--records"])
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now timestamp"));
}

#[test]
fn due_skips_blank_and_future_minute_precision_dates() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("records.json");
    std::fs::write(
        &records,
        r#"[
            {"conceptId": "future", "nextReviewDate": "2025-06-01T08:30"},
            {"conceptId": "blank", "nextReviewDate": ""},
            {"conceptId": "past", "nextReviewDate": "2025-02-27T08:30+0200"}
        ]"#,
    )
    .unwrap();

    let output = knowtrack(dir.path())
        .args(["due", "--format", "json", "--now", "2025-03-01T00:00:00Z", "--records"])
        .arg(&records)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let due = json.as_array().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["conceptId"], "past");
    assert_eq!(due[0]["daysOverdue"], 1);
}

#[test]
fn attempt_updates_and_writes_back() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .args(["attempt", "--concept", "ratios", "--incorrect", "--write"])
        .args(["--now", "2025-03-10T12:00:00Z", "--records"])
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"attempts\": 6"))
        .stdout(predicate::str::contains("\"interval\": 1"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&records).unwrap()).unwrap();
    let ratios = saved
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["conceptId"] == "ratios")
        .unwrap();
    assert_eq!(ratios["attempts"], 6);
    assert_eq!(ratios["correctAttempts"], 1);
    assert_eq!(ratios["nextReviewDate"], "2025-03-11T12:00:00+00:00");
}

#[test]
fn attempt_saturates_counters() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("big.json");
    std::fs::write(
        &records,
        r#"[{"conceptId": "a", "attempts": 4294967295, "correctAttempts": 0}]"#,
    )
    .unwrap();

    knowtrack(dir.path())
        .args(["attempt", "--concept", "a", "--correct", "--records"])
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"attempts\": 4294967295"))
        .stdout(predicate::str::contains("\"correctAttempts\": 1"));
}

#[test]
fn rust_log_debug_shows_attempt_details() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .env("RUST_LOG", "knowtrack=debug")
        .args(["attempt", "--concept", "ratios", "--correct", "--records"])
        .arg(&records)
        .assert()
        .success()
        .stderr(predicate::str::contains("attempt recorded"));
}

#[test]
fn attempt_seeds_new_concept_from_prior() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("fresh.json");

    knowtrack(dir.path())
        .args(["attempt", "--concept", "limits", "--correct", "--write"])
        .args(["--now", "2025-03-10T12:00:00Z", "--records"])
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"conceptId\": \"limits\""))
        .stdout(predicate::str::contains("\"correctAttempts\": 1"));

    assert!(records.exists());
}

#[test]
fn attempt_requires_an_outcome() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);

    knowtrack(dir.path())
        .args(["attempt", "--concept", "ratios", "--records"])
        .arg(&records)
        .assert()
        .failure();
}

#[test]
fn risk_high_for_failing_average() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("risk.json");
    std::fs::write(
        &input,
        r#"{"currentScores": {"A": 50}, "scoreTrend": [], "consistency": 0.9,
            "improvementRate": 2.0, "weeksUntilExam": 8}"#,
    )
    .unwrap();

    knowtrack(dir.path())
        .arg("risk")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Risk: HIGH (70%)"))
        .stdout(predicate::str::contains("Need to improve by 9.0% to pass"));
}

#[test]
fn risk_json_uses_config_passing_score() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("risk.json");
    std::fs::write(
        &input,
        r#"{"currentScores": {"A": 80}, "consistency": 0.9, "improvementRate": 1.0}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("knowtrack.toml"), "[risk]\npassing_score = 90.0\n").unwrap();

    let output = knowtrack(dir.path())
        .args(["risk", "--format", "json", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // predicted 80 + 1.0 * 8 = 88 < 90
    assert_eq!(json["weeksUntilExam"], 8);
    assert_eq!(json["riskLevel"], "low");
    assert_eq!(json["riskFactors"][0], "Predicted score (88.0%) is below passing threshold");
}

#[test]
fn validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("bad.json");
    std::fs::write(
        &records,
        r#"[{"conceptId": "a", "masteryProbability": 1.5},
            {"conceptId": "b", "attempts": 1, "correctAttempts": 2},
            {"conceptId": "c", "nextReviewDate": "nope"}]"#,
    )
    .unwrap();

    knowtrack(dir.path())
        .arg("validate")
        .arg("--records")
        .arg(&records)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[a] ERROR"))
        .stdout(predicate::str::contains("[b] ERROR"))
        .stdout(predicate::str::contains("[c] WARNING"))
        .stderr(predicate::str::contains("2 invalid record(s)"));
}

#[test]
fn validate_valid_records() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("ok.json");
    std::fs::write(&records, r#"[{"conceptId": "a", "masteryProbability": 0.5}]"#).unwrap();

    knowtrack(dir.path())
        .arg("validate")
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("All records valid."));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    knowtrack(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created knowtrack.toml"));

    assert!(dir.path().join("knowtrack.toml").exists());

    knowtrack(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let records = write_records(&dir);
    std::fs::write(dir.path().join("knowtrack.toml"), "[bkt]\nguess = 2.0\n").unwrap();

    knowtrack(dir.path())
        .arg("summary")
        .arg("--records")
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bkt.guess"));
}

#[test]
fn missing_records_file() {
    let dir = TempDir::new().unwrap();

    knowtrack(dir.path())
        .args(["summary", "--records", "no_such_file.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    knowtrack(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Concept mastery tracking"));
}
