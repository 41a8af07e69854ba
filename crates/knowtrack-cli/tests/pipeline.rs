//! End-to-end library tests: the record lifecycle a caller drives.
//!
//! load -> attempt -> schedule -> persist -> due query -> ledger.

use chrono::{DateTime, Duration, TimeZone, Utc};

use knowtrack_core::model::{ConceptMasteryRecord, MasteryLabel, RecordInput};
use knowtrack_core::{ConceptTracker, MasteryLedger, ReviewScheduler, TrackerConfig};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap()
}

#[test]
fn streak_of_correct_answers_stretches_the_schedule() {
    let tracker = ConceptTracker::default();
    let mut record = tracker.new_record("derivatives");
    let mut now = start();
    let mut intervals = Vec::new();

    for _ in 0..6 {
        let update = tracker.record_attempt(&record, true, now);
        record = update.record;
        intervals.push(record.interval);
        now = now + Duration::days(record.interval as i64);
    }

    assert_eq!(record.attempts, 6);
    assert_eq!(record.correct_attempts, 6);
    assert_eq!(
        knowtrack_core::ledger::classify(record.mastery_probability),
        MasteryLabel::Mastered
    );
    assert!(
        intervals.windows(2).all(|w| w[1] >= w[0]),
        "intervals should not shrink: {intervals:?}"
    );
    assert!(*intervals.last().unwrap() > 6);
    assert!(record.ease_factor >= 1.3);
}

#[test]
fn wrong_answer_after_streak_resets_to_one_day() {
    let tracker = ConceptTracker::default();
    let mut record = tracker.new_record("integrals");
    record.mastery_probability = 0.7;
    record.interval = 20;

    // 0.07 / 0.31 ~ 0.226, plus the learning step ~ 0.458: quality 2.
    let update = tracker.record_attempt(&record, false, start());
    assert!(update.record.mastery_probability < 0.5);
    assert_eq!(update.record.interval, 1);
    assert_eq!(update.quality, 2);
}

#[test]
fn stored_records_flow_through_due_and_ledger() {
    let config = TrackerConfig::default();
    let raw: Vec<RecordInput> = serde_json::from_str(
        r#"[
            {"conceptId": "sets", "masteryProbability": 0.92, "nextReviewDate": "2025-08-25T08:00:00Z"},
            {"conceptId": "logic", "masteryProbability": 0.35, "nextReviewDate": "2025-08-31T08:00:00"},
            {"conceptId": "graphs", "masteryProbability": 0.6, "nextReviewDate": "2025-09-04"},
            {"conceptId": "proofs", "masteryProbability": 0.1, "nextReviewDate": "last week"},
            {"conceptId": "new-topic"}
        ]"#,
    )
    .unwrap();
    let records: Vec<ConceptMasteryRecord> = raw
        .into_iter()
        .map(|r| ConceptMasteryRecord::try_from_input(r, &config).unwrap())
        .collect();

    let due = ReviewScheduler::new(config.scheduler).due_concepts(&records, start());
    let due_ids: Vec<_> = due
        .iter()
        .map(|d| (d.record.concept_id.as_str(), d.days_overdue))
        .collect();
    assert_eq!(due_ids, vec![("proofs", 999), ("sets", 7), ("logic", 1)]);

    let ledger = MasteryLedger::new(config.ledger);
    let weak: Vec<_> = ledger
        .weak_concepts(&records)
        .iter()
        .map(|r| r.concept_id.as_str())
        .collect();
    assert_eq!(weak, vec!["proofs", "new-topic", "logic", "graphs"]);

    let summary = ledger.summarize(&records);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.counts.mastered, 1);
    assert_eq!(summary.counts.beginning, 2);
    assert_eq!(summary.counts.developing, 1);
    assert_eq!(summary.counts.novice, 1);
}

#[test]
fn persisted_record_round_trips_through_json() {
    let tracker = ConceptTracker::default();
    let update = tracker.record_attempt(&tracker.new_record("vectors"), true, start());

    let json = serde_json::to_string(&update.record).unwrap();
    let raw: RecordInput = serde_json::from_str(&json).unwrap();
    let reloaded = ConceptMasteryRecord::try_from_input(raw, tracker.config()).unwrap();

    assert_eq!(reloaded, update.record);
}
