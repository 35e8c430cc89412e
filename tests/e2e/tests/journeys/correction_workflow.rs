//! # Correction Workflow Journey
//!
//! A user states facts, restates some of them differently, then explicitly
//! corrects and forgets others. Everything runs against a real SQLite store.

use mnemos_core::{
    ConflictDetector, CorrectionIntent, DeleteFactRequest, DeleteScope, ExtractedFact,
    FactExtractor, FactStore, Resolution, UpdateFactRequest, detect_correction_intent,
};
use mnemos_e2e_tests::harness::TestDatabaseManager;

// ============================================================================
// INGESTION AND OVERWRITE
// ============================================================================

#[test]
fn test_renamed_pet_overwrites_with_conflict() {
    let db = TestDatabaseManager::new_temp();
    let ingestor = db.ingestor();

    let first = ingestor.ingest("My dog is named Rex", "user-1").unwrap();
    assert_eq!(first.facts.len(), 1);
    assert_eq!(first.facts[0].subject, "dog");
    assert_eq!(first.facts[0].predicate, "named");
    assert_eq!(first.facts[0].object, "Rex");
    assert!(first.conflicts.is_empty());

    let second = ingestor.ingest("My dog is named Max", "user-1").unwrap();
    assert_eq!(second.conflicts.len(), 1);
    let conflict = &second.conflicts[0];
    assert_eq!(conflict.resolution, Resolution::PreferNew);
    assert_eq!(conflict.old_fact.object, "Rex");
    assert_eq!(conflict.new_fact.object, "Max");
    assert_eq!(conflict.winning_object(), Some("Max"));

    let stored = db.facts_about("user-1", "dog");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].object, "Max");
}

#[test]
fn test_same_value_different_case_is_not_a_conflict() {
    let db = TestDatabaseManager::new_temp();
    let ingestor = db.ingestor();

    ingestor.ingest("I live in Boston", "user-1").unwrap();
    let report = ingestor.ingest("i live in BOSTON", "user-1").unwrap();

    assert_eq!(report.facts.len(), 1);
    assert!(report.conflicts.is_empty());
    assert_eq!(db.facts_about("user-1", "user").len(), 1);
}

#[test]
fn test_overwrite_holds_for_every_shared_key() {
    let db = TestDatabaseManager::new_temp();
    let store = db.fact_store();

    let pairs = [
        ("dog", "named", "Rex", "Max"),
        ("user", "lives_in", "Boston", "Denver"),
        ("user", "favorite_color", "blue", "green"),
    ];
    for (subject, predicate, first, second) in pairs {
        store
            .upsert(&ExtractedFact::new("user-1", subject, predicate, first, 0.8))
            .unwrap();
        store
            .upsert(&ExtractedFact::new("user-1", subject, predicate, second, 0.8))
            .unwrap();

        let stored: Vec<_> = db
            .facts_about("user-1", subject)
            .into_iter()
            .filter(|f| f.predicate == predicate)
            .collect();
        assert_eq!(stored.len(), 1, "{} {}", subject, predicate);
        assert_eq!(stored[0].object, second);
    }
}

#[test]
fn test_owners_are_isolated() {
    let db = TestDatabaseManager::new_temp();
    let ingestor = db.ingestor();

    ingestor.ingest("My dog is named Rex", "alice").unwrap();
    let report = ingestor.ingest("My dog is named Max", "bob").unwrap();

    assert!(report.conflicts.is_empty());
    assert_eq!(db.facts_about("alice", "dog")[0].object, "Rex");
    assert_eq!(db.facts_about("bob", "dog")[0].object, "Max");
}

#[test]
fn test_facts_survive_reopen() {
    let db = TestDatabaseManager::new_temp();
    db.ingestor()
        .ingest("My cat is named Luna. I work as a pilot.", "user-1")
        .unwrap();

    let reopened = db.reopen();
    let facts = reopened.query("user-1", None).unwrap();
    assert_eq!(facts.len(), 2);
    assert!(facts.iter().any(|f| f.subject == "cat" && f.object == "Luna"));
    assert!(facts.iter().any(|f| f.predicate == "occupation" && f.object == "pilot"));
}

// ============================================================================
// CONFLICT DETECTION
// ============================================================================

#[test]
fn test_conflict_detection_symmetry() {
    let detector = ConflictDetector::new();
    let old = ExtractedFact::new("u", "dog", "named", "Rex", 0.8);

    let differs = ExtractedFact::new("u", "dog", "named", "Max", 0.8);
    assert!(detector.detect(&differs, &[old.clone()]).is_some());

    let recased = ExtractedFact::new("u", "Dog", "NAMED", "rex", 0.8);
    assert!(detector.detect(&recased, &[old.clone()]).is_none());

    let other_predicate = ExtractedFact::new("u", "dog", "breed", "Max", 0.8);
    assert!(detector.detect(&other_predicate, &[old]).is_none());
}

#[test]
fn test_extraction_misses_are_empty() {
    let extractor = FactExtractor::new();
    assert!(extractor.extract("", "u").is_empty());
    assert!(extractor.extract("hmm, interesting weather", "u").is_empty());
}

// ============================================================================
// EXPLICIT CORRECTIONS
// ============================================================================

#[test]
fn test_user_corrects_then_forgets() {
    let db = TestDatabaseManager::new_temp();
    let ingestor = db.ingestor();
    let gateway = db.gateway();

    ingestor
        .ingest("My dog is named Rex and I live in Boston", "user-1")
        .unwrap();

    let message = "Actually, my dog is called Max";
    let intent = detect_correction_intent(message).unwrap();
    assert_eq!(intent.intent, CorrectionIntent::Update);

    let outcome = gateway
        .update_fact(
            "user-1",
            &UpdateFactRequest {
                subject: "dog".into(),
                predicate: "named".into(),
                new_value: "Max".into(),
                old_value: Some("Rex".into()),
                reason: message.into(),
            },
        )
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.previous_value.as_deref(), Some("Rex"));
    assert_eq!(db.facts_about("user-1", "dog")[0].object, "Max");

    let intent = detect_correction_intent("Please forget where I live").unwrap();
    assert_eq!(intent.intent, CorrectionIntent::Delete);

    let deleted = gateway
        .delete_fact(
            "user-1",
            &DeleteFactRequest {
                subject: "user".into(),
                predicate: Some("lives_in".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(deleted.success);
    assert_eq!(deleted.scope, DeleteScope::Predicate);
    assert_eq!(deleted.deleted_count, 1);

    let remaining = gateway.search_facts("user-1", "user", None).unwrap();
    assert_eq!(remaining.count, 0);
    assert_eq!(db.store.deletion_events("user-1").unwrap(), 2);
}

#[test]
fn test_correcting_missing_fact_reports_not_found() {
    let db = TestDatabaseManager::new_temp();
    let gateway = db.gateway();

    let outcome = gateway
        .delete_fact(
            "user-1",
            &DeleteFactRequest {
                subject: "boat".into(),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.deleted_count, 0);
    assert_eq!(outcome.scope, DeleteScope::Subject);
}

#[test]
fn test_update_is_idempotent() {
    let db = TestDatabaseManager::new_temp();
    let gateway = db.gateway();
    let request = UpdateFactRequest {
        subject: "user".into(),
        predicate: "favorite_food".into(),
        new_value: "ramen".into(),
        ..Default::default()
    };

    gateway.update_fact("user-1", &request).unwrap();
    let again = gateway.update_fact("user-1", &request).unwrap();

    assert!(again.success);
    assert!(again.conflict.is_none());
    let stored = db.facts_about("user-1", "user");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].object, "ramen");
}
