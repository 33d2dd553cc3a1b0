// Composition tests: the per-document pipeline, collector and runner together.
//
// These exercise the full flow from segmented sentences to the canonical
// mention table and its statistics. The runner test writes a small corpus
// under the system temp directory.

use std::path::PathBuf;
use std::sync::Arc;

use mention_tagger::matching::fuzzy::Bands;
use mention_tagger::matching::models::{Document, Strength, Tagger};
use mention_tagger::matching::topic::Topic;
use mention_tagger::mentions::stats::Level;
use mention_tagger::pipeline::collector::DocumentOutcome;
use mention_tagger::pipeline::corpus::{match_documents, run};

fn doc(work_id: &str, sentences: &[&str]) -> Document {
    Document::new(work_id, sentences.iter().map(|s| s.to_string()).collect())
}

fn census_topic() -> Topic {
    Topic::SurfaceForms(vec!["Census Data".to_string()])
}

// ============================================================
// End-to-end scenario
// ============================================================

#[test]
fn exact_mentions_survive_as_the_canonical_rows() {
    let topic = census_topic().compile().unwrap();
    let documents = vec![doc(
        "W1",
        &[
            "We used Census Data from 2020.",
            "No topic mentioned here.",
            "Census Data was cited again.",
        ],
    )];

    let result = match_documents(&documents, &topic, &Bands::default());

    // Exact finds sections 1 and 3; partial ratio scores both 100 for strong too
    assert_eq!(result.raw_matches.len(), 4);

    assert_eq!(result.mentions.len(), 2);
    let sections: Vec<usize> = result.mentions.iter().map(|m| m.mention.section_id).collect();
    assert_eq!(sections, vec![1, 3]);
    for m in &result.mentions {
        assert_eq!(m.mention.tag, "Census Data");
        assert_eq!(m.mention.strength, Strength::Exact);
        assert_eq!(m.mention.tagger, Tagger::Exact);
        assert_eq!(m.model, "rule_based");
    }

    let strong = result
        .stats
        .levels
        .iter()
        .find(|l| l.level == Level::Tier(Strength::Strong))
        .unwrap();
    assert_eq!((strong.raw, strong.deduplicated), (2, 0));
    assert_eq!(strong.percentage_lost, Some(100.0));
}

#[test]
fn weaker_specialisation_is_flagged_and_kept_at_its_own_location() {
    let topic = Topic::SurfaceForms(vec![
        "Census Data".to_string(),
        "1-year Census Data".to_string(),
    ])
    .compile()
    .unwrap();
    // "1-yr" vs "1-year": partial ratio 200 * 16 / 36 = 88.9, inside the strong band
    let documents = vec![doc("W1", &["Tables come from the 1-yr Census Data release."])];

    let result = match_documents(&documents, &topic, &Bands::default());

    // The longer alias is a different tag, so dedup keeps it alongside the exact row
    let longer: Vec<_> = result
        .mentions
        .iter()
        .filter(|m| m.mention.tag == "1-year Census Data")
        .collect();
    assert_eq!(longer.len(), 1);
    assert_eq!(longer[0].mention.strength, Strength::Strong);
    assert!(longer[0].mention.flag_for_secondary_review);

    assert!(result
        .mentions
        .iter()
        .any(|m| m.mention.tag == "Census Data" && m.mention.strength == Strength::Exact));
    assert_eq!(result.mentions.len(), 2);
}

#[test]
fn document_signals_and_outcomes_are_reported() {
    let topic = census_topic().compile().unwrap();
    let documents = vec![
        doc("A", &["Census Data appears."]),
        doc("B", &["Completely unrelated prose."]),
        doc("C", &[]),
    ];

    let result = match_documents(&documents, &topic, &Bands::default());

    // Nothing found in B or C; C is still reported as empty, not unmatched
    assert_eq!(result.broader_review_documents(), vec!["B", "C"]);
    assert_eq!(result.stats.documents.processed, 3);
    assert_eq!(result.stats.documents.with_matches, 1);
    assert_eq!(result.stats.documents.without_matches, 1);
    assert_eq!(result.stats.documents.empty, 1);
    assert_eq!(result.documents[2].outcome, DocumentOutcome::Empty);
}

// ============================================================
// Runner over files
// ============================================================

fn write_corpus(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mention-tagger-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    std::fs::write(
        dir.join("W1.txt"),
        "We used Census Data from 2020.\nNo topic mentioned here.\nCensus Data was cited again.\n",
    )
    .unwrap();
    std::fs::write(dir.join("W2.txt"), "Nothing about the topic.\n").unwrap();
    std::fs::write(dir.join("W3.txt"), "").unwrap();
    // Not UTF-8: this document fails to load but must not abort the run
    std::fs::write(dir.join("W4.txt"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
    std::fs::write(dir.join(".hidden"), "Census Data").unwrap();

    dir
}

#[tokio::test]
async fn runner_isolates_failed_documents() {
    let dir = write_corpus("runner");
    let paths = mention_tagger::loader::list_documents(&dir).unwrap();
    assert_eq!(paths.len(), 4);

    let topic = Arc::new(census_topic().compile().unwrap());
    let result = run(paths, topic, Bands::default(), 3).await.unwrap();

    assert_eq!(result.stats.documents.failed, 1);
    assert_eq!(result.stats.documents.processed, 3);
    assert_eq!(result.stats.documents.empty, 1);

    let work_ids: Vec<&str> = result.documents.iter().map(|d| d.work_id.as_str()).collect();
    assert_eq!(work_ids, vec!["W1", "W2", "W3", "W4"]);
    assert!(matches!(
        result.documents[3].outcome,
        DocumentOutcome::Failed { .. }
    ));

    // The empty file is kept apart from unmatched ones but still needs review
    assert_eq!(result.documents[2].outcome, DocumentOutcome::Empty);
    assert!(result.documents[2].needs_broader_review);
    assert!(!result.documents[3].needs_broader_review);

    assert_eq!(result.mentions.len(), 2);
    assert!(result.mentions.iter().all(|m| m.mention.work_id == "W1"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn runner_matches_sequential_result() {
    let dir = write_corpus("parity");
    let paths = mention_tagger::loader::list_documents(&dir).unwrap();
    let topic = census_topic().compile().unwrap();

    let documents: Vec<Document> = paths
        .iter()
        .filter_map(|p| mention_tagger::loader::read_document(p).ok())
        .collect();
    let sequential = match_documents(&documents, &topic, &Bands::default());

    let parallel = run(paths, Arc::new(topic), Bands::default(), 4).await.unwrap();

    assert_eq!(parallel.raw_matches, sequential.raw_matches);
    assert_eq!(parallel.mentions, sequential.mentions);
    assert_eq!(parallel.stats.levels, sequential.stats.levels);

    let _ = std::fs::remove_dir_all(&dir);
}
