//! End-to-end: capture through the file repository, reopen, analyze

use learning_atlas::config::Config;
use learning_atlas::{ExperienceRepository, FileRepository, LearningEngine, ReportOptions};
use serde_json::json;
use tempfile::TempDir;

fn raw(id: &str, learner: &str, timestamp: &str, domains: &[&str]) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": timestamp,
        "learner": {"id": learner},
        "context": {"location": {"name": "Library", "type": "library"}},
        "experience": {
            "type": "reading",
            "description": format!("{} reading about {}", learner, domains.join(" and ")),
            "domains": domains,
        },
        "privacy": {"level": "public", "shareable": true},
    })
}

async fn seeded(dir: &TempDir) -> anyhow::Result<LearningEngine<FileRepository>> {
    let repo = FileRepository::with_dir(dir.path().to_path_buf())?;
    let mut engine = LearningEngine::new(repo, ReportOptions::default());
    engine.capture(&raw("exp_1", "alice", "2024-03-01T09:00:00Z", &["math"])).await?;
    engine.capture(&raw("exp_2", "alice", "2024-03-02T09:00:00Z", &["math", "art"])).await?;
    engine.capture(&raw("exp_3", "bob", "2024-03-03T09:00:00Z", &["art", "music"])).await?;
    Ok(engine)
}

#[tokio::test]
async fn test_library_location_and_network() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let engine = seeded(&dir).await?;

    let map = learning_atlas::map_by_location(engine.index());
    let library = map.get("Library").expect("library summary");
    assert_eq!(library.count, 3);
    assert_eq!(library.learners, 2);
    assert_eq!(library.diversity, 3);
    assert_eq!(library.domains, vec!["math", "art", "music"]);

    let network = learning_atlas::generate_domain_network(engine.index());
    let sizes: Vec<(&str, usize)> = network.nodes.iter().map(|n| (n.id.as_str(), n.size)).collect();
    assert_eq!(sizes, vec![("math", 2), ("art", 2), ("music", 1)]);
    assert_eq!(network.edges.len(), 2);
    assert_eq!(network.weight("math", "art"), Some(1));
    assert_eq!(network.weight("art", "music"), Some(1));
    assert_eq!(network.weight("math", "music"), None);
    Ok(())
}

#[tokio::test]
async fn test_reopen_restores_index() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let before = seeded(&dir).await?.report();

    let config = Config {
        storage: learning_atlas::config::StorageConfig {
            data_dir: Some(dir.path().to_path_buf()),
        },
        ..Config::default()
    };
    let reopened = LearningEngine::open(&config).await?;
    let after = reopened.report();

    assert_eq!(after.summary, before.summary);
    assert_eq!(after.domain_network, before.domain_network);
    assert_eq!(after.location_map, before.location_map);
    Ok(())
}

#[tokio::test]
async fn test_hotspots_and_journey() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let engine = seeded(&dir).await?;

    let hotspots = learning_atlas::find_hotspots(engine.index(), 3);
    assert_eq!(hotspots.len(), 1);
    assert!(learning_atlas::find_hotspots(engine.index(), 4).is_empty());

    let journey = engine.journey("alice").expect("alice journey");
    assert_eq!(journey.timeline.len(), 2);
    assert_eq!(journey.domain_evolution.len(), 2);
    assert_eq!(journey.domain_evolution[1].new_domains, vec!["art"]);
    assert!(engine.journey("carol").is_none());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_capture_is_idempotent() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut engine = seeded(&dir).await?;

    let summary = engine
        .import(&json!([raw("exp_1", "alice", "2024-03-01T09:00:00Z", &["math"])]))
        .await?;
    assert!(summary.imported.is_empty());
    assert_eq!(summary.unchanged, 1);
    assert_eq!(engine.index().len(), 3);

    let conflict = engine
        .capture(&raw("exp_1", "alice", "2024-03-01T09:00:00Z", &["history"]))
        .await;
    assert!(conflict.is_err());

    let stored = FileRepository::with_dir(dir.path().to_path_buf())?.load_all().await?;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].experience.domains, vec!["math"]);
    Ok(())
}

#[tokio::test]
async fn test_reimport_of_undated_batch_is_unchanged() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut engine = seeded(&dir).await?;

    let mut undated = raw("exp_fixed", "carol", "2024-01-01T00:00:00Z", &["biology"]);
    undated.as_object_mut().expect("object").remove("timestamp");
    let batch = json!([undated]);

    let first = engine.import(&batch).await?;
    assert_eq!(first.imported, vec!["exp_fixed"]);

    let second = engine.import(&batch).await?;
    assert!(second.imported.is_empty());
    assert_eq!(second.unchanged, 1);
    assert!(second.failures.is_empty());
    assert_eq!(engine.index().len(), 4);
    Ok(())
}
