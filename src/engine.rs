//! Learning engine
//!
//! Ties validation, storage and the in-memory index together. A record is
//! written to the repository before it is committed to the index, so a
//! storage failure never leaves an in-memory-only record behind.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analysis::{self, Journey, LearningReport, ReportOptions};
use crate::config::Config;
use crate::experience::{validate, Experience, NewExperience};
use crate::index::{ExperienceIndex, Ingested};
use crate::store::{ExperienceRepository, FileRepository};

/// Outcome of importing a batch of raw records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// IDs of newly stored records
    pub imported: Vec<String>,
    /// Records already present with identical content
    pub unchanged: usize,
    /// (position in batch, error message)
    pub failures: Vec<(usize, String)>,
}

pub struct LearningEngine<R: ExperienceRepository> {
    index: ExperienceIndex,
    repository: R,
    options: ReportOptions,
}

impl LearningEngine<FileRepository> {
    /// Open the file repository described by `config` and load everything in it
    pub async fn open(config: &Config) -> Result<Self> {
        let repository = FileRepository::with_dir(config.storage_dir()?)?;
        let mut engine = Self::new(repository, config.analysis.report_options());
        engine.load().await?;
        Ok(engine)
    }
}

impl<R: ExperienceRepository> LearningEngine<R> {
    /// Create an engine with an empty index
    pub fn new(repository: R, options: ReportOptions) -> Self {
        Self {
            index: ExperienceIndex::new(),
            repository,
            options,
        }
    }

    /// Index every stored experience. Returns how many were new to the index.
    ///
    /// Stored records the index rejects are skipped with a warning.
    pub async fn load(&mut self) -> Result<usize> {
        let stored = self.repository.load_all().await?;
        let total = stored.len();
        let mut inserted = 0;
        for experience in stored {
            match self.index.ingest(experience) {
                Ok(Ingested::Inserted) => inserted += 1,
                Ok(Ingested::AlreadyPresent) => {}
                Err(e) => warn!("Skipping stored experience: {}", e),
            }
        }
        info!("Loaded {} of {} stored experiences", inserted, total);
        Ok(inserted)
    }

    /// Validate raw input, then record it
    pub async fn capture(&mut self, raw: &Value) -> Result<String> {
        let new = validate(raw)?;
        self.record(new).await
    }

    /// Create, persist and index a validated experience. Returns its ID.
    pub async fn record(&mut self, mut new: NewExperience) -> Result<String> {
        // Re-recording a known ID without a timestamp keeps the stored one
        if new.timestamp.is_none() {
            if let Some(existing) = new.id.as_deref().and_then(|id| self.index.get(id)) {
                new.timestamp = Some(existing.timestamp);
            }
        }
        let experience = Experience::create(new);
        let id = experience.id.clone();

        if self.index.check(&experience)? == Ingested::AlreadyPresent {
            info!("Experience {} already recorded", id);
            return Ok(id);
        }

        self.repository
            .save(&experience)
            .await
            .with_context(|| format!("Failed to store experience {}", id))?;
        self.index.ingest(experience)?;
        info!("Captured experience {}", id);
        Ok(id)
    }

    /// Import one JSON object or an array of them. Bad records are reported, not fatal.
    pub async fn import(&mut self, raw: &Value) -> Result<ImportSummary> {
        let items: Vec<&Value> = match raw {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let mut summary = ImportSummary::default();
        for (position, item) in items.into_iter().enumerate() {
            let before = self.index.len();
            match self.capture(item).await {
                Ok(id) if self.index.len() > before => summary.imported.push(id),
                Ok(_) => summary.unchanged += 1,
                Err(e) => {
                    warn!("Import of record {} failed: {:#}", position, e);
                    summary.failures.push((position, format!("{:#}", e)));
                }
            }
        }
        Ok(summary)
    }

    pub fn index(&self) -> &ExperienceIndex {
        &self.index
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn journey(&self, learner_id: &str) -> Option<Journey> {
        analysis::get_journey(&self.index, learner_id)
    }

    pub fn report(&self) -> LearningReport {
        analysis::generate_report(&self.index, &self.options)
    }

    /// Generate a report and store a snapshot of it
    pub async fn save_report(&self) -> Result<(LearningReport, PathBuf)> {
        let report = self.report();
        let path = self.repository.save_report(&report).await?;
        Ok((report, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::ValidationErrors;
    use crate::index::IndexError;
    use crate::store::MockExperienceRepository;
    use serde_json::json;

    fn raw(learner: &str, location: &str, domains: &[&str]) -> Value {
        json!({
            "learner": {"id": learner},
            "context": {"location": {"name": location}},
            "experience": {"type": "observation", "description": "noticed something", "domains": domains}
        })
    }

    #[tokio::test]
    async fn test_capture_persists_then_indexes() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save().times(1).returning(|_| Ok(()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let id = engine.capture(&raw("alice", "Library", &["math"])).await.unwrap();
        assert!(id.starts_with("exp_"));
        assert!(engine.index().get(&id).is_some());
        assert!(engine.index().learners().contains_key("alice"));
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_index_untouched() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let err = engine
            .capture(&raw("alice", "Library", &["math"]))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));
        assert!(engine.index().is_empty());
        assert!(engine.index().domains().is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_never_reaches_storage() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save().never();
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let err = engine
            .capture(&json!({"learner": {"id": "alice"}}))
            .await
            .unwrap_err();
        let validation = err.downcast_ref::<ValidationErrors>().unwrap();
        assert!(validation.has_path("context.location.name"));
        assert!(engine.index().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_capture() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save().times(1).returning(|_| Ok(()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let mut record = raw("alice", "Library", &["math"]);
        record["id"] = json!("exp_same");
        record["timestamp"] = json!("2024-01-01T00:00:00Z");
        engine.capture(&record).await.unwrap();
        assert_eq!(engine.capture(&record).await.unwrap(), "exp_same");
        assert_eq!(engine.index().len(), 1);

        record["experience"]["description"] = json!("something else entirely");
        let err = engine.capture(&record).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IndexError>(),
            Some(IndexError::IdConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_bulk_ingests() {
        let stored = vec![
            Experience::create(NewExperience::new("alice", "Park", "observation", "ducks")),
            Experience::create(NewExperience::new("bob", "Park", "observation", "geese")),
        ];
        let mut repo = MockExperienceRepository::new();
        repo.expect_load_all().times(1).returning(move || Ok(stored.clone()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        assert_eq!(engine.load().await.unwrap(), 2);
        assert_eq!(engine.index().locations().get("Park").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_skips_records_the_index_rejects() {
        let stored = vec![
            Experience::create(
                NewExperience::new("alice", "Park", "observation", "ducks").with_id("exp_good"),
            ),
            Experience::create(
                NewExperience::new("", "Park", "observation", "geese").with_id("exp_bad"),
            ),
            Experience::create(
                NewExperience::new("bob", "Park", "observation", "swans").with_id("exp_good"),
            ),
        ];
        let mut repo = MockExperienceRepository::new();
        repo.expect_load_all().times(1).returning(move || Ok(stored.clone()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        assert_eq!(engine.load().await.unwrap(), 1);
        assert_eq!(engine.index().len(), 1);
        assert_eq!(engine.index().get("exp_good").unwrap().learner_id(), "alice");
        assert!(engine.index().get("exp_bad").is_none());
    }

    #[tokio::test]
    async fn test_open_skips_invalid_stored_record() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::with_dir(dir.path().to_path_buf()).unwrap();
        repo.save(&Experience::create(
            NewExperience::new("alice", "Library", "reading", "tides").with_id("exp_good"),
        ))
        .await
        .unwrap();
        repo.save(&Experience::create(
            NewExperience::new("", "Library", "reading", "no learner").with_id("exp_bad"),
        ))
        .await
        .unwrap();

        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        let engine = LearningEngine::open(&config).await.unwrap();
        assert_eq!(engine.index().len(), 1);
        assert!(engine.index().get("exp_good").is_some());
    }

    #[tokio::test]
    async fn test_reimport_without_timestamp_is_unchanged() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save().times(1).returning(|_| Ok(()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let mut record = raw("alice", "Library", &["math"]);
        record["id"] = json!("exp_fixed");
        let batch = json!([record]);

        let first = engine.import(&batch).await.unwrap();
        assert_eq!(first.imported, vec!["exp_fixed"]);
        let second = engine.import(&batch).await.unwrap();
        assert!(second.imported.is_empty());
        assert_eq!(second.unchanged, 1);
        assert!(second.failures.is_empty());

        record["experience"]["description"] = json!("changed");
        let err = engine.capture(&record).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IndexError>(),
            Some(IndexError::IdConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_import_reports_failures_and_continues() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save().times(2).returning(|_| Ok(()));
        let mut engine = LearningEngine::new(repo, ReportOptions::default());

        let batch = json!([
            raw("alice", "Library", &["math"]),
            {"learner": {"id": "bob"}},
            raw("bob", "Park", &["art", "music"]),
        ]);
        let summary = engine.import(&batch).await.unwrap();
        assert_eq!(summary.imported.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].0, 1);
        assert_eq!(engine.report().summary.interdisciplinary_experiences, 1);
    }

    #[tokio::test]
    async fn test_save_report_uses_repository() {
        let mut repo = MockExperienceRepository::new();
        repo.expect_save_report()
            .times(1)
            .returning(|_| Ok(PathBuf::from("/tmp/report.json")));
        let engine = LearningEngine::new(repo, ReportOptions::default());

        let (report, path) = engine.save_report().await.unwrap();
        assert_eq!(report.summary.total_experiences, 0);
        assert_eq!(path, PathBuf::from("/tmp/report.json"));
    }
}
