//! Experience storage
//!
//! One pretty-printed JSON file per experience under `<data_dir>/experiences/`,
//! named after the experience ID, plus timestamped report snapshots under
//! `<data_dir>/reports/`.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::analysis::LearningReport;
use crate::experience::Experience;

/// Durable home for captured experiences
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Every stored experience
    async fn load_all(&self) -> Result<Vec<Experience>>;

    /// Store one experience, replacing any file with the same ID
    async fn save(&self, experience: &Experience) -> Result<()>;

    /// Store a report snapshot and return where it went
    async fn save_report(&self, report: &LearningReport) -> Result<PathBuf>;
}

/// Filesystem-backed repository
pub struct FileRepository {
    base_dir: PathBuf,
}

impl FileRepository {
    /// Open with a custom base directory
    pub fn with_dir(base_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(base_dir.join("experiences"))
            .context("Failed to create experiences directory")?;
        std::fs::create_dir_all(base_dir.join("reports"))
            .context("Failed to create reports directory")?;
        Ok(Self { base_dir })
    }

    pub fn experiences_dir(&self) -> PathBuf {
        self.base_dir.join("experiences")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    fn experience_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(|c: char| c == '/' || c == '\\') || id.starts_with('.') {
            anyhow::bail!("Experience ID '{}' cannot be used as a file name", id);
        }
        Ok(self.experiences_dir().join(format!("{}.json", id)))
    }
}

#[async_trait::async_trait]
impl ExperienceRepository for FileRepository {
    async fn load_all(&self) -> Result<Vec<Experience>> {
        let dir = self.experiences_dir();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("Failed to read {}", dir.display()))?;

        let mut experiences = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<Experience>(&content) {
                Ok(experience) => experiences.push(experience),
                Err(e) => warn!("Skipping unreadable experience file {}: {}", path.display(), e),
            }
        }

        // Directory order is arbitrary; keep loads reproducible
        experiences.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        debug!("Loaded {} experiences from {}", experiences.len(), dir.display());
        Ok(experiences)
    }

    async fn save(&self, experience: &Experience) -> Result<()> {
        let path = self.experience_path(&experience.id)?;
        let json = serde_json::to_string_pretty(experience)
            .context("Failed to serialize experience")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved experience {} to {}", experience.id, path.display());
        Ok(())
    }

    async fn save_report(&self, report: &LearningReport) -> Result<PathBuf> {
        let path = self
            .reports_dir()
            .join(format!("report-{}.json", Utc::now().format("%Y%m%d-%H%M%S%3f")));
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved report to {}", path.display());
        Ok(path)
    }
}
