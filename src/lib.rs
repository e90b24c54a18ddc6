//! Learning Atlas - learning experience analytics
//!
//! Records where, what and how people learn, and derives:
//! - Interdisciplinary connections (experiences spanning several domains)
//! - A location map with learning hotspots
//! - A domain co-occurrence network
//! - Per-learner journeys
//! - Aggregate reports and exports (JSON, CSV, GeoJSON, DOT, Markdown)
//!
//! # Example
//!
//! ```ignore
//! use learning_atlas::{Config, LearningEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = LearningEngine::open(&Config::load()?).await?;
//!     let report = engine.report();
//!     println!("{} experiences", report.summary.total_experiences);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod experience;
pub mod index;
pub mod analysis;
pub mod config;
pub mod store;
pub mod engine;
pub mod export;
pub mod cli;

// Re-export commonly used types for convenience
pub use experience::{
    validate,
    Experience,
    NewExperience,
    PrivacyLevel,
    ValidationErrors,
};

pub use index::{ExperienceIndex, IndexError, Ingested};

pub use analysis::{
    find_hotspots,
    find_interdisciplinary_connections,
    generate_domain_network,
    generate_report,
    get_journey,
    map_by_location,
    LearningReport,
    ReportOptions,
};

pub use config::Config;
pub use engine::{ImportSummary, LearningEngine};
pub use export::{ExportFormat, ExportOptions};
pub use store::{ExperienceRepository, FileRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Learning experience analytics", NAME, VERSION)
}
