//! Export of experiences and derived views
//!
//! Private records never leave the store. Records marked `anonymized` (or all
//! records, when requested) pass through the `Anonymizer` first. Graph and
//! report formats are computed from the filtered records, so excluded records
//! leave no trace in them either.

pub mod anonymize;
pub mod csv;
pub mod dot;
pub mod geojson;
pub mod markdown;

use anyhow::{Context, Result};
use tracing::debug;

use crate::analysis::{generate_domain_network, generate_report, ReportOptions};
use crate::experience::{Experience, PrivacyLevel};
use crate::index::ExperienceIndex;

pub use anonymize::Anonymizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    GeoJson,
    Dot,
    Markdown,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Dot => "dot",
            ExportFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::GeoJson => write!(f, "geojson"),
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "geojson" => Ok(ExportFormat::GeoJson),
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!(
                "unknown export format '{}' (expected json, csv, geojson, dot or markdown)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Anonymize every record, not only those marked `anonymized`
    pub anonymize: bool,
    /// Thresholds for the markdown report
    pub report: ReportOptions,
}

/// Records fit for export: private ones dropped, anonymized where required
pub fn prepare(records: &[Experience], anonymize_all: bool) -> Vec<Experience> {
    let mut anonymizer = Anonymizer::new();
    records
        .iter()
        .filter(|r| r.privacy.level != PrivacyLevel::Private)
        .map(|r| {
            if anonymize_all || r.privacy.level == PrivacyLevel::Anonymized {
                anonymizer.anonymize(r)
            } else {
                r.clone()
            }
        })
        .collect()
}

/// Render the index in the given format
pub fn export(index: &ExperienceIndex, format: ExportFormat, options: &ExportOptions) -> Result<String> {
    let records = prepare(index.records(), options.anonymize);
    debug!(
        "Exporting {} of {} experiences as {}",
        records.len(),
        index.len(),
        format
    );

    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&records).context("Failed to serialize experiences")
        }
        ExportFormat::Csv => Ok(csv::to_csv(&records)),
        ExportFormat::GeoJson => geojson::to_geojson(&records),
        ExportFormat::Dot | ExportFormat::Markdown => {
            let mut filtered = ExperienceIndex::new();
            filtered
                .bulk_load(records)
                .context("Failed to index exported experiences")?;
            if format == ExportFormat::Dot {
                Ok(dot::to_dot(&generate_domain_network(&filtered)))
            } else {
                Ok(markdown::render_report(&generate_report(&filtered, &options.report)))
            }
        }
    }
}
