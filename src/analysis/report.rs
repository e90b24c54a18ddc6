//! Report assembly
//!
//! Runs every analyzer once and packages the results with summary counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::connections::{find_interdisciplinary_connections, Connection};
use super::locations::{find_hotspots, LocationSummary};
use super::network::{generate_domain_network, DomainNetwork};
use crate::index::ExperienceIndex;

/// Filters applied when assembling a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Diversity floor for the hotspot list
    pub hotspot_min_diversity: usize,
    /// How many interdisciplinary connections to include
    pub connection_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            hotspot_min_diversity: 3,
            connection_limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_experiences: usize,
    pub unique_learners: usize,
    pub unique_locations: usize,
    pub unique_domains: usize,
    pub interdisciplinary_experiences: usize,
}

/// Point-in-time snapshot of every analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    /// Every location, most diverse first
    pub location_map: Vec<LocationSummary>,
    pub learning_hotspots: Vec<LocationSummary>,
    pub interdisciplinary_connections: Vec<Connection>,
    pub domain_network: DomainNetwork,
}

pub fn generate_report(index: &ExperienceIndex, options: &ReportOptions) -> LearningReport {
    let mut connections = find_interdisciplinary_connections(index);
    let summary = ReportSummary {
        total_experiences: index.len(),
        unique_learners: index.learners().len(),
        unique_locations: index.locations().len(),
        unique_domains: index.domains().len(),
        interdisciplinary_experiences: connections.len(),
    };
    connections.truncate(options.connection_limit);

    LearningReport {
        generated_at: Utc::now(),
        summary,
        location_map: find_hotspots(index, 0),
        learning_hotspots: find_hotspots(index, options.hotspot_min_diversity),
        interdisciplinary_connections: connections,
        domain_network: generate_domain_network(index),
    }
}
