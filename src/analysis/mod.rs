//! Pattern analyzers
//!
//! Read-only algorithms over an `ExperienceIndex`. Each returns an owned
//! snapshot; nothing here mutates the index.

pub mod connections;
pub mod journey;
pub mod locations;
pub mod network;
pub mod report;

pub use connections::{find_interdisciplinary_connections, Connection};
pub use journey::{get_journey, DomainEvolution, Journey, TimelineEntry};
pub use locations::{find_hotspots, map_by_location, LocationMap, LocationSummary};
pub use network::{generate_domain_network, DomainEdge, DomainNetwork, DomainNode};
pub use report::{generate_report, LearningReport, ReportOptions, ReportSummary};
