//! Learner journeys
//!
//! Reconstructs one learner's experiences in time order, noting when each
//! domain first showed up and which questions the learner was left with.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::index::ExperienceIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub domains: Vec<String>,
    pub description: String,
}

/// Domains a learner met for the first time in one experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvolution {
    pub timestamp: DateTime<Utc>,
    pub new_domains: Vec<String>,
    /// Location where they were first met
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub learner: String,
    pub timeline: Vec<TimelineEntry>,
    pub domain_evolution: Vec<DomainEvolution>,
    pub questions_emerged: Vec<String>,
}

/// Journey for one learner, or `None` if the learner has no experiences
pub fn get_journey(index: &ExperienceIndex, learner_id: &str) -> Option<Journey> {
    let ids = index.learners().get(learner_id)?;
    let mut records = index.records_for(ids);
    // stable: equal timestamps keep ingestion order
    records.sort_by_key(|r| r.timestamp);

    let mut timeline = Vec::with_capacity(records.len());
    let mut domain_evolution = Vec::new();
    let mut questions_emerged = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in records.iter().copied() {
        timeline.push(TimelineEntry {
            id: record.id.clone(),
            timestamp: record.timestamp,
            location: record.location_name().to_string(),
            kind: record.experience.kind.clone(),
            domains: record.experience.domains.clone(),
            description: record.experience.description.clone(),
        });

        let new_domains: Vec<String> = record
            .distinct_domains()
            .into_iter()
            .filter(|d| seen.insert(*d))
            .map(str::to_string)
            .collect();
        if !new_domains.is_empty() {
            domain_evolution.push(DomainEvolution {
                timestamp: record.timestamp,
                new_domains,
                context: record.location_name().to_string(),
            });
        }

        questions_emerged.extend(record.next_questions().iter().cloned());
    }

    Some(Journey {
        learner: learner_id.to_string(),
        timeline,
        domain_evolution,
        questions_emerged,
    })
}
