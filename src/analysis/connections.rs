//! Interdisciplinary connection finder

use serde::{Deserialize, Serialize};

use crate::index::ExperienceIndex;

/// An experience that spans more than one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    /// Distinct domains, first occurrence order
    pub domains: Vec<String>,
    pub description: String,
    pub location: String,
    /// Connections the learner reported making, if any
    pub unexpected: Vec<String>,
}

/// Every record with two or more distinct domains, in ingestion order
pub fn find_interdisciplinary_connections(index: &ExperienceIndex) -> Vec<Connection> {
    index
        .records()
        .iter()
        .filter(|record| record.is_interdisciplinary())
        .map(|record| Connection {
            id: record.id.clone(),
            domains: record
                .distinct_domains()
                .into_iter()
                .map(str::to_string)
                .collect(),
            description: record.experience.description.clone(),
            location: record.location_name().to_string(),
            unexpected: record.connections_made().to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::{Experience, NewExperience, Outcome};

    fn add(index: &mut ExperienceIndex, id: &str, domains: &[&str]) {
        index
            .ingest(Experience::create(
                NewExperience::new("alice", "Library", "reading", id)
                    .with_id(id)
                    .with_domains(domains.iter().copied()),
            ))
            .unwrap();
    }

    #[test]
    fn test_threshold_is_two_domains() {
        let mut index = ExperienceIndex::new();
        add(&mut index, "exp_none", &[]);
        add(&mut index, "exp_one", &["math"]);
        add(&mut index, "exp_two", &["math", "art"]);
        add(&mut index, "exp_dup", &["art", "art"]);
        add(&mut index, "exp_three", &["art", "music", "math"]);

        let ids: Vec<_> = find_interdisciplinary_connections(&index)
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["exp_two", "exp_three"]);
    }

    #[test]
    fn test_unexpected_comes_from_outcome() {
        let mut index = ExperienceIndex::new();
        index
            .ingest(Experience::create(
                NewExperience::new("bob", "Kitchen", "experiment", "Bread rising")
                    .with_id("exp_bread")
                    .with_domains(["chemistry", "cooking"])
                    .with_outcome(Outcome {
                        success: Some(true),
                        connections_made: vec!["yeast is a chemistry lab".into()],
                        next_questions: vec![],
                    }),
            ))
            .unwrap();

        let found = find_interdisciplinary_connections(&index);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location, "Kitchen");
        assert_eq!(found[0].domains, vec!["chemistry", "cooking"]);
        assert_eq!(found[0].unexpected, vec!["yeast is a chemistry lab"]);
    }
}
