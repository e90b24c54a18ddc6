//! Location aggregation and hotspot ranking

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::experience::Coordinates;
use crate::index::ExperienceIndex;

/// Aggregate view of everything learned at one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub name: String,
    /// Number of experiences recorded here
    pub count: usize,
    /// Number of distinct learners
    pub learners: usize,
    /// Union of domains, first-seen order
    pub domains: Vec<String>,
    /// Union of experience types, first-seen order
    pub types: Vec<String>,
    /// Number of distinct domains
    pub diversity: usize,
    /// Coordinates of the first experience here that had any
    pub coordinates: Option<Coordinates>,
}

/// Location summaries in the order locations were first seen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationMap {
    entries: Vec<LocationSummary>,
}

impl LocationMap {
    pub fn get(&self, name: &str) -> Option<&LocationSummary> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<LocationSummary> {
        self.entries
    }
}

/// Summarize every indexed location
pub fn map_by_location(index: &ExperienceIndex) -> LocationMap {
    let entries = index
        .locations()
        .iter()
        .map(|(name, ids)| summarize(index, name, ids))
        .collect();
    LocationMap { entries }
}

fn summarize<'a, I>(index: &ExperienceIndex, name: &str, ids: I) -> LocationSummary
where
    I: IntoIterator<Item = &'a String>,
{
    let records = index.records_for(ids);
    let mut learners = HashSet::new();
    let mut domains: Vec<String> = Vec::new();
    let mut types: Vec<String> = Vec::new();
    let mut coordinates = None;

    for record in &records {
        learners.insert(record.learner_id());
        for domain in &record.experience.domains {
            if !domains.contains(domain) {
                domains.push(domain.clone());
            }
        }
        if !types.contains(&record.experience.kind) {
            types.push(record.experience.kind.clone());
        }
        if coordinates.is_none() {
            coordinates = record.context.location.coordinates;
        }
    }

    LocationSummary {
        name: name.to_string(),
        count: records.len(),
        learners: learners.len(),
        diversity: domains.len(),
        domains,
        types,
        coordinates,
    }
}

/// Locations with at least `min_diversity` distinct domains, most diverse first.
///
/// Equal diversity keeps first-appearance order.
pub fn find_hotspots(index: &ExperienceIndex, min_diversity: usize) -> Vec<LocationSummary> {
    let mut hotspots: Vec<LocationSummary> = map_by_location(index)
        .into_vec()
        .into_iter()
        .filter(|loc| loc.diversity >= min_diversity)
        .collect();
    hotspots.sort_by(|a, b| b.diversity.cmp(&a.diversity));
    hotspots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::{Experience, NewExperience};

    fn add(index: &mut ExperienceIndex, learner: &str, location: &str, kind: &str, domains: &[&str]) {
        index
            .ingest(Experience::create(
                NewExperience::new(learner, location, kind, "noted")
                    .with_domains(domains.iter().copied()),
            ))
            .unwrap();
    }

    #[test]
    fn test_library_scenario() {
        let mut index = ExperienceIndex::new();
        add(&mut index, "alice", "Library", "reading", &["math"]);
        add(&mut index, "alice", "Library", "reading", &["math", "art"]);
        add(&mut index, "bob", "Library", "conversation", &["art", "music"]);

        let map = map_by_location(&index);
        let library = map.get("Library").unwrap();
        assert_eq!(library.count, 3);
        assert_eq!(library.learners, 2);
        assert_eq!(library.diversity, 3);
        assert_eq!(library.domains, vec!["math", "art", "music"]);
        assert_eq!(library.types, vec!["reading", "conversation"]);
    }

    #[test]
    fn test_first_coordinates_win() {
        let mut index = ExperienceIndex::new();
        index
            .ingest(Experience::create(NewExperience::new("a", "Pier", "observation", "no gps")))
            .unwrap();
        index
            .ingest(Experience::create(
                NewExperience::new("a", "Pier", "observation", "gps").with_coordinates(10.0, 20.0),
            ))
            .unwrap();
        index
            .ingest(Experience::create(
                NewExperience::new("b", "Pier", "observation", "later gps").with_coordinates(-5.0, 7.5),
            ))
            .unwrap();

        let pier = map_by_location(&index).get("Pier").cloned().unwrap();
        assert_eq!(
            pier.coordinates,
            Some(Coordinates { latitude: 10.0, longitude: 20.0 })
        );
    }

    #[test]
    fn test_hotspots_filter_and_stable_ties() {
        let mut index = ExperienceIndex::new();
        add(&mut index, "a", "Cafe", "conversation", &["art", "history"]);
        add(&mut index, "a", "Lab", "experiment", &["chemistry", "physics", "math"]);
        add(&mut index, "b", "Park", "observation", &["biology", "art"]);
        add(&mut index, "b", "Attic", "reading", &["history"]);

        let names = |v: Vec<LocationSummary>| v.into_iter().map(|l| l.name).collect::<Vec<_>>();
        assert_eq!(names(find_hotspots(&index, 2)), vec!["Lab", "Cafe", "Park"]);
        assert_eq!(names(find_hotspots(&index, 3)), vec!["Lab"]);
        assert_eq!(names(find_hotspots(&index, 0)), vec!["Lab", "Cafe", "Park", "Attic"]);
        assert!(find_hotspots(&index, 4).is_empty());
    }

    #[test]
    fn test_diversity_never_decreases() {
        let mut index = ExperienceIndex::new();
        add(&mut index, "a", "Garden", "observation", &["botany"]);
        let before = map_by_location(&index).get("Garden").unwrap().diversity;
        add(&mut index, "b", "Garden", "observation", &["botany", "poetry"]);
        let after = map_by_location(&index).get("Garden").unwrap().diversity;
        assert!(after >= before);
        assert_eq!(after, 2);
    }
}
