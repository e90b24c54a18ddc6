//! In-memory experience index
//!
//! Owns the record set and three derived lookups (location, domain, learner),
//! each mapping a key to the IDs of the records filed under it. Mutated only
//! through `ingest` and `bulk_load`; the analyzers in `crate::analysis` read it.

pub mod keyed;

use std::collections::HashMap;

use tracing::debug;

use crate::experience::Experience;

pub use keyed::KeyedIndex;

/// Result of a successful ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// First time this ID was seen
    Inserted,
    /// Same ID and identical content already indexed; nothing changed
    AlreadyPresent,
}

/// Data-integrity problems detected while indexing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("experience {id} is already indexed with different content")]
    IdConflict { id: String },

    #[error("experience {id} is missing required field {field}")]
    MissingField { id: String, field: &'static str },
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceIndex {
    /// Records in ingestion order
    records: Vec<Experience>,
    positions: HashMap<String, usize>,
    by_location: KeyedIndex,
    by_domain: KeyedIndex,
    by_learner: KeyedIndex,
}

impl ExperienceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report what `ingest` would do with this record, without changing anything
    pub fn check(&self, record: &Experience) -> Result<Ingested, IndexError> {
        let required = [
            ("id", record.id.as_str()),
            ("learner.id", record.learner_id()),
            ("context.location.name", record.location_name()),
            ("experience.type", record.experience.kind.as_str()),
            ("experience.description", record.experience.description.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IndexError::MissingField {
                    id: record.id.clone(),
                    field,
                });
            }
        }

        match self.get(&record.id) {
            Some(existing) if existing == record => Ok(Ingested::AlreadyPresent),
            Some(_) => Err(IndexError::IdConflict {
                id: record.id.clone(),
            }),
            None => Ok(Ingested::Inserted),
        }
    }

    /// Add one record and file its ID under its location, domains and learner
    pub fn ingest(&mut self, record: Experience) -> Result<Ingested, IndexError> {
        if self.check(&record)? == Ingested::AlreadyPresent {
            debug!("Experience {} already indexed", record.id);
            return Ok(Ingested::AlreadyPresent);
        }

        let id = record.id.as_str();
        let location = record.location_name();
        if !location.trim().is_empty() {
            self.by_location.insert(location, id);
        }
        for domain in &record.experience.domains {
            self.by_domain.insert(domain, id);
        }
        self.by_learner.insert(record.learner_id(), id);

        debug!(
            "Indexed {} (location={}, domains={})",
            id,
            location,
            record.experience.domains.len()
        );
        self.positions.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(Ingested::Inserted)
    }

    /// Ingest records in any order. Returns how many were new.
    ///
    /// Stops at the first integrity error; records before it stay indexed.
    pub fn bulk_load<I>(&mut self, records: I) -> Result<usize, IndexError>
    where
        I: IntoIterator<Item = Experience>,
    {
        let mut inserted = 0;
        for record in records {
            if self.ingest(record)? == Ingested::Inserted {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub fn get(&self, id: &str) -> Option<&Experience> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    /// Ingestion position of a record
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// All records in ingestion order
    pub fn records(&self) -> &[Experience] {
        &self.records
    }

    /// Records whose IDs are in `ids`, in ingestion order
    pub fn records_for<'a, I>(&self, ids: I) -> Vec<&Experience>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut positions: Vec<usize> = ids
            .into_iter()
            .filter_map(|id| self.position(id))
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|pos| &self.records[pos]).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn locations(&self) -> &KeyedIndex {
        &self.by_location
    }

    pub fn domains(&self) -> &KeyedIndex {
        &self.by_domain
    }

    pub fn learners(&self) -> &KeyedIndex {
        &self.by_learner
    }
}
