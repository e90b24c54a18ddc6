//! Experience records
//!
//! An experience is one captured learning moment: who learned, where, and
//! what. `NewExperience` is the validated input shape; `Experience` is the
//! same record after identity and timestamp defaulting.

pub mod validation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use validation::{validate, FieldError, ValidationErrors};

/// Prefix shared by every generated experience ID
pub const ID_PREFIX: &str = "exp_";

/// Experience types offered by the capture prompts. Any non-empty tag is accepted.
pub const KNOWN_TYPES: &[&str] = &[
    "observation",
    "conversation",
    "experiment",
    "reading",
    "reflection",
    "question",
    "insight",
    "practice",
    "other",
];

/// Who learned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    /// Pseudonymous learner ID
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
}

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where the learning happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<String>,
}

/// Situational context of an experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningContext {
    pub location: Location,
}

/// What came out of an experience
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connections_made: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_questions: Vec<String>,
}

/// The learning itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Subjective intensity, 1-10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

/// Free-form annotations, used by export only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companions: Vec<String>,
}

/// How widely a record may be shared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Public,
    #[default]
    Anonymized,
    Private,
}

impl std::fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrivacyLevel::Public => write!(f, "public"),
            PrivacyLevel::Anonymized => write!(f, "anonymized"),
            PrivacyLevel::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for PrivacyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(PrivacyLevel::Public),
            "anonymized" => Ok(PrivacyLevel::Anonymized),
            "private" => Ok(PrivacyLevel::Private),
            other => Err(format!("unknown privacy level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Privacy {
    #[serde(default)]
    pub level: PrivacyLevel,
    #[serde(default)]
    pub shareable: bool,
}

/// A validated experience that may still lack an ID or timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExperience {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub learner: Learner,
    pub context: LearningContext,
    pub experience: ExperienceDetails,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
}

impl NewExperience {
    /// Minimal experience with the four required fields set
    pub fn new(learner_id: &str, location: &str, kind: &str, description: &str) -> Self {
        Self {
            id: None,
            timestamp: None,
            learner: Learner {
                id: learner_id.to_string(),
                name: None,
                background: None,
                interests: Vec::new(),
            },
            context: LearningContext {
                location: Location {
                    name: location.to_string(),
                    kind: None,
                    coordinates: None,
                    situation: None,
                    connections: Vec::new(),
                },
            },
            experience: ExperienceDetails {
                kind: kind.to_string(),
                description: description.to_string(),
                domains: Vec::new(),
                outcome: None,
                duration: None,
                intensity: None,
            },
            metadata: None,
            privacy: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.experience.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.context.location.coordinates = Some(Coordinates { latitude, longitude });
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.experience.outcome = Some(outcome);
        self
    }

    pub fn with_privacy(mut self, level: PrivacyLevel) -> Self {
        self.privacy = Some(Privacy { level, shareable: level == PrivacyLevel::Public });
        self
    }
}

/// A captured learning experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub learner: Learner,
    pub context: LearningContext,
    pub experience: ExperienceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub privacy: Privacy,
}

impl Experience {
    /// Build an experience, generating an ID and stamping the current time when absent
    pub fn create(new: NewExperience) -> Self {
        Self {
            id: new.id.unwrap_or_else(generate_id),
            timestamp: new.timestamp.unwrap_or_else(Utc::now),
            learner: new.learner,
            context: new.context,
            experience: new.experience,
            metadata: new.metadata,
            privacy: new.privacy.unwrap_or_default(),
        }
    }

    pub fn learner_id(&self) -> &str {
        &self.learner.id
    }

    pub fn location_name(&self) -> &str {
        &self.context.location.name
    }

    /// Domains with duplicates removed, first occurrence wins
    pub fn distinct_domains(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.experience.domains.len());
        for domain in &self.experience.domains {
            if !seen.contains(&domain.as_str()) {
                seen.push(domain.as_str());
            }
        }
        seen
    }

    /// More than one distinct domain
    pub fn is_interdisciplinary(&self) -> bool {
        self.distinct_domains().len() > 1
    }

    pub fn connections_made(&self) -> &[String] {
        self.experience
            .outcome
            .as_ref()
            .map(|o| o.connections_made.as_slice())
            .unwrap_or(&[])
    }

    pub fn next_questions(&self) -> &[String] {
        self.experience
            .outcome
            .as_ref()
            .map(|o| o.next_questions.as_slice())
            .unwrap_or(&[])
    }
}

/// Generate a fresh experience ID
pub fn generate_id() -> String {
    format!("{}{}", ID_PREFIX, uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_generates_id_and_timestamp() {
        let before = Utc::now();
        let exp = Experience::create(NewExperience::new("alice", "Library", "reading", "Read about tides"));
        assert!(exp.id.starts_with(ID_PREFIX));
        assert!(exp.id.len() > ID_PREFIX.len());
        assert!(exp.timestamp >= before);
        assert_eq!(exp.privacy.level, PrivacyLevel::Anonymized);
    }

    #[test]
    fn test_create_keeps_supplied_identity() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z").unwrap().with_timezone(&Utc);
        let exp = Experience::create(
            NewExperience::new("alice", "Library", "reading", "Read about tides")
                .with_id("exp_fixed")
                .with_timestamp(ts),
        );
        assert_eq!(exp.id, "exp_fixed");
        assert_eq!(exp.timestamp, ts);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_distinct_domains_dedupes_in_order() {
        let exp = Experience::create(
            NewExperience::new("a", "Park", "observation", "Birds")
                .with_domains(["biology", "math", "biology"]),
        );
        assert_eq!(exp.distinct_domains(), vec!["biology", "math"]);
        assert!(exp.is_interdisciplinary());

        let single = Experience::create(
            NewExperience::new("a", "Park", "observation", "Birds").with_domains(["biology", "biology"]),
        );
        assert!(!single.is_interdisciplinary());
    }

    #[test]
    fn test_serde_uses_type_keys() {
        let exp = Experience::create(NewExperience::new("a", "Park", "observation", "Birds"));
        let json = serde_json::to_value(&exp).unwrap();
        assert_eq!(json["experience"]["type"], "observation");
        assert_eq!(json["context"]["location"]["name"], "Park");
        let back: Experience = serde_json::from_value(json).unwrap();
        assert_eq!(back, exp);
    }

    #[test]
    fn test_privacy_level_parse() {
        assert_eq!("Public".parse::<PrivacyLevel>().unwrap(), PrivacyLevel::Public);
        assert!("secret".parse::<PrivacyLevel>().is_err());
        assert_eq!(PrivacyLevel::Private.to_string(), "private");
    }
}
