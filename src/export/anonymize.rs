//! Anonymization for exported records
//!
//! Learner IDs become stable pseudonyms (`learner-1`, `learner-2`, ... by first
//! appearance), identifying learner fields are dropped and e-mail addresses
//! and phone numbers in free text are redacted.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::experience::Experience;

static REDACTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap(), "[email]"),
        (Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap(), "[phone]"),
    ]
});

/// Replaces identifying details, keeping pseudonyms consistent across one export
#[derive(Debug, Default)]
pub struct Anonymizer {
    pseudonyms: HashMap<String, String>,
}

impl Anonymizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable pseudonym for a learner ID
    pub fn pseudonym(&mut self, learner_id: &str) -> String {
        let next = self.pseudonyms.len() + 1;
        self.pseudonyms
            .entry(learner_id.to_string())
            .or_insert_with(|| format!("learner-{}", next))
            .clone()
    }

    /// Redact contact details in free text
    pub fn scrub(&self, text: &str) -> String {
        REDACTIONS
            .iter()
            .fold(text.to_string(), |acc, (re, placeholder)| {
                re.replace_all(&acc, *placeholder).into_owned()
            })
    }

    /// Anonymized copy of a record
    pub fn anonymize(&mut self, record: &Experience) -> Experience {
        let mut out = record.clone();
        out.learner.id = self.pseudonym(&record.learner.id);
        out.learner.name = None;
        out.learner.background = None;
        out.experience.description = self.scrub(&record.experience.description);
        out.context.location.situation = out
            .context
            .location
            .situation
            .as_deref()
            .map(|s| self.scrub(s));
        if let Some(outcome) = out.experience.outcome.as_mut() {
            for text in outcome
                .connections_made
                .iter_mut()
                .chain(outcome.next_questions.iter_mut())
            {
                *text = self.scrub(text);
            }
        }
        if let Some(metadata) = out.metadata.as_mut() {
            metadata.companions.clear();
        }
        out
    }
}
