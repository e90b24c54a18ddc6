//! Key → id-set map that remembers the order keys first appeared in

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Maps a key (location name, domain, learner ID) to the set of record IDs filed under it
#[derive(Debug, Clone, Default)]
pub struct KeyedIndex {
    order: Vec<String>,
    sets: HashMap<String, BTreeSet<String>>,
}

impl KeyedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `id` under `key`. Returns false if it was already there.
    pub fn insert(&mut self, key: &str, id: &str) -> bool {
        match self.sets.get_mut(key) {
            Some(set) => set.insert(id.to_string()),
            None => {
                self.order.push(key.to_string());
                self.sets
                    .insert(key.to_string(), BTreeSet::from([id.to_string()]));
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sets.contains_key(key)
    }

    /// Keys in first-appearance order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// (key, ids) pairs in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.order
            .iter()
            .filter_map(move |k| self.sets.get(k).map(|set| (k.as_str(), set)))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Order-free copy of the contents, for comparing two indices
    pub fn to_map(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.sets
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
