// Roster store: the ordered list of participants under management.
//
// The store owns the participants; the draw and grouping engines only ever
// work on cloned snapshots and never mutate the source list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A single participant on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque unique identifier, generated at creation time and never reused.
    pub id: String,
    /// Display name. Duplicates are allowed (detected, not prevented).
    pub name: String,
}

/// The full roster. Order is insertion order and is meaningful for display
/// numbering only.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    /// Id counter. Monotonic for the lifetime of the store so that ids are
    /// never reused, even across `clear()`.
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Add a batch of names, preserving input order.
    ///
    /// Each name is trimmed; empty and whitespace-only entries are dropped
    /// silently. Returns the number of participants actually added.
    pub fn add<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            self.next_id += 1;
            self.participants.push(Participant {
                id: format!("p{:06}", self.next_id),
                name: trimmed.to_string(),
            });
            added += 1;
        }
        added
    }

    /// Remove the participant with the given id.
    ///
    /// Returns `false` (not an error) when no participant matches.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        self.participants.len() < before
    }

    /// Remove all participants. Ids are not recycled.
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Keep the first occurrence of each distinct name (case-sensitive exact
    /// match), preserving the relative order of survivors.
    ///
    /// Returns the number of participants removed.
    pub fn dedupe(&mut self) -> usize {
        let before = self.participants.len();
        let mut seen: HashSet<String> = HashSet::new();
        self.participants.retain(|p| seen.insert(p.name.clone()));
        before - self.participants.len()
    }

    /// Names occurring 2+ times on the current roster.
    ///
    /// Pure and derived; recomputed from the current roster on every call.
    pub fn duplicate_names(&self) -> HashSet<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in &self.participants {
            *counts.entry(p.name.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Read-only view of the participants in insertion order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Cloned snapshot for the draw and grouping engines.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Demo roster for quickly trying the toolkit: 20 names plus one intentional
/// duplicate so the duplicate highlighting has something to show.
pub fn sample_names() -> Vec<&'static str> {
    vec![
        "陳大明", "林小華", "張三", "李四", "王五", "趙六", "錢七", "孫八", "周九", "吳十",
        "鄭美美", "王阿強", "李大壯", "林曉鈴", "郭小芬", "陳小志", "蔡中平", "徐如芳", "張大衛",
        "劉依婷", "陳大明",
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
