// Grouping engine: shuffle the roster and deal participants round-robin
// into balanced teams.
//
// Pure computation: every run produces a fresh team set from a roster
// snapshot; nothing is kept between runs.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::roster::Participant;

/// How the number of teams is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingMode {
    /// Target members per team; team count = ceil(roster / size).
    BySize(usize),
    /// Exact team count. Deliberately not clamped to the roster size, so
    /// requesting more teams than participants yields empty teams.
    ByCount(usize),
}

/// A named, ordered subset of the roster produced by one grouping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub members: Vec<Participant>,
}

/// Number of teams a grouping run will produce, clamped to at least 1.
pub fn team_count(mode: GroupingMode, roster_len: usize) -> usize {
    let count = match mode {
        GroupingMode::BySize(size) => roster_len.div_ceil(size.max(1)),
        GroupingMode::ByCount(count) => count,
    };
    count.max(1)
}

/// Run one grouping: uniformly shuffle the snapshot (Fisher-Yates), create
/// `k` teams named "Team 1".."Team k", and deal the permuted sequence
/// round-robin so position `i` lands in team `i % k`.
///
/// Guarantees: every participant appears in exactly one team, and team sizes
/// differ by at most one.
pub fn perform_grouping<R: Rng>(
    snapshot: &[Participant],
    mode: GroupingMode,
    rng: &mut R,
) -> Vec<Team> {
    let count = team_count(mode, snapshot.len());

    let mut shuffled = snapshot.to_vec();
    shuffled.shuffle(rng);

    let mut teams: Vec<Team> = (1..=count)
        .map(|i| Team {
            id: format!("team-{i}"),
            name: format!("Team {i}"),
            members: Vec::new(),
        })
        .collect();

    for (i, participant) in shuffled.into_iter().enumerate() {
        teams[i % count].members.push(participant);
    }

    teams
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
