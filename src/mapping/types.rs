use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{RoundId, Slot, TeamId};

/// Why a round could not be mapped. Local to the round; never aborts a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum MappingFailure {
    /// `matched_teams` counts every team with any roster overlap, ambiguous ones included.
    /// `viable_teams` counts only teams with a preferred slot, so a lone tied team reports
    /// `matched_teams: 1, viable_teams: 0`. Read `matched_teams` for "teams that matched".
    #[error(
        "insufficient matches: {viable_teams} viable of {matched_teams} matched team(s), at least 2 required"
    )]
    InsufficientMatches {
        matched_teams: usize,
        viable_teams: usize,
    },
    #[error("ambiguous or conflicting assignment: {detail}")]
    AmbiguousOrConflictingAssignment { detail: String },
}

impl MappingFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            MappingFailure::InsufficientMatches { .. } => FailureKind::InsufficientMatches,
            MappingFailure::AmbiguousOrConflictingAssignment { .. } => {
                FailureKind::AmbiguousOrConflictingAssignment
            }
        }
    }
}

/// Failure reason without its detail, used for counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FailureKind {
    InsufficientMatches,
    AmbiguousOrConflictingAssignment,
}

impl FailureKind {
    pub fn as_str(&self) -> &str {
        match self {
            FailureKind::InsufficientMatches => "insufficient_matches",
            FailureKind::AmbiguousOrConflictingAssignment => "ambiguous_or_conflicting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotAssignment {
    pub team_id: TeamId,
    pub slot: Slot,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MappingStatus {
    Resolved {
        team1: SlotAssignment,
        team2: SlotAssignment,
    },
    Failed(MappingFailure),
}

/// Outcome of mapping one round. Built fresh per invocation; persisting it is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMapping {
    pub round_id: RoundId,
    pub status: MappingStatus,
}

impl TeamMapping {
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, MappingStatus::Resolved { .. })
    }

    pub fn assignments(&self) -> Option<[SlotAssignment; 2]> {
        match self.status {
            MappingStatus::Resolved { team1, team2 } => Some([team1, team2]),
            MappingStatus::Failed(_) => None,
        }
    }

    pub fn team_in(&self, slot: Slot) -> Option<TeamId> {
        self.assignments()?
            .into_iter()
            .find(|a| a.slot == slot)
            .map(|a| a.team_id)
    }

    pub fn failure(&self) -> Option<&MappingFailure> {
        match &self.status {
            MappingStatus::Failed(reason) => Some(reason),
            MappingStatus::Resolved { .. } => None,
        }
    }
}

/// Unresolved rounds per failure reason
pub fn failure_counts(mappings: &[TeamMapping]) -> BTreeMap<FailureKind, usize> {
    let mut counts = BTreeMap::new();
    for failure in mappings.iter().filter_map(|m| m.failure()) {
        *counts.entry(failure.kind()).or_insert(0) += 1;
    }
    counts
}
