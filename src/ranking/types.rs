use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    Fixture, MatchKey, RoundId, RoundRecord, Scope, Slot, TeamId, TeamPair, TournamentId,
};
use crate::errors::RankingError;
use crate::mapping::{FailureKind, TeamMapping};

/// A round together with the teams its resolved mapping placed in each slot
#[derive(Debug, Clone, Copy)]
pub struct MappedRound<'a> {
    pub round: &'a RoundRecord,
    pub team1: TeamId,
    pub team2: TeamId,
}

impl<'a> MappedRound<'a> {
    /// `None` unless the mapping is resolved
    pub fn new(round: &'a RoundRecord, mapping: &TeamMapping) -> Option<Self> {
        Some(Self {
            round,
            team1: mapping.team_in(Slot::Team1)?,
            team2: mapping.team_in(Slot::Team2)?,
        })
    }

    pub fn slot_of(&self, team_id: TeamId) -> Option<Slot> {
        if team_id == self.team1 {
            Some(Slot::Team1)
        } else if team_id == self.team2 {
            Some(Slot::Team2)
        } else {
            None
        }
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            tournament_id: self.round.tournament_id,
            week: self.round.week.clone(),
            teams: TeamPair::new(self.team1, self.team2),
            fixture: match self.round.match_id {
                Some(match_id) => Fixture::Match(match_id),
                None => Fixture::Standalone(self.round.id),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Victory,
    Tie,
    Loss,
}

/// One or more rounds between the same two teams, grouped under one key
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub key: MatchKey,
    pub rounds: Vec<RoundId>,
    pub maps: BTreeSet<String>,
}

/// A team's side of an aggregated match
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMatchResult {
    pub team_id: TeamId,
    pub tickets_for: i64,
    pub tickets_against: i64,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub record: MatchRecord,
    pub results: [TeamMatchResult; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TeamWeekStatistics {
    pub tournament_id: TournamentId,
    pub team_id: TeamId,
    pub week: Option<String>,
    pub rounds_won: i32,
    pub rounds_tied: i32,
    pub rounds_lost: i32,
    pub tickets_for: i64,
    pub tickets_against: i64,
    pub ticket_differential: i64,
    pub matches_played: i32,
    pub victories: i32,
    pub ties: i32,
    pub losses: i32,
    pub points: i32,
}

/// Persisted standings row for one team in one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRanking {
    pub statistics: TeamWeekStatistics,
    /// 1-based, unique within the scope
    pub rank: i32,
    pub updated_at: NaiveDateTime,
}

impl TeamRanking {
    pub fn team_id(&self) -> TeamId {
        self.statistics.team_id
    }
}

/// Result of calculating one scope
#[derive(Debug)]
pub struct WeekReport {
    pub scope: Scope,
    pub rankings: Vec<TeamRanking>,
    pub resolved_rounds: usize,
    pub failures: BTreeMap<FailureKind, usize>,
    /// The scope had no mapped rounds and its rows were deleted instead of replaced
    pub cleared: bool,
}

impl WeekReport {
    pub fn failed_rounds(&self) -> usize {
        self.failures.values().sum()
    }
}

#[derive(Debug, Default)]
pub struct RecalculationReport {
    pub completed: Vec<WeekReport>,
    pub failed: Vec<RankingError>,
    /// Scopes whose week no longer has rounds; their rows were deleted
    pub cleared_stale: Vec<Scope>,
}
