use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::domain::{RoundRecord, Scope, ScopeSnapshot, TournamentId, TournamentTeam, Week};
use crate::ranking::TeamRanking;

/// Read side: rounds and registered teams of a tournament
pub trait RoundSource {
    /// Teams and in-scope rounds, read as one consistent snapshot
    fn load_scope(&self, scope: &Scope) -> Result<ScopeSnapshot>;

    /// Distinct week labels present on the tournament's rounds
    fn weeks(&self, tournament_id: TournamentId) -> Result<Vec<String>>;
}

/// Write side: standings rows, replaced wholesale per scope
pub trait RankingStore {
    /// Deletes every row of the scope and inserts `rows`, atomically
    fn replace_rankings(&self, scope: &Scope, rows: &[TeamRanking]) -> Result<()>;

    fn delete_rankings(&self, scope: &Scope) -> Result<()>;

    /// Weeks (including cumulative) that currently hold rows
    fn ranked_weeks(&self, tournament_id: TournamentId) -> Result<Vec<Week>>;

    /// Stored rows of a scope, by rank
    fn rankings(&self, scope: &Scope) -> Result<Vec<TeamRanking>>;
}

/// In-process source and store
#[derive(Debug, Default)]
pub struct MemoryStore {
    teams: Vec<TournamentTeam>,
    rounds: Vec<RoundRecord>,
    rankings: Mutex<BTreeMap<Scope, Vec<TeamRanking>>>,
}

impl MemoryStore {
    pub fn new(teams: Vec<TournamentTeam>, rounds: Vec<RoundRecord>) -> Self {
        Self {
            teams,
            rounds,
            rankings: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn with_rounds(self, rounds: Vec<RoundRecord>) -> Self {
        let rankings = self
            .rankings
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            teams: self.teams,
            rounds,
            rankings: Mutex::new(rankings),
        }
    }

    fn lock_rankings(&self) -> std::sync::MutexGuard<'_, BTreeMap<Scope, Vec<TeamRanking>>> {
        self.rankings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RoundSource for MemoryStore {
    fn load_scope(&self, scope: &Scope) -> Result<ScopeSnapshot> {
        Ok(ScopeSnapshot {
            teams: self
                .teams
                .iter()
                .filter(|t| t.tournament_id == scope.tournament_id)
                .cloned()
                .collect(),
            rounds: self
                .rounds
                .iter()
                .filter(|r| r.tournament_id == scope.tournament_id)
                .filter(|r| scope.week.covers(r.week.as_deref()))
                .cloned()
                .collect(),
        })
    }

    fn weeks(&self, tournament_id: TournamentId) -> Result<Vec<String>> {
        let weeks: BTreeSet<String> = self
            .rounds
            .iter()
            .filter(|r| r.tournament_id == tournament_id)
            .filter_map(|r| r.week.clone())
            .collect();
        Ok(weeks.into_iter().collect())
    }
}

impl RankingStore for MemoryStore {
    fn replace_rankings(&self, scope: &Scope, rows: &[TeamRanking]) -> Result<()> {
        self.lock_rankings().insert(scope.clone(), rows.to_vec());
        Ok(())
    }

    fn delete_rankings(&self, scope: &Scope) -> Result<()> {
        self.lock_rankings().remove(scope);
        Ok(())
    }

    fn ranked_weeks(&self, tournament_id: TournamentId) -> Result<Vec<Week>> {
        Ok(self
            .lock_rankings()
            .keys()
            .filter(|scope| scope.tournament_id == tournament_id)
            .map(|scope| scope.week.clone())
            .collect())
    }

    fn rankings(&self, scope: &Scope) -> Result<Vec<TeamRanking>> {
        Ok(self.lock_rankings().get(scope).cloned().unwrap_or_default())
    }
}
