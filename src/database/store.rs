use anyhow::{Context, Result};

use super::connection::{get_connection, open_pool, DbPool};
use super::models::Tournament;
use super::{rankings, rounds, setup, teams, tournaments};
use crate::domain::{Scope, ScopeSnapshot, TournamentId, TournamentSnapshot, TournamentTeam, Week};
use crate::ranking::TeamRanking;
use crate::store::{RankingStore, RoundSource};

/// SQLite-backed round source and ranking store
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

/// Row counts written by an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportCounts {
    pub teams: usize,
    pub rounds: usize,
}

impl SqliteStore {
    pub fn open(database_path: &str) -> Result<Self> {
        Ok(Self {
            pool: open_pool(database_path)?,
        })
    }

    /// Writes the tournament, replacing its teams and rounds, in one transaction
    pub fn import_snapshot(&self, snapshot: &TournamentSnapshot) -> Result<ImportCounts> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to begin import transaction")?;

        tournaments::upsert_tournament(&tx, snapshot.tournament_id, &snapshot.name)?;
        let team_rows = snapshot.tournament_teams();
        teams::replace_for_tournament(&tx, snapshot.tournament_id, &team_rows)?;
        let round_rows = snapshot.round_records();
        rounds::replace_for_tournament(&tx, snapshot.tournament_id, &round_rows)?;

        tx.commit().context("Failed to commit import")?;
        Ok(ImportCounts {
            teams: team_rows.len(),
            rounds: round_rows.len(),
        })
    }

    pub fn tournament(&self, tournament_id: TournamentId) -> Result<Option<Tournament>> {
        let conn = get_connection(&self.pool)?;
        tournaments::find_by_id(&conn, tournament_id)
    }

    pub fn teams(&self, tournament_id: TournamentId) -> Result<Vec<TournamentTeam>> {
        let conn = get_connection(&self.pool)?;
        teams::list_by_tournament(&conn, tournament_id)
    }

    pub fn reset(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        setup::reset_database(&conn)
    }
}

impl RoundSource for SqliteStore {
    fn load_scope(&self, scope: &Scope) -> Result<ScopeSnapshot> {
        let mut conn = get_connection(&self.pool)?;
        // One read transaction so teams and rounds come from the same state.
        let tx = conn.transaction().context("Failed to begin snapshot read")?;

        let snapshot = ScopeSnapshot {
            teams: teams::list_by_tournament(&tx, scope.tournament_id)?,
            rounds: rounds::list_for_scope(&tx, scope.tournament_id, scope.week.label())?,
        };

        tx.commit().context("Failed to finish snapshot read")?;
        Ok(snapshot)
    }

    fn weeks(&self, tournament_id: TournamentId) -> Result<Vec<String>> {
        let conn = get_connection(&self.pool)?;
        rounds::list_weeks(&conn, tournament_id)
    }
}

impl RankingStore for SqliteStore {
    fn replace_rankings(&self, scope: &Scope, rows: &[TeamRanking]) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction().context("Failed to begin ranking replace")?;

        let deleted = rankings::delete_for_scope(&tx, scope)?;
        for row in rows {
            rankings::insert_ranking(&tx, row)?;
        }

        tx.commit()
            .with_context(|| format!("Failed to commit rankings for {}", scope))?;
        log::debug!("Replaced {} ranking rows with {} for {}", deleted, rows.len(), scope);
        Ok(())
    }

    fn delete_rankings(&self, scope: &Scope) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        rankings::delete_for_scope(&conn, scope).map(|_| ())
    }

    fn ranked_weeks(&self, tournament_id: TournamentId) -> Result<Vec<Week>> {
        let conn = get_connection(&self.pool)?;
        rankings::list_ranked_weeks(&conn, tournament_id)
    }

    fn rankings(&self, scope: &Scope) -> Result<Vec<TeamRanking>> {
        let conn = get_connection(&self.pool)?;
        rankings::list_for_scope(&conn, scope)
    }
}
