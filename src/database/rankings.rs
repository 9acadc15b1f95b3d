use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::domain::{Scope, TournamentId, Week};
use crate::ranking::{TeamRanking, TeamWeekStatistics};

/// Deletes the rows of exactly one scope. `week IS ?2` also matches the NULL (cumulative) week.
pub fn delete_for_scope(conn: &Connection, scope: &Scope) -> Result<usize> {
    conn.execute(
        "DELETE FROM team_rankings WHERE tournament_id = ?1 AND week IS ?2",
        params![scope.tournament_id, scope.week.label()],
    )
    .with_context(|| format!("Failed to delete rankings for {}", scope))
}

pub fn insert_ranking(conn: &Connection, ranking: &TeamRanking) -> Result<()> {
    let sql = "INSERT INTO team_rankings (tournament_id, team_id, week, rank, rounds_won, rounds_tied, rounds_lost, tickets_for, tickets_against, ticket_differential, matches_played, victories, ties, losses, points, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";
    let s = &ranking.statistics;

    conn.execute(
        sql,
        params![
            s.tournament_id,
            s.team_id,
            s.week,
            ranking.rank,
            s.rounds_won,
            s.rounds_tied,
            s.rounds_lost,
            s.tickets_for,
            s.tickets_against,
            s.ticket_differential,
            s.matches_played,
            s.victories,
            s.ties,
            s.losses,
            s.points,
            ranking.updated_at
        ],
    )
    .with_context(|| format!("Failed to insert ranking for team {}", s.team_id))
    .map(|_| ())
}

fn parse_ranking_row(row: &rusqlite::Row) -> rusqlite::Result<TeamRanking> {
    Ok(TeamRanking {
        statistics: TeamWeekStatistics {
            tournament_id: row.get(0)?,
            team_id: row.get(1)?,
            week: row.get(2)?,
            rounds_won: row.get(4)?,
            rounds_tied: row.get(5)?,
            rounds_lost: row.get(6)?,
            tickets_for: row.get(7)?,
            tickets_against: row.get(8)?,
            ticket_differential: row.get(9)?,
            matches_played: row.get(10)?,
            victories: row.get(11)?,
            ties: row.get(12)?,
            losses: row.get(13)?,
            points: row.get(14)?,
        },
        rank: row.get(3)?,
        updated_at: row.get(15)?,
    })
}

pub fn list_for_scope(conn: &Connection, scope: &Scope) -> Result<Vec<TeamRanking>> {
    let sql = "SELECT tournament_id, team_id, week, rank, rounds_won, rounds_tied, rounds_lost, tickets_for, tickets_against, ticket_differential, matches_played, victories, ties, losses, points, updated_at FROM team_rankings WHERE tournament_id = ?1 AND week IS ?2 ORDER BY rank";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![scope.tournament_id, scope.week.label()], parse_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_ranked_weeks(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<Week>> {
    let sql = "SELECT DISTINCT week FROM team_rankings WHERE tournament_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let weeks = stmt
        .query_map(params![tournament_id], |row| row.get::<_, Option<String>>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(weeks
        .iter()
        .map(|week| Week::from_option(week.as_deref()))
        .collect())
}
