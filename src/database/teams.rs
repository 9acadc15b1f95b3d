use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::BTreeMap;

use crate::domain::{TeamId, TournamentId, TournamentTeam};

/// Replaces the registered teams of a tournament; rosters cascade with their team
pub fn replace_for_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
    teams: &[TournamentTeam],
) -> Result<()> {
    conn.execute("DELETE FROM teams WHERE tournament_id = ?1", params![tournament_id])
        .context("Failed to delete teams")?;

    for team in teams {
        insert_team(conn, tournament_id, team)?;
    }
    Ok(())
}

fn insert_team(conn: &Connection, tournament_id: TournamentId, team: &TournamentTeam) -> Result<()> {
    conn.execute(
        "INSERT INTO teams (tournament_id, id, name) VALUES (?1, ?2, ?3)",
        params![tournament_id, team.id, team.name],
    )
    .with_context(|| format!("Failed to insert team {}", team.id))?;

    let mut stmt = conn.prepare(
        "INSERT INTO team_players (tournament_id, team_id, player_name) VALUES (?1, ?2, ?3)",
    )?;
    for player in &team.roster {
        stmt.execute(params![tournament_id, team.id, player])
            .with_context(|| format!("Failed to insert roster entry for team {}", team.id))?;
    }
    Ok(())
}

pub fn list_by_tournament(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<TournamentTeam>> {
    let sql = "SELECT id, name FROM teams WHERE tournament_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let mut teams: BTreeMap<TeamId, TournamentTeam> = stmt
        .query_map(params![tournament_id], |row| {
            Ok(TournamentTeam {
                id: row.get(0)?,
                tournament_id,
                name: row.get(1)?,
                roster: Default::default(),
            })
        })?
        .map(|team| team.map(|t| (t.id, t)))
        .collect::<rusqlite::Result<_>>()?;

    let sql = "SELECT team_id, player_name FROM team_players WHERE tournament_id = ?1";
    let mut stmt = conn.prepare(sql)?;
    let players = stmt
        .query_map(params![tournament_id], |row| {
            Ok((row.get::<_, TeamId>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (team_id, player) in players {
        if let Some(team) = teams.get_mut(&team_id) {
            team.roster.insert(player);
        }
    }

    Ok(teams.into_values().collect())
}
