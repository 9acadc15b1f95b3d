use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashMap;

use super::models::{parse_slot, RoundPlayerRow, RoundRow};
use crate::domain::{RoundId, RoundRecord, Slot, TournamentId};

/// Replaces every round of a tournament; round players cascade with their round
pub fn replace_for_tournament(
    conn: &Connection,
    tournament_id: TournamentId,
    rounds: &[RoundRecord],
) -> Result<()> {
    conn.execute("DELETE FROM rounds WHERE tournament_id = ?1", params![tournament_id])
        .context("Failed to delete rounds")?;

    for round in rounds {
        insert_round(conn, round)?;
    }
    Ok(())
}

fn insert_round(conn: &Connection, round: &RoundRecord) -> Result<()> {
    let sql = "INSERT INTO rounds (tournament_id, id, week, match_id, map, team1_tickets, team2_tickets, winner) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

    conn.execute(
        sql,
        params![
            round.tournament_id,
            round.id,
            round.week,
            round.match_id,
            round.map,
            round.team1_tickets,
            round.team2_tickets,
            round.winner.map(|slot| slot.as_str().to_string())
        ],
    )
    .with_context(|| format!("Failed to insert round {}", round.id))?;

    let mut stmt = conn.prepare(
        "INSERT INTO round_players (tournament_id, round_id, slot, player_name) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for slot in [Slot::Team1, Slot::Team2] {
        for player in round.players(slot) {
            stmt.execute(params![round.tournament_id, round.id, slot.as_str(), player])
                .with_context(|| format!("Failed to insert player '{}' of round {}", player, round.id))?;
        }
    }
    Ok(())
}

/// Rounds of the tournament; `week = None` selects every week
pub fn list_for_scope(
    conn: &Connection,
    tournament_id: TournamentId,
    week: Option<&str>,
) -> Result<Vec<RoundRecord>> {
    let sql = "SELECT id, tournament_id, week, match_id, map, team1_tickets, team2_tickets, winner FROM rounds WHERE tournament_id = ?1 AND (?2 IS NULL OR week = ?2) ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id, week], parse_round_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut rounds = rows
        .into_iter()
        .map(RoundRow::into_record)
        .collect::<Result<Vec<_>>>()?;

    let index: HashMap<RoundId, usize> = rounds
        .iter()
        .enumerate()
        .map(|(idx, round)| (round.id, idx))
        .collect();

    for player in list_players(conn, tournament_id, week)? {
        let slot = parse_slot(&player.slot)?;
        if let Some(&idx) = index.get(&player.round_id) {
            let round = &mut rounds[idx];
            match slot {
                Slot::Team1 => round.team1_players.insert(player.player_name),
                Slot::Team2 => round.team2_players.insert(player.player_name),
            };
        }
    }

    Ok(rounds)
}

fn parse_round_row(row: &rusqlite::Row) -> rusqlite::Result<RoundRow> {
    Ok(RoundRow {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        week: row.get(2)?,
        match_id: row.get(3)?,
        map: row.get(4)?,
        team1_tickets: row.get(5)?,
        team2_tickets: row.get(6)?,
        winner: row.get(7)?,
    })
}

fn list_players(
    conn: &Connection,
    tournament_id: TournamentId,
    week: Option<&str>,
) -> Result<Vec<RoundPlayerRow>> {
    let sql = "
        SELECT rp.round_id, rp.slot, rp.player_name
        FROM round_players rp
        JOIN rounds r ON r.tournament_id = rp.tournament_id AND r.id = rp.round_id
        WHERE r.tournament_id = ?1 AND (?2 IS NULL OR r.week = ?2)
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tournament_id, week], |row| {
            Ok(RoundPlayerRow {
                round_id: row.get(0)?,
                slot: row.get(1)?,
                player_name: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_weeks(conn: &Connection, tournament_id: TournamentId) -> Result<Vec<String>> {
    let sql = "SELECT DISTINCT week FROM rounds WHERE tournament_id = ?1 AND week IS NOT NULL";

    let mut stmt = conn.prepare(sql)?;
    let weeks = stmt
        .query_map(params![tournament_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(weeks)
}
