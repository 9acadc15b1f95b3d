use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Tournament;
use crate::domain::TournamentId;

pub fn upsert_tournament(conn: &Connection, id: TournamentId, name: &str) -> Result<Tournament> {
    let sql = "INSERT INTO tournaments (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name RETURNING id, name, created_at";

    conn.query_row(sql, params![id, name], parse_tournament_row)
        .context("Failed to upsert tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

pub fn find_by_id(conn: &Connection, id: TournamentId) -> Result<Option<Tournament>> {
    let sql = "SELECT id, name, created_at FROM tournaments WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}
