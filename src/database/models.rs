use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;

use crate::domain::{MatchId, RoundId, RoundRecord, Slot, TournamentId};

#[derive(Debug, Clone)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

/// `rounds` row before its players are attached
#[derive(Debug, Clone)]
pub struct RoundRow {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    pub week: Option<String>,
    pub match_id: Option<MatchId>,
    pub map: Option<String>,
    pub team1_tickets: i64,
    pub team2_tickets: i64,
    pub winner: Option<String>,
}

impl RoundRow {
    pub fn into_record(self) -> Result<RoundRecord> {
        let winner = match self.winner.as_deref() {
            Some(value) => Some(parse_slot(value)?),
            None => None,
        };

        Ok(RoundRecord {
            id: self.id,
            tournament_id: self.tournament_id,
            week: self.week,
            match_id: self.match_id,
            map: self.map,
            team1_players: Default::default(),
            team2_players: Default::default(),
            team1_tickets: self.team1_tickets,
            team2_tickets: self.team2_tickets,
            winner,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RoundPlayerRow {
    pub round_id: RoundId,
    pub slot: String,
    pub player_name: String,
}

pub fn parse_slot(value: &str) -> Result<Slot> {
    Slot::parse(value).ok_or_else(|| anyhow!("Unknown slot value '{}'", value))
}
