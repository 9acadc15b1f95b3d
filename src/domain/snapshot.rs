use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use super::models::{MatchId, RoundId, RoundRecord, Slot, TeamId, TournamentId, TournamentTeam};

/// Import file: one tournament with its registered teams and played rounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
    pub tournament_id: TournamentId,
    pub name: String,
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub rounds: Vec<RoundEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    pub id: TeamId,
    pub name: String,
    pub roster: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEntry {
    pub id: RoundId,
    #[serde(default)]
    pub week: Option<String>,
    #[serde(default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub map: Option<String>,
    pub team1: BTreeSet<String>,
    pub team2: BTreeSet<String>,
    pub team1_tickets: i64,
    pub team2_tickets: i64,
    #[serde(default)]
    pub winner: Option<Slot>,
}

impl TournamentSnapshot {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let mut team_ids = HashSet::new();
        for team in &self.teams {
            if !team_ids.insert(team.id) {
                bail!("Duplicate team id {} in tournament {}", team.id, self.tournament_id);
            }
        }

        let mut round_ids = HashSet::new();
        for round in &self.rounds {
            if !round_ids.insert(round.id) {
                bail!("Duplicate round id {} in tournament {}", round.id, self.tournament_id);
            }
            if let Some(player) = round.team1.intersection(&round.team2).next() {
                bail!("Round {} lists player '{}' in both slots", round.id, player);
            }
        }

        Ok(())
    }

    pub fn tournament_teams(&self) -> Vec<TournamentTeam> {
        self.teams
            .iter()
            .map(|t| TournamentTeam {
                id: t.id,
                tournament_id: self.tournament_id,
                name: t.name.clone(),
                roster: t.roster.clone(),
            })
            .collect()
    }

    pub fn round_records(&self) -> Vec<RoundRecord> {
        self.rounds
            .iter()
            .map(|r| RoundRecord {
                id: r.id,
                tournament_id: self.tournament_id,
                week: r.week.clone(),
                match_id: r.match_id,
                map: r.map.clone(),
                team1_players: r.team1.clone(),
                team2_players: r.team2.clone(),
                team1_tickets: r.team1_tickets,
                team2_tickets: r.team2_tickets,
                winner: r.winner,
            })
            .collect()
    }
}
