use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type TournamentId = i64;
pub type TeamId = i64;
pub type RoundId = i64;
pub type MatchId = i64;

/// One of the two anonymous team positions recorded on a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Team1,
    Team2,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::Team1 => Slot::Team2,
            Slot::Team2 => Slot::Team1,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Slot::Team1 => "team1",
            Slot::Team2 => "team2",
        }
    }

    pub fn parse(value: &str) -> Option<Slot> {
        match value {
            "team1" => Some(Slot::Team1),
            "team2" => Some(Slot::Team2),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Week component of a ranking scope. `Cumulative` covers every round of the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Week {
    Cumulative,
    Label(String),
}

impl Week {
    pub fn from_option(week: Option<&str>) -> Self {
        match week {
            Some(label) => Week::Label(label.to_string()),
            None => Week::Cumulative,
        }
    }

    /// Storage form: `None` stands for the cumulative scope
    pub fn label(&self) -> Option<&str> {
        match self {
            Week::Cumulative => None,
            Week::Label(label) => Some(label.as_str()),
        }
    }

    pub fn is_cumulative(&self) -> bool {
        matches!(self, Week::Cumulative)
    }

    /// Whether a round tagged with `round_week` belongs to this scope
    pub fn covers(&self, round_week: Option<&str>) -> bool {
        match self {
            Week::Cumulative => true,
            Week::Label(label) => round_week == Some(label.as_str()),
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Week::Cumulative => f.write_str("cumulative"),
            Week::Label(label) => write!(f, "week {}", label),
        }
    }
}

/// A (tournament, week) pair: the unit of ranking replacement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scope {
    pub tournament_id: TournamentId,
    pub week: Week,
}

impl Scope {
    pub fn new(tournament_id: TournamentId, week: Week) -> Self {
        Self { tournament_id, week }
    }

    pub fn cumulative(tournament_id: TournamentId) -> Self {
        Self::new(tournament_id, Week::Cumulative)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tournament {} ({})", self.tournament_id, self.week)
    }
}

/// One played round as produced by the ingestion pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub id: RoundId,
    pub tournament_id: TournamentId,
    #[serde(default)]
    pub week: Option<String>,
    #[serde(default)]
    pub match_id: Option<MatchId>,
    #[serde(default)]
    pub map: Option<String>,
    pub team1_players: BTreeSet<String>,
    pub team2_players: BTreeSet<String>,
    pub team1_tickets: i64,
    pub team2_tickets: i64,
    /// `None` when the round ended in a tie
    #[serde(default)]
    pub winner: Option<Slot>,
}

impl RoundRecord {
    pub fn players(&self, slot: Slot) -> &BTreeSet<String> {
        match slot {
            Slot::Team1 => &self.team1_players,
            Slot::Team2 => &self.team2_players,
        }
    }

    pub fn tickets(&self, slot: Slot) -> i64 {
        match slot {
            Slot::Team1 => self.team1_tickets,
            Slot::Team2 => self.team2_tickets,
        }
    }
}

/// Registered competitive entity of a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentTeam {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub roster: BTreeSet<String>,
}

/// Teams and rounds of one scope, read together so a calculation pass sees a consistent view
#[derive(Debug, Clone, Default)]
pub struct ScopeSnapshot {
    pub teams: Vec<TournamentTeam>,
    pub rounds: Vec<RoundRecord>,
}
