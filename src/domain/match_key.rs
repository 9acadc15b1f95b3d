use std::fmt;

use super::models::{MatchId, RoundId, TeamId, TournamentId};

/// Unordered pair of teams, stored low id first so both orientations group together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamPair {
    low: TeamId,
    high: TeamId,
}

impl TeamPair {
    pub fn new(a: TeamId, b: TeamId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> TeamId {
        self.low
    }

    pub fn high(&self) -> TeamId {
        self.high
    }
}

/// What ties the rounds of a match together
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fixture {
    /// Rounds sharing an ingested match id (one or more maps)
    Match(MatchId),
    /// A round with no match association stands alone
    Standalone(RoundId),
}

/// Strongly typed grouping key for match aggregation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub tournament_id: TournamentId,
    pub week: Option<String>,
    pub teams: TeamPair,
    pub fixture: Fixture,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixture = match &self.fixture {
            Fixture::Match(id) => format!("match {}", id),
            Fixture::Standalone(id) => format!("round {}", id),
        };
        write!(
            f,
            "t{}/{}/{} vs {}/{}",
            self.tournament_id,
            self.week.as_deref().unwrap_or("-"),
            self.teams.low(),
            self.teams.high(),
            fixture
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_pair_is_orientation_independent() {
        assert_eq!(TeamPair::new(4, 9), TeamPair::new(9, 4));
        let pair = TeamPair::new(9, 4);
        assert_eq!(pair.low(), 4);
        assert_eq!(pair.high(), 9);
    }

    #[test]
    fn test_keys_for_different_fixtures_differ() {
        let base = MatchKey {
            tournament_id: 1,
            week: Some("1".to_string()),
            teams: TeamPair::new(1, 2),
            fixture: Fixture::Match(10),
        };
        let standalone = MatchKey {
            fixture: Fixture::Standalone(10),
            ..base.clone()
        };
        assert_ne!(base, standalone);
    }
}
