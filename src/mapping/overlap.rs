use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::{Slot, TeamId, TournamentTeam};

/// Roster overlap of one registered team with the two slots of a round
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapCandidate {
    pub team_id: TeamId,
    pub matches1: usize,
    pub matches2: usize,
    /// `None` when both slot counts are equal (ambiguous)
    pub preferred_slot: Option<Slot>,
    pub confidence: f64,
}

impl OverlapCandidate {
    pub fn total_matches(&self) -> usize {
        self.matches1 + self.matches2
    }

    pub fn is_ambiguous(&self) -> bool {
        self.preferred_slot.is_none()
    }

    pub fn is_viable(&self) -> bool {
        self.total_matches() > 0 && !self.is_ambiguous()
    }
}

/// Scores every team with at least one player in either slot.
///
/// Result is ordered by confidence descending, then total matched players descending,
/// then team id ascending.
pub fn match_rosters(
    slot1: &BTreeSet<String>,
    slot2: &BTreeSet<String>,
    teams: &[TournamentTeam],
) -> Vec<OverlapCandidate> {
    let mut candidates: Vec<OverlapCandidate> = teams
        .iter()
        .filter_map(|team| evaluate_team(team, slot1, slot2))
        .collect();

    candidates.sort_by(compare_candidates);
    candidates
}

fn evaluate_team(
    team: &TournamentTeam,
    slot1: &BTreeSet<String>,
    slot2: &BTreeSet<String>,
) -> Option<OverlapCandidate> {
    let matches1 = team.roster.intersection(slot1).count();
    let matches2 = team.roster.intersection(slot2).count();
    let total = matches1 + matches2;

    if total == 0 {
        return None;
    }

    let preferred_slot = match matches1.cmp(&matches2) {
        Ordering::Greater => Some(Slot::Team1),
        Ordering::Less => Some(Slot::Team2),
        Ordering::Equal => None,
    };

    Some(OverlapCandidate {
        team_id: team.id,
        matches1,
        matches2,
        preferred_slot,
        confidence: matches1.max(matches2) as f64 / total as f64,
    })
}

fn compare_candidates(a: &OverlapCandidate, b: &OverlapCandidate) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.total_matches().cmp(&a.total_matches()))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(players: &[&str]) -> BTreeSet<String> {
        players.iter().map(|p| p.to_string()).collect()
    }

    fn team(id: TeamId, roster: &[&str]) -> TournamentTeam {
        TournamentTeam {
            id,
            tournament_id: 1,
            name: format!("Team {}", id),
            roster: names(roster),
        }
    }

    #[test]
    fn test_teams_without_overlap_are_not_candidates() {
        let teams = vec![team(1, &["P1"]), team(2, &["P9"])];
        let candidates = match_rosters(&names(&["P1"]), &names(&["P2"]), &teams);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].team_id, 1);
    }

    #[test]
    fn test_preferred_slot_and_confidence() {
        let teams = vec![team(1, &["P1", "P2", "P4"])];
        let candidates = match_rosters(&names(&["P1", "P2", "P3"]), &names(&["P4", "P5"]), &teams);

        let c = &candidates[0];
        assert_eq!(c.matches1, 2);
        assert_eq!(c.matches2, 1);
        assert_eq!(c.preferred_slot, Some(Slot::Team1));
        assert!((c.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert!(c.is_viable());
    }

    #[test]
    fn test_equal_slot_counts_are_ambiguous() {
        let teams = vec![team(1, &["P1", "P2"])];
        let candidates = match_rosters(&names(&["P1"]), &names(&["P2"]), &teams);

        assert!(candidates[0].is_ambiguous());
        assert!(!candidates[0].is_viable());
        assert_eq!(candidates[0].confidence, 0.5);
    }

    #[test]
    fn test_ordering_by_confidence_then_total_then_id() {
        let teams = vec![
            team(5, &["P1", "P4"]),       // 1/1 -> 0.5
            team(3, &["P1"]),             // 1/0 -> 1.0, total 1
            team(4, &["P1", "P2"]),       // 2/0 -> 1.0, total 2
            team(2, &["P2"]),             // 1/0 -> 1.0, total 1
        ];
        let candidates = match_rosters(&names(&["P1", "P2"]), &names(&["P4"]), &teams);

        let order: Vec<TeamId> = candidates.iter().map(|c| c.team_id).collect();
        assert_eq!(order, vec![4, 2, 3, 5]);
    }
}
