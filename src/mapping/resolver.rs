use crate::domain::{RoundRecord, Slot, TeamId, TournamentTeam};
use crate::events::{DecisionEvent, DecisionSink};

use super::overlap::{match_rosters, OverlapCandidate};
use super::types::{MappingFailure, MappingStatus, SlotAssignment, TeamMapping};

const MIN_VIABLE_TEAMS: usize = 2;

/// Maps the anonymous slots of a round onto registered tournament teams
pub struct TeamMappingResolver<'a> {
    sink: &'a dyn DecisionSink,
}

impl<'a> TeamMappingResolver<'a> {
    pub fn new(sink: &'a dyn DecisionSink) -> Self {
        Self { sink }
    }

    pub fn resolve(&self, round: &RoundRecord, teams: &[TournamentTeam]) -> TeamMapping {
        let candidates = match_rosters(&round.team1_players, &round.team2_players, teams);
        self.report_candidates(round, &candidates);

        let viable: Vec<&OverlapCandidate> = candidates.iter().filter(|c| c.is_viable()).collect();
        let status = select_assignments(candidates.len(), &viable);
        self.report_outcome(round, &status);

        TeamMapping {
            round_id: round.id,
            status,
        }
    }

    fn report_candidates(&self, round: &RoundRecord, candidates: &[OverlapCandidate]) {
        for candidate in candidates {
            self.sink.emit(DecisionEvent::CandidateEvaluated {
                round_id: round.id,
                team_id: candidate.team_id,
                matches1: candidate.matches1,
                matches2: candidate.matches2,
                preferred_slot: candidate.preferred_slot,
                confidence: candidate.confidence,
            });
        }
    }

    fn report_outcome(&self, round: &RoundRecord, status: &MappingStatus) {
        let event = match status {
            MappingStatus::Resolved { team1, team2 } => DecisionEvent::MappingResolved {
                round_id: round.id,
                team1: team1.team_id,
                team1_confidence: team1.confidence,
                team2: team2.team_id,
                team2_confidence: team2.confidence,
            },
            MappingStatus::Failed(reason) => DecisionEvent::MappingFailed {
                round_id: round.id,
                reason: reason.clone(),
            },
        };
        self.sink.emit(event);
    }
}

/// `viable` must already be in matcher order (best candidate first)
fn select_assignments(matched_teams: usize, viable: &[&OverlapCandidate]) -> MappingStatus {
    if viable.len() < MIN_VIABLE_TEAMS {
        return MappingStatus::Failed(MappingFailure::InsufficientMatches {
            matched_teams,
            viable_teams: viable.len(),
        });
    }

    let team1 = best_for_slot(viable, Slot::Team1, None);
    let team2 = best_for_slot(viable, Slot::Team2, team1.map(|c| c.team_id));

    match (team1, team2) {
        (Some(a), Some(b)) if a.team_id != b.team_id => MappingStatus::Resolved {
            team1: assignment(a, Slot::Team1),
            team2: assignment(b, Slot::Team2),
        },
        (a, b) => MappingStatus::Failed(MappingFailure::AmbiguousOrConflictingAssignment {
            detail: describe_conflict(a, b),
        }),
    }
}

fn best_for_slot<'c>(
    viable: &[&'c OverlapCandidate],
    slot: Slot,
    taken: Option<TeamId>,
) -> Option<&'c OverlapCandidate> {
    viable
        .iter()
        .copied()
        .find(|c| c.preferred_slot == Some(slot) && Some(c.team_id) != taken)
}

fn assignment(candidate: &OverlapCandidate, slot: Slot) -> SlotAssignment {
    SlotAssignment {
        team_id: candidate.team_id,
        slot,
        confidence: candidate.confidence,
    }
}

fn describe_conflict(team1: Option<&OverlapCandidate>, team2: Option<&OverlapCandidate>) -> String {
    match (team1, team2) {
        (None, None) => "no viable team prefers either slot".to_string(),
        (None, Some(_)) => "no viable team prefers team1".to_string(),
        (Some(_), None) => "no viable team prefers team2".to_string(),
        (Some(a), Some(_)) => format!("team {} is the best fit for both slots", a.team_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::mapping::FailureKind;
    use std::collections::BTreeSet;

    fn names(players: &[&str]) -> BTreeSet<String> {
        players.iter().map(|p| p.to_string()).collect()
    }

    fn team(id: i64, roster: &[&str]) -> TournamentTeam {
        TournamentTeam {
            id,
            tournament_id: 1,
            name: format!("Team {}", id),
            roster: names(roster),
        }
    }

    fn round(slot1: &[&str], slot2: &[&str]) -> RoundRecord {
        RoundRecord {
            id: 42,
            tournament_id: 1,
            week: Some("1".to_string()),
            match_id: None,
            map: None,
            team1_players: names(slot1),
            team2_players: names(slot2),
            team1_tickets: 100,
            team2_tickets: 0,
            winner: Some(Slot::Team1),
        }
    }

    #[test]
    fn test_resolves_distinct_rosters() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["P1", "P2"]), team(2, &["P4", "P5", "P6"])];

        let mapping = resolver.resolve(&round(&["P1", "P2", "P3"], &["P4", "P5"]), &teams);

        let [a, b] = mapping.assignments().unwrap();
        assert_eq!((a.team_id, a.slot, a.confidence), (1, Slot::Team1, 1.0));
        assert_eq!((b.team_id, b.slot, b.confidence), (2, Slot::Team2, 1.0));
        assert_eq!(mapping.team_in(Slot::Team2), Some(2));
    }

    #[test]
    fn test_single_registered_team_is_insufficient() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["P1", "P2"])];

        let mapping = resolver.resolve(&round(&["P1"], &["P2"]), &teams);

        assert_eq!(
            mapping.failure(),
            Some(&MappingFailure::InsufficientMatches {
                matched_teams: 1,
                viable_teams: 0
            })
        );
    }

    #[test]
    fn test_one_viable_team_is_insufficient() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["P1", "P3"]), team(2, &["P9"])];

        let mapping = resolver.resolve(&round(&["P1", "P3"], &["P2"]), &teams);

        assert_eq!(
            mapping.failure(),
            Some(&MappingFailure::InsufficientMatches {
                matched_teams: 1,
                viable_teams: 1
            })
        );
    }

    #[test]
    fn test_no_overlap_fails_immediately() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["X"]), team(2, &["Y"])];

        let mapping = resolver.resolve(&round(&["P1"], &["P2"]), &teams);

        assert_eq!(mapping.failure().map(|f| f.kind()), Some(FailureKind::InsufficientMatches));
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_both_teams_preferring_one_slot_conflict() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["P1"]), team(2, &["P2"])];

        let mapping = resolver.resolve(&round(&["P1", "P2"], &["P3"]), &teams);

        assert_eq!(
            mapping.failure().map(|f| f.kind()),
            Some(FailureKind::AmbiguousOrConflictingAssignment)
        );
    }

    #[test]
    fn test_highest_confidence_wins_each_slot() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![
            team(1, &["P1", "P2", "P4"]), // 2/1, prefers team1 at 0.67
            team(2, &["P3"]),             // 1/0, prefers team1 at 1.0
            team(3, &["P5", "P6"]),       // 0/2, prefers team2 at 1.0
        ];

        let mapping = resolver.resolve(&round(&["P1", "P2", "P3"], &["P4", "P5", "P6"]), &teams);

        assert_eq!(mapping.team_in(Slot::Team1), Some(2));
        assert_eq!(mapping.team_in(Slot::Team2), Some(3));
    }

    #[test]
    fn test_ambiguous_team_is_ignored() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![
            team(1, &["P1", "P4"]),
            team(2, &["P2"]),
            team(3, &["P5"]),
        ];

        let mapping = resolver.resolve(&round(&["P1", "P2"], &["P4", "P5"]), &teams);

        assert_eq!(mapping.team_in(Slot::Team1), Some(2));
        assert_eq!(mapping.team_in(Slot::Team2), Some(3));
    }

    #[test]
    fn test_emits_candidates_then_outcome() {
        let sink = MemorySink::new();
        let resolver = TeamMappingResolver::new(&sink);
        let teams = vec![team(1, &["P1"]), team(2, &["P2"])];

        resolver.resolve(&round(&["P1"], &["P2"]), &teams);

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], DecisionEvent::CandidateEvaluated { team_id: 1, .. }));
        assert!(matches!(events[1], DecisionEvent::CandidateEvaluated { team_id: 2, .. }));
        assert!(matches!(
            events[2],
            DecisionEvent::MappingResolved { round_id: 42, team1: 1, team2: 2, .. }
        ));
    }
}
