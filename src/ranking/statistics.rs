use std::collections::BTreeMap;

use crate::domain::{RoundRecord, Scope, Slot, TeamId, TournamentTeam};

use super::types::{MappedRound, MatchOutcome, MatchSummary, TeamMatchResult, TeamWeekStatistics};

impl TeamWeekStatistics {
    pub fn empty(scope: &Scope, team_id: TeamId) -> Self {
        Self {
            tournament_id: scope.tournament_id,
            team_id,
            week: scope.week.label().map(str::to_string),
            ..Self::default()
        }
    }

    pub fn record_round(&mut self, round: &RoundRecord, slot: Slot) {
        match round.winner {
            Some(winner) if winner == slot => self.rounds_won += 1,
            Some(_) => self.rounds_lost += 1,
            None => self.rounds_tied += 1,
        }
        self.tickets_for += round.tickets(slot);
        self.tickets_against += round.tickets(slot.other());
        self.refresh_derived();
    }

    pub fn record_match(&mut self, result: &TeamMatchResult) {
        self.matches_played += 1;
        match result.outcome {
            MatchOutcome::Victory => self.victories += 1,
            MatchOutcome::Tie => self.ties += 1,
            MatchOutcome::Loss => self.losses += 1,
        }
    }

    pub fn rounds_played(&self) -> i32 {
        self.rounds_won + self.rounds_tied + self.rounds_lost
    }

    fn refresh_derived(&mut self) {
        self.ticket_differential = self.tickets_for - self.tickets_against;
        self.points = self.rounds_won;
    }
}

/// Folds rounds and match outcomes into one fresh statistics entry per registered team.
///
/// Teams without any mapped round keep all-zero statistics. Rounds or matches naming a
/// team that is not registered are ignored.
pub fn build_statistics(
    scope: &Scope,
    teams: &[TournamentTeam],
    rounds: &[MappedRound<'_>],
    matches: &[MatchSummary],
) -> Vec<TeamWeekStatistics> {
    let mut by_team: BTreeMap<TeamId, TeamWeekStatistics> = teams
        .iter()
        .map(|team| (team.id, TeamWeekStatistics::empty(scope, team.id)))
        .collect();

    for mapped in rounds {
        for (team_id, slot) in [(mapped.team1, Slot::Team1), (mapped.team2, Slot::Team2)] {
            if let Some(stats) = by_team.get_mut(&team_id) {
                stats.record_round(mapped.round, slot);
            }
        }
    }

    for summary in matches {
        for result in &summary.results {
            if let Some(stats) = by_team.get_mut(&result.team_id) {
                stats.record_match(result);
            }
        }
    }

    by_team.into_values().collect()
}
