use chrono::Utc;
use log::{error, info};
use std::cmp::Ordering;

use crate::config::settings::RankingSettings;
use crate::domain::{Scope, TournamentId, Week};
use crate::errors::RankingError;
use crate::events::{DecisionEvent, DecisionSink};
use crate::mapping::{failure_counts, TeamMapping, TeamMappingResolver};
use crate::store::{RankingStore, RoundSource};

use super::aggregator::aggregate_matches;
use super::ordering::rank_teams;
use super::statistics::build_statistics;
use super::types::{MappedRound, RecalculationReport, TeamRanking, TeamWeekStatistics, WeekReport};

/// Turns the rounds of a scope into standings and replaces that scope in the store.
///
/// Holds no state of its own between calls; concurrent use for different scopes is fine
/// as long as the store keeps each replace scoped.
pub struct TeamRankingCalculator<'a> {
    source: &'a dyn RoundSource,
    store: &'a dyn RankingStore,
    sink: &'a dyn DecisionSink,
    settings: &'a RankingSettings,
}

impl<'a> TeamRankingCalculator<'a> {
    pub fn new(
        source: &'a dyn RoundSource,
        store: &'a dyn RankingStore,
        sink: &'a dyn DecisionSink,
        settings: &'a RankingSettings,
    ) -> Self {
        Self {
            source,
            store,
            sink,
            settings,
        }
    }

    /// Resolves mappings for every round in scope, folds the mapped rounds into
    /// statistics and replaces the stored rows of the scope.
    ///
    /// A labelled week without a single mapped round has its rows deleted instead.
    pub fn calculate_for_week(
        &self,
        tournament_id: TournamentId,
        week: &Week,
    ) -> Result<WeekReport, RankingError> {
        let scope = Scope::new(tournament_id, week.clone());
        let snapshot = self
            .source
            .load_scope(&scope)
            .map_err(RankingError::data_access(&scope))?;
        info!(
            "  → {}: {} rounds, {} registered teams",
            scope,
            snapshot.rounds.len(),
            snapshot.teams.len()
        );

        let resolver = TeamMappingResolver::new(self.sink);
        let mappings: Vec<TeamMapping> = snapshot
            .rounds
            .iter()
            .map(|round| resolver.resolve(round, &snapshot.teams))
            .collect();
        let failures = failure_counts(&mappings);

        let mapped: Vec<MappedRound> = snapshot
            .rounds
            .iter()
            .zip(&mappings)
            .filter_map(|(round, mapping)| MappedRound::new(round, mapping))
            .collect();
        info!(
            "  → {}: {} rounds mapped, {} unmapped",
            scope,
            mapped.len(),
            mappings.len() - mapped.len()
        );

        if mapped.is_empty() && !week.is_cumulative() {
            self.store
                .delete_rankings(&scope)
                .map_err(RankingError::data_access(&scope))?;
            self.sink.emit(DecisionEvent::ScopeCleared { scope: scope.clone() });
            return Ok(WeekReport {
                scope,
                rankings: Vec::new(),
                resolved_rounds: 0,
                failures,
                cleared: true,
            });
        }

        let matches = aggregate_matches(&mapped);
        let statistics = build_statistics(&scope, &snapshot.teams, &mapped, &matches);
        self.report_statistics(&scope, &statistics);

        let rankings = rank_teams(statistics, self.settings, Utc::now().naive_utc());
        self.report_ranks(&scope, &rankings);

        self.store
            .replace_rankings(&scope, &rankings)
            .map_err(RankingError::data_access(&scope))?;
        self.sink.emit(DecisionEvent::ScopeReplaced {
            scope: scope.clone(),
            rows: rankings.len(),
        });

        Ok(WeekReport {
            scope,
            rankings,
            resolved_rounds: mapped.len(),
            failures,
            cleared: false,
        })
    }

    /// Recalculates every week of the tournament in order, then the cumulative scope.
    ///
    /// A failing week is recorded and the pass moves on; weeks already written stay
    /// written. Rows of weeks that no longer have rounds are deleted.
    pub fn recalculate_all(
        &self,
        tournament_id: TournamentId,
    ) -> Result<RecalculationReport, RankingError> {
        let tournament_scope = Scope::cumulative(tournament_id);
        let weeks = self
            .source
            .weeks(tournament_id)
            .map_err(RankingError::data_access(&tournament_scope))?;
        let tasks = week_tasks(weeks);
        info!("Recalculating {} scopes for tournament {}", tasks.len(), tournament_id);

        let mut report = RecalculationReport::default();
        for week in &tasks {
            match self.calculate_for_week(tournament_id, week) {
                Ok(week_report) => report.completed.push(week_report),
                Err(e) => {
                    error!("{}", e);
                    report.failed.push(e);
                }
            }
        }

        self.clear_stale_weeks(tournament_id, &tasks, &mut report);
        Ok(report)
    }

    fn clear_stale_weeks(
        &self,
        tournament_id: TournamentId,
        current: &[Week],
        report: &mut RecalculationReport,
    ) {
        let tournament_scope = Scope::cumulative(tournament_id);
        let ranked = match self.store.ranked_weeks(tournament_id) {
            Ok(ranked) => ranked,
            Err(e) => {
                let e = RankingError::data_access(&tournament_scope)(e);
                error!("{}", e);
                report.failed.push(e);
                return;
            }
        };

        for week in ranked.into_iter().filter(|w| !current.contains(w)) {
            let scope = Scope::new(tournament_id, week);
            match self.store.delete_rankings(&scope) {
                Ok(()) => {
                    self.sink.emit(DecisionEvent::ScopeCleared { scope: scope.clone() });
                    report.cleared_stale.push(scope);
                }
                Err(e) => {
                    let e = RankingError::data_access(&scope)(e);
                    error!("{}", e);
                    report.failed.push(e);
                }
            }
        }
    }

    fn report_statistics(&self, scope: &Scope, statistics: &[TeamWeekStatistics]) {
        for stats in statistics {
            self.sink.emit(DecisionEvent::TeamStatistics {
                scope: scope.clone(),
                team_id: stats.team_id,
                rounds_won: stats.rounds_won,
                rounds_tied: stats.rounds_tied,
                rounds_lost: stats.rounds_lost,
                ticket_differential: stats.ticket_differential,
                matches_played: stats.matches_played,
            });
        }
    }

    fn report_ranks(&self, scope: &Scope, rankings: &[TeamRanking]) {
        for ranking in rankings {
            self.sink.emit(DecisionEvent::RankAssigned {
                scope: scope.clone(),
                team_id: ranking.team_id(),
                rank: ranking.rank,
            });
        }
    }
}

/// Labelled weeks in calendar order, then the cumulative scope
fn week_tasks(mut weeks: Vec<String>) -> Vec<Week> {
    weeks.sort_by(|a, b| compare_week_labels(a, b));
    weeks.dedup();

    weeks
        .into_iter()
        .map(Week::Label)
        .chain(std::iter::once(Week::Cumulative))
        .collect()
}

/// Numeric labels compare numerically and sort before non-numeric ones
fn compare_week_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::LossTiebreak;
    use crate::domain::{RoundRecord, ScopeSnapshot, Slot, TournamentTeam};
    use crate::events::MemorySink;
    use crate::mapping::FailureKind;
    use crate::store::MemoryStore;
    use anyhow::{anyhow, Result};
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

    fn round(
        id: i64,
        week: &str,
        match_id: i64,
        slots: (&[&str], &[&str]),
        tickets: (i64, i64),
        winner: Option<Slot>,
    ) -> RoundRecord {
        RoundRecord {
            id,
            tournament_id: 1,
            week: Some(week.to_string()),
            match_id: Some(match_id),
            map: None,
            team1_players: names(slots.0),
            team2_players: names(slots.1),
            team1_tickets: tickets.0,
            team2_tickets: tickets.1,
            winner,
        }
    }

    fn league() -> (Vec<TournamentTeam>, Vec<RoundRecord>) {
        let teams = vec![
            team(1, &["A1", "A2", "A3"]),
            team(2, &["B1", "B2", "B3"]),
            team(3, &["C1", "C2", "C3"]),
            team(4, &["D1", "D2"]),
        ];
        let rounds = vec![
            round(1, "1", 10, (&["A1", "A2"], &["B1", "B2"]), (200, 50), Some(Slot::Team1)),
            round(2, "1", 10, (&["B1", "B3"], &["A1", "A3"]), (120, 100), Some(Slot::Team1)),
            round(3, "1", 11, (&["C1"], &["B2"]), (75, 75), None),
            round(4, "2", 12, (&["A2"], &["C2", "C3"]), (0, 300), Some(Slot::Team2)),
            // unmappable: nobody registered
            round(5, "2", 13, (&["X1"], &["Y1"]), (10, 0), Some(Slot::Team1)),
            // ambiguous: team 1 has one player in each slot
            round(6, "2", 14, (&["A1"], &["A2"]), (10, 0), Some(Slot::Team1)),
        ];
        (teams, rounds)
    }

    fn without_timestamps(rankings: &[TeamRanking]) -> Vec<(i32, TeamWeekStatistics)> {
        rankings
            .iter()
            .map(|r| (r.rank, r.statistics.clone()))
            .collect()
    }

    #[test]
    fn test_week_standings_from_mapped_rounds() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds);
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let report = calculator
            .calculate_for_week(1, &Week::Label("1".to_string()))
            .unwrap();

        assert_eq!(report.resolved_rounds, 3);
        assert_eq!(report.failed_rounds(), 0);
        let order: Vec<i64> = report.rankings.iter().map(|r| r.team_id()).collect();
        // team 1: won 1 lost 1; team 2: won 1 tied 1 lost 1; team 3: tied 1; team 4 idle
        assert_eq!(order, vec![2, 1, 3, 4]);

        let team1 = &report.rankings[1].statistics;
        assert_eq!((team1.tickets_for, team1.tickets_against), (300, 170));
        assert_eq!((team1.victories, team1.losses), (1, 0));

        let idle = &report.rankings[3].statistics;
        assert_eq!(idle.rounds_played(), 0);
        assert_eq!(report.rankings[3].rank, 4);

        let stored = store.rankings(&report.scope).unwrap();
        assert_eq!(stored, report.rankings);
    }

    #[test]
    fn test_mapping_failures_are_counted_not_fatal() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds);
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let report = calculator
            .calculate_for_week(1, &Week::Label("2".to_string()))
            .unwrap();

        assert_eq!(report.resolved_rounds, 1);
        assert_eq!(report.failures.get(&FailureKind::InsufficientMatches), Some(&2));
        assert_eq!(report.rankings.len(), 4);
        assert_eq!(report.rankings[0].team_id(), 3);
    }

    #[test]
    fn test_recalculation_is_idempotent() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds);
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let first = calculator.calculate_for_week(1, &Week::Cumulative).unwrap();
        let second = calculator.calculate_for_week(1, &Week::Cumulative).unwrap();

        assert_eq!(without_timestamps(&first.rankings), without_timestamps(&second.rankings));
        assert_eq!(store.rankings(&Scope::cumulative(1)).unwrap().len(), 4);
    }

    #[test]
    fn test_ranks_are_unique_and_dense() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds);
        let sink = MemorySink::new();
        let settings = RankingSettings {
            loss_tiebreak: LossTiebreak::FewerLossesFirst,
        };
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let report = calculator.calculate_for_week(1, &Week::Cumulative).unwrap();

        let ranks: Vec<i32> = report.rankings.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        for ranking in &report.rankings {
            let s = &ranking.statistics;
            assert_eq!(s.ticket_differential, s.tickets_for - s.tickets_against);
            assert_eq!(s.points, s.rounds_won);
            assert_eq!(s.week, None);
        }
    }

    #[test]
    fn test_week_without_mapped_rounds_is_cleared() {
        let (teams, rounds) = league();
        let unmappable: Vec<RoundRecord> = rounds.into_iter().filter(|r| r.id >= 5).collect();
        let store = MemoryStore::new(teams, unmappable);
        let scope = Scope::new(1, Week::Label("2".to_string()));
        store.replace_rankings(&scope, &[]).unwrap();
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let report = calculator
            .calculate_for_week(1, &Week::Label("2".to_string()))
            .unwrap();

        assert!(report.cleared);
        assert!(store.ranked_weeks(1).unwrap().is_empty());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DecisionEvent::ScopeCleared { .. })));
    }

    #[test]
    fn test_recalculate_all_covers_weeks_then_cumulative() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds);
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&store, &store, &sink, &settings);

        let report = calculator.recalculate_all(1).unwrap();

        let scopes: Vec<Week> = report.completed.iter().map(|r| r.scope.week.clone()).collect();
        assert_eq!(
            scopes,
            vec![
                Week::Label("1".to_string()),
                Week::Label("2".to_string()),
                Week::Cumulative
            ]
        );
        assert!(report.failed.is_empty());

        let cumulative = &report.completed[2];
        assert_eq!(cumulative.resolved_rounds, 4);
        let total_rounds: i32 = cumulative
            .rankings
            .iter()
            .map(|r| r.statistics.rounds_played())
            .sum();
        assert_eq!(total_rounds, 8);
    }

    #[test]
    fn test_recalculate_all_clears_stale_weeks() {
        let (teams, rounds) = league();
        let store = MemoryStore::new(teams, rounds.clone());
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        TeamRankingCalculator::new(&store, &store, &sink, &settings)
            .recalculate_all(1)
            .unwrap();

        let week_one_only: Vec<RoundRecord> = rounds.into_iter().filter(|r| r.id <= 3).collect();
        let store = store.with_rounds(week_one_only);
        let report = TeamRankingCalculator::new(&store, &store, &sink, &settings)
            .recalculate_all(1)
            .unwrap();

        assert_eq!(report.cleared_stale, vec![Scope::new(1, Week::Label("2".to_string()))]);
        assert_eq!(
            store.ranked_weeks(1).unwrap(),
            vec![Week::Cumulative, Week::Label("1".to_string())]
        );
    }

    struct FailingWeekStore<'a> {
        inner: &'a MemoryStore,
        failing: Week,
    }

    impl RankingStore for FailingWeekStore<'_> {
        fn replace_rankings(&self, scope: &Scope, rows: &[TeamRanking]) -> Result<()> {
            if scope.week == self.failing {
                return Err(anyhow!("disk full"));
            }
            self.inner.replace_rankings(scope, rows)
        }

        fn delete_rankings(&self, scope: &Scope) -> Result<()> {
            self.inner.delete_rankings(scope)
        }

        fn ranked_weeks(&self, tournament_id: TournamentId) -> Result<Vec<Week>> {
            self.inner.ranked_weeks(tournament_id)
        }

        fn rankings(&self, scope: &Scope) -> Result<Vec<TeamRanking>> {
            self.inner.rankings(scope)
        }
    }

    #[test]
    fn test_failing_week_does_not_block_other_weeks() {
        let (teams, rounds) = league();
        let memory = MemoryStore::new(teams, rounds);
        let store = FailingWeekStore {
            inner: &memory,
            failing: Week::Label("1".to_string()),
        };
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let calculator = TeamRankingCalculator::new(&memory, &store, &sink, &settings);

        let report = calculator.recalculate_all(1).unwrap();

        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].scope().week, Week::Label("1".to_string()));
        assert!(report.failed[0].to_string().contains("disk full"));
        assert!(memory.rankings(&Scope::new(1, Week::Label("1".to_string()))).unwrap().is_empty());
        assert_eq!(memory.rankings(&Scope::cumulative(1)).unwrap().len(), 4);
    }

    struct BrokenSource;

    impl RoundSource for BrokenSource {
        fn load_scope(&self, _scope: &Scope) -> Result<ScopeSnapshot> {
            Err(anyhow!("connection refused"))
        }

        fn weeks(&self, _tournament_id: TournamentId) -> Result<Vec<String>> {
            Ok(vec!["1".to_string()])
        }
    }

    #[test]
    fn test_source_failure_writes_nothing() {
        let memory = MemoryStore::default();
        let sink = MemorySink::new();
        let settings = RankingSettings::default();
        let source = BrokenSource;
        let calculator = TeamRankingCalculator::new(&source, &memory, &sink, &settings);

        let err = calculator
            .calculate_for_week(1, &Week::Cumulative)
            .unwrap_err();

        assert!(matches!(err, RankingError::DataAccess { .. }));
        assert!(memory.ranked_weeks(1).unwrap().is_empty());
    }

    #[test]
    fn test_week_labels_sort_numerically() {
        let labels = ["10", "2", "playoffs", "2"];
        let tasks = week_tasks(labels.iter().map(|l| l.to_string()).collect());
        assert_eq!(
            tasks,
            vec![
                Week::Label("2".to_string()),
                Week::Label("10".to_string()),
                Week::Label("playoffs".to_string()),
                Week::Cumulative
            ]
        );
    }
}
