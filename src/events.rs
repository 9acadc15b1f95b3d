use log::{log, Level};
use serde::Serialize;
use std::sync::Mutex;

use crate::domain::{RoundId, Scope, Slot, TeamId};
use crate::mapping::MappingFailure;

/// Structured decision made by the engine, keyed by the identifiers it concerns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DecisionEvent {
    CandidateEvaluated {
        round_id: RoundId,
        team_id: TeamId,
        matches1: usize,
        matches2: usize,
        preferred_slot: Option<Slot>,
        confidence: f64,
    },
    MappingResolved {
        round_id: RoundId,
        team1: TeamId,
        team1_confidence: f64,
        team2: TeamId,
        team2_confidence: f64,
    },
    MappingFailed {
        round_id: RoundId,
        reason: MappingFailure,
    },
    TeamStatistics {
        scope: Scope,
        team_id: TeamId,
        rounds_won: i32,
        rounds_tied: i32,
        rounds_lost: i32,
        ticket_differential: i64,
        matches_played: i32,
    },
    RankAssigned {
        scope: Scope,
        team_id: TeamId,
        rank: i32,
    },
    ScopeReplaced {
        scope: Scope,
        rows: usize,
    },
    ScopeCleared {
        scope: Scope,
    },
}

impl DecisionEvent {
    /// Log level for the event: per-candidate and per-team detail is debug, mapping
    /// resolutions and scope writes are info, mapping failures are warn
    pub fn level(&self) -> Level {
        match self {
            DecisionEvent::CandidateEvaluated { .. }
            | DecisionEvent::TeamStatistics { .. }
            | DecisionEvent::RankAssigned { .. } => Level::Debug,
            DecisionEvent::MappingResolved { .. }
            | DecisionEvent::ScopeReplaced { .. }
            | DecisionEvent::ScopeCleared { .. } => Level::Info,
            DecisionEvent::MappingFailed { .. } => Level::Warn,
        }
    }
}

/// Receiver for decision events. Formatting and transport belong to the implementation.
pub trait DecisionSink: Send + Sync {
    fn emit(&self, event: DecisionEvent);
}

/// Forwards decision events to the `log` facade as key=value lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DecisionSink for LogSink {
    fn emit(&self, event: DecisionEvent) {
        let level = event.level();
        match event {
            DecisionEvent::CandidateEvaluated {
                round_id,
                team_id,
                matches1,
                matches2,
                preferred_slot,
                confidence,
            } => log!(
                level,
                "candidate round={} team={} matches1={} matches2={} preferred={} confidence={:.3}",
                round_id,
                team_id,
                matches1,
                matches2,
                preferred_slot.map(|s| s.as_str().to_string()).unwrap_or_else(|| "ambiguous".to_string()),
                confidence
            ),
            DecisionEvent::MappingResolved {
                round_id,
                team1,
                team1_confidence,
                team2,
                team2_confidence,
            } => log!(
                level,
                "mapping_resolved round={} team1={} confidence1={:.3} team2={} confidence2={:.3}",
                round_id, team1, team1_confidence, team2, team2_confidence
            ),
            DecisionEvent::MappingFailed { round_id, reason } => {
                log!(level, "mapping_failed round={} reason=\"{}\"", round_id, reason)
            }
            DecisionEvent::TeamStatistics {
                scope,
                team_id,
                rounds_won,
                rounds_tied,
                rounds_lost,
                ticket_differential,
                matches_played,
            } => log!(
                level,
                "team_statistics tournament={} week={} team={} won={} tied={} lost={} diff={} matches={}",
                scope.tournament_id,
                scope.week,
                team_id,
                rounds_won,
                rounds_tied,
                rounds_lost,
                ticket_differential,
                matches_played
            ),
            DecisionEvent::RankAssigned { scope, team_id, rank } => log!(
                level,
                "rank_assigned tournament={} week={} team={} rank={}",
                scope.tournament_id, scope.week, team_id, rank
            ),
            DecisionEvent::ScopeReplaced { scope, rows } => {
                log!(level, "rankings_replaced scope=\"{}\" rows={}", scope, rows)
            }
            DecisionEvent::ScopeCleared { scope } => {
                log!(level, "rankings_cleared scope=\"{}\"", scope)
            }
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DecisionEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DecisionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DecisionSink for MemorySink {
    fn emit(&self, event: DecisionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_emission_order() {
        let sink = MemorySink::new();
        sink.emit(DecisionEvent::ScopeCleared { scope: Scope::cumulative(1) });
        sink.emit(DecisionEvent::RankAssigned {
            scope: Scope::cumulative(1),
            team_id: 3,
            rank: 1,
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DecisionEvent::ScopeCleared { .. }));
        assert!(matches!(events[1], DecisionEvent::RankAssigned { rank: 1, .. }));
    }

    #[test]
    fn test_outcomes_log_at_info_and_failures_at_warn() {
        let resolved = DecisionEvent::MappingResolved {
            round_id: 1,
            team1: 1,
            team1_confidence: 1.0,
            team2: 2,
            team2_confidence: 1.0,
        };
        let failed = DecisionEvent::MappingFailed {
            round_id: 2,
            reason: MappingFailure::InsufficientMatches {
                matched_teams: 0,
                viable_teams: 0,
            },
        };
        let ranked = DecisionEvent::RankAssigned {
            scope: Scope::cumulative(1),
            team_id: 1,
            rank: 1,
        };

        assert_eq!(resolved.level(), Level::Info);
        assert_eq!(DecisionEvent::ScopeCleared { scope: Scope::cumulative(1) }.level(), Level::Info);
        assert_eq!(failed.level(), Level::Warn);
        assert_eq!(ranked.level(), Level::Debug);
    }
}
