pub mod aggregator;
pub mod calculator;
pub mod ordering;
pub mod statistics;
pub mod types;

pub use aggregator::aggregate_matches;
pub use calculator::TeamRankingCalculator;
pub use ordering::rank_teams;
pub use statistics::build_statistics;
pub use types::{
    MappedRound, MatchOutcome, MatchRecord, MatchSummary, RecalculationReport, TeamMatchResult,
    TeamRanking, TeamWeekStatistics, WeekReport,
};
