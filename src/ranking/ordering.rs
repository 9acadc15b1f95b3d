// Standings order: a strict total order over team statistics.

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::config::settings::{LossTiebreak, RankingSettings};

use super::types::{TeamRanking, TeamWeekStatistics};

type CmpFunc = fn(&TeamWeekStatistics, &TeamWeekStatistics) -> Ordering;

fn compare_points(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    b.points.cmp(&a.points)
}

fn compare_rounds_tied(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    b.rounds_tied.cmp(&a.rounds_tied)
}

fn compare_more_losses_first(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    b.rounds_lost.cmp(&a.rounds_lost)
}

fn compare_fewer_losses_first(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    a.rounds_lost.cmp(&b.rounds_lost)
}

fn compare_ticket_differential(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    b.ticket_differential.cmp(&a.ticket_differential)
}

fn compare_team_id(a: &TeamWeekStatistics, b: &TeamWeekStatistics) -> Ordering {
    a.team_id.cmp(&b.team_id)
}

/// Tie-break chain in priority order. The team id tier makes the order total.
pub fn criteria(settings: &RankingSettings) -> [CmpFunc; 5] {
    let losses: CmpFunc = match settings.loss_tiebreak {
        LossTiebreak::MoreLossesFirst => compare_more_losses_first,
        LossTiebreak::FewerLossesFirst => compare_fewer_losses_first,
    };

    [
        compare_points,
        compare_rounds_tied,
        losses,
        compare_ticket_differential,
        compare_team_id,
    ]
}

pub fn compare_standings(
    a: &TeamWeekStatistics,
    b: &TeamWeekStatistics,
    settings: &RankingSettings,
) -> Ordering {
    criteria(settings)
        .iter()
        .map(|cmp| cmp(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Sorts the statistics and assigns ranks 1..=N in that order
pub fn rank_teams(
    mut statistics: Vec<TeamWeekStatistics>,
    settings: &RankingSettings,
    updated_at: NaiveDateTime,
) -> Vec<TeamRanking> {
    statistics.sort_by(|a, b| compare_standings(a, b, settings));

    statistics
        .into_iter()
        .enumerate()
        .map(|(idx, stats)| TeamRanking {
            statistics: stats,
            rank: idx as i32 + 1,
            updated_at,
        })
        .collect()
}
