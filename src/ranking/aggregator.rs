use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{MatchKey, TeamId};

use super::types::{MappedRound, MatchOutcome, MatchRecord, MatchSummary, TeamMatchResult};

/// Groups mapped rounds by match key and decides each match on summed tickets.
///
/// Individual round winners are irrelevant here; only the ticket totals over the
/// whole match count. Output is ordered by match key.
pub fn aggregate_matches(rounds: &[MappedRound<'_>]) -> Vec<MatchSummary> {
    group_by_match(rounds)
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(key, members)| summarize_match(key, &members))
        .collect()
}

fn group_by_match<'a>(rounds: &[MappedRound<'a>]) -> BTreeMap<MatchKey, Vec<MappedRound<'a>>> {
    let mut groups: BTreeMap<MatchKey, Vec<MappedRound<'a>>> = BTreeMap::new();
    for mapped in rounds {
        groups.entry(mapped.match_key()).or_default().push(*mapped);
    }
    groups
}

fn summarize_match(key: MatchKey, members: &[MappedRound<'_>]) -> MatchSummary {
    let (low, high) = (key.teams.low(), key.teams.high());
    let (low_for, low_against) = sum_tickets(members, low);
    let low_outcome = decide(low_for, low_against);

    let record = MatchRecord {
        rounds: members.iter().map(|m| m.round.id).collect(),
        maps: collect_maps(members),
        key,
    };

    MatchSummary {
        record,
        results: [
            TeamMatchResult {
                team_id: low,
                tickets_for: low_for,
                tickets_against: low_against,
                outcome: low_outcome,
            },
            TeamMatchResult {
                team_id: high,
                tickets_for: low_against,
                tickets_against: low_for,
                outcome: mirror(low_outcome),
            },
        ],
    }
}

fn sum_tickets(members: &[MappedRound<'_>], team_id: TeamId) -> (i64, i64) {
    members
        .iter()
        .filter_map(|m| m.slot_of(team_id).map(|slot| (m.round, slot)))
        .fold((0, 0), |(tickets_for, tickets_against), (round, slot)| {
            (
                tickets_for + round.tickets(slot),
                tickets_against + round.tickets(slot.other()),
            )
        })
}

fn collect_maps(members: &[MappedRound<'_>]) -> BTreeSet<String> {
    members
        .iter()
        .filter_map(|m| m.round.map.clone())
        .collect()
}

fn decide(tickets_for: i64, tickets_against: i64) -> MatchOutcome {
    match tickets_for.cmp(&tickets_against) {
        Ordering::Greater => MatchOutcome::Victory,
        Ordering::Equal => MatchOutcome::Tie,
        Ordering::Less => MatchOutcome::Loss,
    }
}

fn mirror(outcome: MatchOutcome) -> MatchOutcome {
    match outcome {
        MatchOutcome::Victory => MatchOutcome::Loss,
        MatchOutcome::Tie => MatchOutcome::Tie,
        MatchOutcome::Loss => MatchOutcome::Victory,
    }
}
