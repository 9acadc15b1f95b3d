/// Terminal and JSON rendering of reports and standings.
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Slot, TeamId};
use crate::mapping::FailureKind;
use crate::ranking::{RecalculationReport, TeamRanking, WeekReport};
use crate::services::ranking::{MappingReport, Standings};

#[derive(Serialize)]
struct JsonStandings<'a> {
    tournament_id: i64,
    tournament_name: Option<&'a str>,
    week: Option<&'a str>,
    rows: &'a [TeamRanking],
}

pub fn print_mapping_report(report: &MappingReport, names: &HashMap<TeamId, String>) {
    println!("{}", format!("Round mappings for {}", report.scope).bold());

    for mapping in &report.mappings {
        match mapping.failure() {
            Some(reason) => println!("  round {:>6}  {}", mapping.round_id, reason.to_string().red()),
            None => println!(
                "  round {:>6}  team1 = {}  team2 = {}",
                mapping.round_id,
                team_label(mapping.team_in(Slot::Team1), names),
                team_label(mapping.team_in(Slot::Team2), names),
            ),
        }
    }

    let failures = report.failure_counts();
    println!(
        "\n{} of {} rounds resolved",
        report.resolved().to_string().green(),
        report.mappings.len()
    );
    print_failure_counts(&failures);
}

pub fn print_week_report(report: &WeekReport, names: &HashMap<TeamId, String>) {
    println!("{}", format!("Standings for {}", report.scope).bold());

    if report.cleared {
        println!("  {}", "No mapped rounds; stored rankings removed".yellow());
    } else {
        print_table(&report.rankings, names);
    }

    println!("\n{} rounds mapped", report.resolved_rounds.to_string().green());
    print_failure_counts(&report.failures);
}

pub fn print_recalculation_report(report: &RecalculationReport, names: &HashMap<TeamId, String>) {
    for week in &report.completed {
        print_week_report(week, names);
        println!();
    }

    for scope in &report.cleared_stale {
        println!("{} {}", "Removed stale rankings:".yellow(), scope);
    }

    if !report.failed.is_empty() {
        println!("{}", "Failed scopes (data access):".red().bold());
        for error in &report.failed {
            println!("  {}", error.to_string().red());
        }
    }
}

pub fn print_standings(standings: &Standings, names: &HashMap<TeamId, String>) {
    let title = match &standings.tournament_name {
        Some(name) => format!("{} ({})", name, standings.scope.week),
        None => standings.scope.to_string(),
    };
    println!("{}", title.bold());

    if standings.rows.is_empty() {
        println!("  {}", "No rankings stored for this scope".yellow());
        return;
    }

    print_table(&standings.rows, names);
    if let Some(updated_at) = standings.rows.first().map(|r| r.updated_at) {
        println!("\nUpdated {}", updated_at.format("%Y-%m-%d %H:%M:%S"));
    }
}

pub fn print_standings_json(standings: &Standings) -> Result<()> {
    let output = JsonStandings {
        tournament_id: standings.scope.tournament_id,
        tournament_name: standings.tournament_name.as_deref(),
        week: standings.scope.week.label(),
        rows: &standings.rows,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_table(rankings: &[TeamRanking], names: &HashMap<TeamId, String>) {
    let labels: Vec<String> = rankings
        .iter()
        .map(|r| team_label(Some(r.team_id()), names))
        .collect();
    let name_width = labels.iter().map(|l| l.len()).max().unwrap_or(4).max(4);

    println!(
        "  # | {:<name_width$} | Pts |  W |  T |  L | Tickets +/-      | Diff   | Matches W-T-L",
        "Team"
    );
    println!("----|-{}-|-----|----|----|----|------------------|--------|--------------", "-".repeat(name_width));

    for (ranking, label) in rankings.iter().zip(&labels) {
        let s = &ranking.statistics;
        let line = format!(
            "{:>3} | {:<name_width$} | {:>3} | {:>2} | {:>2} | {:>2} | {:>7} / {:<7} | {:>+6} | {}-{}-{} ({})",
            ranking.rank,
            label,
            s.points,
            s.rounds_won,
            s.rounds_tied,
            s.rounds_lost,
            s.tickets_for,
            s.tickets_against,
            s.ticket_differential,
            s.victories,
            s.ties,
            s.losses,
            s.matches_played,
        );
        if ranking.rank == 1 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
}

fn print_failure_counts(failures: &BTreeMap<FailureKind, usize>) {
    for (kind, count) in failures {
        println!("{} rounds unmapped: {}", count.to_string().red(), kind.as_str());
    }
}

fn team_label(team_id: Option<TeamId>, names: &HashMap<TeamId, String>) -> String {
    match team_id {
        Some(id) => names
            .get(&id)
            .map(|name| format!("{} (#{})", name, id))
            .unwrap_or_else(|| format!("#{}", id)),
        None => "-".to_string(),
    }
}
