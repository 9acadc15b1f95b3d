pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod events;
pub mod mapping;
pub mod output;
pub mod ranking;
pub mod services;
pub mod store;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::path::Path;

use crate::cli::Cli;
use crate::config::settings::AppConfig;
use crate::domain::{TournamentId, Week};
use crate::services::import::ImportService;
use crate::services::ranking::RankingService;

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn build_config(cli: &Cli) -> AppConfig {
    AppConfig::new()
        .with_database_path(cli.database.clone())
        .with_loss_tiebreak(cli.loss_tiebreak)
}

pub fn handle_import(config: AppConfig, file: &Path, reset: bool) -> Result<()> {
    let service = ImportService::new(&config)?;
    let counts = service.run(file, reset)?;
    println!("Imported {} teams and {} rounds", counts.teams, counts.rounds);
    Ok(())
}

pub fn handle_map(config: AppConfig, tournament_id: TournamentId, week: Option<&str>) -> Result<()> {
    let service = RankingService::new(config)?;
    let report = service.map_rounds(tournament_id, Week::from_option(week))?;
    let names = service.team_names(tournament_id)?;
    output::print_mapping_report(&report, &names);
    Ok(())
}

pub fn handle_rank(config: AppConfig, tournament_id: TournamentId, week: Option<&str>) -> Result<()> {
    let service = RankingService::new(config)?;
    let report = service.rank_week(tournament_id, Week::from_option(week))?;
    let names = service.team_names(tournament_id)?;
    output::print_week_report(&report, &names);
    Ok(())
}

pub fn handle_recalculate(config: AppConfig, tournament_id: TournamentId) -> Result<()> {
    let service = RankingService::new(config)?;
    let report = service.recalculate(tournament_id)?;
    let names = service.team_names(tournament_id)?;
    output::print_recalculation_report(&report, &names);

    if !report.failed.is_empty() {
        bail!("{} scope(s) could not be recalculated", report.failed.len());
    }
    Ok(())
}

pub fn handle_show(config: AppConfig, tournament_id: TournamentId, week: Option<&str>, json: bool) -> Result<()> {
    let service = RankingService::new(config)?;
    let standings = service.standings(tournament_id, Week::from_option(week))?;

    if json {
        return output::print_standings_json(&standings);
    }
    let names = service.team_names(tournament_id)?;
    output::print_standings(&standings, &names);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "team-ranking", &mut std::io::stdout());
    Ok(())
}
