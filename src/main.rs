use anyhow::Result;

use team_ranking_engine::cli::{Cli, Command};
use team_ranking_engine::{
    build_config, handle_completions, handle_import, handle_map, handle_rank, handle_recalculate,
    handle_show, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = build_config(cli);
    match &cli.command {
        Command::Import { file, reset } => handle_import(config, file, *reset),
        Command::Map { tournament, week } => handle_map(config, *tournament, week.as_deref()),
        Command::Rank { tournament, week } => handle_rank(config, *tournament, week.as_deref()),
        Command::Recalculate { tournament } => handle_recalculate(config, *tournament),
        Command::Show {
            tournament,
            week,
            json,
        } => handle_show(config, *tournament, week.as_deref(), *json),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
