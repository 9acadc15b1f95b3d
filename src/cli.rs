use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::LossTiebreak;

#[derive(Parser, Debug)]
#[command(author, version, about = "Roster-based team mapping and weekly team rankings")]
pub struct Cli {
    /// SQLite database file (defaults to $DATABASE_PATH, then team_rankings.db)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Direction of the round-losses tiebreak
    #[arg(long, global = true, value_enum)]
    pub loss_tiebreak: Option<LossTiebreak>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Load a tournament snapshot (JSON) into the database
    Import {
        /// Snapshot file
        file: PathBuf,
        /// Drop and recreate all tables first
        #[arg(long)]
        reset: bool,
    },
    /// Show how each round maps onto registered teams
    Map {
        #[arg(short, long)]
        tournament: i64,
        /// Week label (omit for all rounds)
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Calculate and store rankings for one week, or cumulative when no week is given
    Rank {
        #[arg(short, long)]
        tournament: i64,
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Recalculate every week of a tournament, then the cumulative standings
    Recalculate {
        #[arg(short, long)]
        tournament: i64,
    },
    /// Print stored standings
    Show {
        #[arg(short, long)]
        tournament: i64,
        #[arg(short, long)]
        week: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
