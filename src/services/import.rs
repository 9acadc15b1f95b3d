use anyhow::Result;
use log::info;
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::database::{ImportCounts, SqliteStore};
use crate::domain::TournamentSnapshot;

pub struct ImportService {
    store: SqliteStore,
}

impl ImportService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open(&config.database.path)?,
        })
    }

    pub fn run(&self, file: &Path, reset: bool) -> Result<ImportCounts> {
        info!("=== Starting Snapshot Import ===\n");

        if reset {
            self.store.reset()?;
            info!("  → Database schema reset\n");
        }

        let snapshot = self.load_snapshot(file)?;
        info!(
            "  → Loaded tournament {} '{}' from {}\n",
            snapshot.tournament_id,
            snapshot.name,
            file.display()
        );

        let counts = self.store.import_snapshot(&snapshot)?;
        info!("  → Stored {} teams and {} rounds\n", counts.teams, counts.rounds);

        info!("=== Import Complete ===");
        Ok(counts)
    }

    fn load_snapshot(&self, file: &Path) -> Result<TournamentSnapshot> {
        let snapshot = TournamentSnapshot::load(file)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
