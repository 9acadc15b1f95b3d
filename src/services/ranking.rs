use anyhow::{Context, Result};
use log::info;
use std::collections::{BTreeMap, HashMap};

use crate::config::settings::AppConfig;
use crate::database::SqliteStore;
use crate::domain::{Scope, TeamId, TournamentId, Week};
use crate::events::LogSink;
use crate::mapping::{failure_counts, FailureKind, TeamMapping, TeamMappingResolver};
use crate::ranking::{RecalculationReport, TeamRanking, TeamRankingCalculator, WeekReport};
use crate::store::{RankingStore, RoundSource};

/// Per-round mapping outcome for a scope, without touching stored rankings
#[derive(Debug)]
pub struct MappingReport {
    pub scope: Scope,
    pub mappings: Vec<TeamMapping>,
}

impl MappingReport {
    pub fn resolved(&self) -> usize {
        self.mappings.iter().filter(|m| m.is_resolved()).count()
    }

    pub fn failure_counts(&self) -> BTreeMap<FailureKind, usize> {
        failure_counts(&self.mappings)
    }
}

#[derive(Debug)]
pub struct Standings {
    pub scope: Scope,
    pub tournament_name: Option<String>,
    pub rows: Vec<TeamRanking>,
}

pub struct RankingService {
    config: AppConfig,
    store: SqliteStore,
    sink: LogSink,
}

impl RankingService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = SqliteStore::open(&config.database.path)?;
        Ok(Self {
            config,
            store,
            sink: LogSink,
        })
    }

    pub fn map_rounds(&self, tournament_id: TournamentId, week: Week) -> Result<MappingReport> {
        let scope = Scope::new(tournament_id, week);
        let snapshot = self.store.load_scope(&scope)?;
        let resolver = TeamMappingResolver::new(&self.sink);

        let mappings = snapshot
            .rounds
            .iter()
            .map(|round| resolver.resolve(round, &snapshot.teams))
            .collect();

        Ok(MappingReport { scope, mappings })
    }

    pub fn rank_week(&self, tournament_id: TournamentId, week: Week) -> Result<WeekReport> {
        info!("=== Calculating Rankings ===\n");
        let report = self.calculator().calculate_for_week(tournament_id, &week)?;
        info!("=== Calculation Complete ===");
        Ok(report)
    }

    pub fn recalculate(&self, tournament_id: TournamentId) -> Result<RecalculationReport> {
        info!("=== Recalculating All Weeks ===\n");
        let report = self.calculator().recalculate_all(tournament_id)?;
        info!(
            "=== Recalculation Complete: {} scopes written, {} failed ===",
            report.completed.len(),
            report.failed.len()
        );
        Ok(report)
    }

    pub fn standings(&self, tournament_id: TournamentId, week: Week) -> Result<Standings> {
        let scope = Scope::new(tournament_id, week);
        let tournament_name = self.store.tournament(tournament_id)?.map(|t| t.name);
        let rows = self
            .store
            .rankings(&scope)
            .with_context(|| format!("Failed to read standings for {}", scope))?;

        Ok(Standings {
            scope,
            tournament_name,
            rows,
        })
    }

    pub fn team_names(&self, tournament_id: TournamentId) -> Result<HashMap<TeamId, String>> {
        Ok(self
            .store
            .teams(tournament_id)?
            .into_iter()
            .map(|team| (team.id, team.name))
            .collect())
    }

    fn calculator(&self) -> TeamRankingCalculator<'_> {
        TeamRankingCalculator::new(&self.store, &self.store, &self.sink, &self.config.ranking)
    }
}
