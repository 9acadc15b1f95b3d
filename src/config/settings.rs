use clap::ValueEnum;

/// Direction of the round-losses tier in the standings order.
///
/// `MoreLossesFirst` is the documented league policy: with equal points and ties, the
/// team with more losses ranks higher. `FewerLossesFirst` is the conventional reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LossTiebreak {
    #[default]
    MoreLossesFirst,
    FewerLossesFirst,
}

#[derive(Debug, Clone, Default)]
pub struct RankingSettings {
    pub loss_tiebreak: LossTiebreak,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "team_rankings.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub ranking: RankingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database: DatabaseSettings::default(),
            ranking: RankingSettings::default(),
        }
    }

    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.database.path = path;
        }
        self
    }

    pub fn with_loss_tiebreak(mut self, loss_tiebreak: Option<LossTiebreak>) -> Self {
        if let Some(loss_tiebreak) = loss_tiebreak {
            self.ranking.loss_tiebreak = loss_tiebreak;
        }
        self
    }
}
