pub mod settings;

pub use settings::{AppConfig, DatabaseSettings, LossTiebreak, RankingSettings};
