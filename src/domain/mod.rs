pub mod match_key;
pub mod models;
pub mod snapshot;

pub use match_key::{Fixture, MatchKey, TeamPair};
pub use models::*;
pub use snapshot::TournamentSnapshot;
