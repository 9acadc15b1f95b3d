pub mod overlap;
pub mod resolver;
pub mod types;

pub use overlap::{match_rosters, OverlapCandidate};
pub use resolver::TeamMappingResolver;
pub use types::{failure_counts, FailureKind, MappingFailure, MappingStatus, SlotAssignment, TeamMapping};
