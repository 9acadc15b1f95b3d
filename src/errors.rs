use thiserror::Error;

use crate::domain::Scope;

/// Fatal error for one ranking scope. Mapping failures are not errors; see `MappingFailure`.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("data access failed for {scope}: {cause:#}")]
    DataAccess { scope: Scope, cause: anyhow::Error },
}

impl RankingError {
    pub fn data_access(scope: &Scope) -> impl FnOnce(anyhow::Error) -> RankingError + '_ {
        move |cause| RankingError::DataAccess {
            scope: scope.clone(),
            cause,
        }
    }

    pub fn scope(&self) -> &Scope {
        match self {
            RankingError::DataAccess { scope, .. } => scope,
        }
    }
}
