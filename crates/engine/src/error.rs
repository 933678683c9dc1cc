use database::DbError;
use thiserror::Error;

/// Errors surfaced by the index engine.
///
/// Two absences are deliberately *not* errors: a date with fewer than N
/// qualifying stocks is skipped by the builder (warn log only), and any
/// cache failure is swallowed inside the cache crate.
#[derive(Error, Debug)]
pub enum IndexError {
    /// No trading data exists for the requested build range.
    #[error("No trading data available for {0}")]
    NoData(String),

    /// A read operation matched no stored rows.
    #[error("No {0} available for {1}")]
    NotFound(&'static str, String),

    /// Anything else the store reported.
    #[error(transparent)]
    Db(#[from] DbError),
}
