//! Error types for amr-enrich

use crate::musicbrainz_client::MBError;
use crate::query_builder::QueryError;
use thiserror::Error;

/// Per-artist enrichment error
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Query could not be built (artist skipped before any request)
    #[error(transparent)]
    Query(#[from] QueryError),

    /// MusicBrainz request failed
    #[error("MusicBrainz error: {0}")]
    MusicBrainz(#[from] MBError),

    /// Search returned no candidates
    #[error("No MusicBrainz candidates for query: {0}")]
    NoCandidates(String),
}

/// Result type for enrichment operations
pub type EnrichResult<T> = Result<T, EnrichError>;
