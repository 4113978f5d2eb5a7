//! Artist enrichment workflow
//!
//! Per artist: build query → search MusicBrainz → take the best candidate → merge.
//! Artists are processed sequentially; one artist's failure does not affect
//! the others.

use crate::error::{EnrichError, EnrichResult};
use crate::models::LocalArtistRecord;
use crate::musicbrainz_client::ArtistSearch;
use crate::query_builder::QueryBuilder;
use crate::record_merger::merge_into;
use tracing::{debug, info, warn};

/// Default number of candidates requested per search
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Result of enriching one artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichOutcome {
    /// Query sent to MusicBrainz
    pub query: String,
    /// Number of candidates returned
    pub candidates: usize,
    /// MBID of the merged candidate
    pub candidate_id: Option<String>,
    /// Local fields changed by the merge
    pub updated: Vec<&'static str>,
}

/// Enriches local artist records from an [`ArtistSearch`] backend
pub struct ArtistEnricher<S> {
    search: S,
    query_builder: QueryBuilder,
    search_limit: u32,
    overwrite: bool,
}

impl<S: ArtistSearch> ArtistEnricher<S> {
    pub fn new(search: S, query_builder: QueryBuilder) -> Self {
        Self {
            search,
            query_builder,
            search_limit: DEFAULT_SEARCH_LIMIT,
            overwrite: false,
        }
    }

    /// Allow MusicBrainz values to replace non-empty local values
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Candidates requested per search (minimum 1)
    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /// Enrich one artist in place
    ///
    /// # Errors
    /// - [`EnrichError::Query`] before any request if the country is unmapped
    /// - [`EnrichError::MusicBrainz`] if the search fails
    /// - [`EnrichError::NoCandidates`] if nothing matched
    ///
    /// The artist is left untouched on error.
    pub async fn enrich(&self, artist: &mut LocalArtistRecord) -> EnrichResult<EnrichOutcome> {
        let query = self.query_builder.build(artist)?;
        debug!(query = %query, "Searching MusicBrainz for artist");

        let candidates = self
            .search
            .search_artists(&query, self.search_limit)
            .await?;
        let count = candidates.len();

        let best = candidates
            .into_iter()
            .next()
            .ok_or_else(|| EnrichError::NoCandidates(query.clone()))?;

        let report = merge_into(artist, &best, self.overwrite);

        info!(
            artist = %artist.name.as_deref().unwrap_or("Unknown"),
            mbid = ?best.id,
            candidates = count,
            updated = ?report.updated,
            "Artist enriched"
        );

        Ok(EnrichOutcome {
            query,
            candidates: count,
            candidate_id: best.id,
            updated: report.updated,
        })
    }

    /// Enrich many artists, one result per artist in input order
    pub async fn enrich_all(
        &self,
        artists: &mut [LocalArtistRecord],
    ) -> Vec<EnrichResult<EnrichOutcome>> {
        let mut results = Vec::with_capacity(artists.len());

        for artist in artists.iter_mut() {
            let result = self.enrich(artist).await;
            if let Err(e) = &result {
                warn!(
                    artist = %artist.name.as_deref().unwrap_or("Unknown"),
                    error = %e,
                    "Artist not enriched"
                );
            }
            results.push(result);
        }

        results
    }
}
