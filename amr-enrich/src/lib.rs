//! amr-enrich: artist metadata retrieval from MusicBrainz
//!
//! - [`query_builder`]: local artist → Lucene search query
//! - [`record_merger`]: MusicBrainz artist → local artist, under an overwrite policy
//! - [`musicbrainz_client`]: client setup and artist search
//! - [`enricher`]: build query → search → merge, per artist

pub mod config;
pub mod enricher;
pub mod error;
pub mod models;
pub mod musicbrainz_client;
pub mod query_builder;
pub mod record_merger;

pub use crate::enricher::{ArtistEnricher, EnrichOutcome};
pub use crate::error::{EnrichError, EnrichResult};
pub use crate::models::{ExternalArtistRecord, LocalArtistRecord};
pub use crate::musicbrainz_client::{ArtistSearch, ClientSettings, MBError, MusicBrainzClient};
pub use crate::query_builder::{build_query, escape_lucene, CountryCodeTable, QueryBuilder, QueryError};
pub use crate::record_merger::{merge, merge_into, MergeReport};
