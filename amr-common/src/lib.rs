//! # AMR Common Library
//!
//! Shared code for the artist metadata retrieval crates:
//! - Error and result types
//! - TOML bootstrap configuration (logging, MusicBrainz access, country codes)
//! - Configuration file resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
