//! MusicBrainz artist search query construction
//!
//! Builds a Lucene query from the fields of a local artist record:
//! `name:"<name>" AND country:"<code>"`.

use crate::models::{is_empty_value, LocalArtistRecord};
use amr_common::config::{is_valid_value, CountriesConfig, DEFAULT_COUNTRY_CODE};
use std::collections::BTreeMap;
use thiserror::Error;

/// Query construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The record's country has no entry in the country code table
    #[error("No country code mapped for country: {0}")]
    UnmappedCountry(String),
}

/// Transforms a user-supplied value before it is placed inside quotes
pub type Escaper = fn(&str) -> String;

/// Display country name → two-letter code
///
/// Immutable once built; clone it or share it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCodeTable {
    codes: BTreeMap<String, String>,
    default_code: Option<String>,
}

impl CountryCodeTable {
    /// Table with explicit codes and fallback code
    pub fn new<I, K, V>(codes: I, default_code: Option<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|(name, code)| (name.into(), code.into()))
                .collect(),
            default_code,
        }
    }

    /// Built-in table: Italia → IT, fallback IT
    pub fn builtin() -> Self {
        Self::new([("Italia", "IT")], Some(DEFAULT_COUNTRY_CODE.to_string()))
    }

    /// Built-in table extended with configured codes
    ///
    /// Configured entries win over built-in ones; a blank `default_code`
    /// disables the fallback clause.
    pub fn from_config(config: &CountriesConfig) -> Self {
        let mut table = Self::builtin();
        table.codes.extend(
            config
                .codes
                .iter()
                .map(|(name, code)| (name.clone(), code.clone())),
        );
        table.default_code = is_valid_value(&config.default_code)
            .then(|| config.default_code.trim().to_string());
        table
    }

    /// Code for a display country name (exact match)
    pub fn code_for(&self, country: &str) -> Option<&str> {
        self.codes.get(country).map(String::as_str)
    }

    /// Code used when a record has no country
    pub fn default_code(&self) -> Option<&str> {
        self.default_code.as_deref()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for CountryCodeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Artist search query builder
#[derive(Clone, Default)]
pub struct QueryBuilder {
    countries: CountryCodeTable,
    escaper: Option<Escaper>,
}

impl QueryBuilder {
    pub fn new(countries: CountryCodeTable) -> Self {
        Self {
            countries,
            escaper: None,
        }
    }

    /// Escape the artist name before interpolation (off by default)
    pub fn with_escaper(mut self, escaper: Escaper) -> Self {
        self.escaper = Some(escaper);
        self
    }

    /// Build the search query for an artist
    ///
    /// # Errors
    /// [`QueryError::UnmappedCountry`] if the artist's country is not in the table.
    pub fn build(&self, artist: &LocalArtistRecord) -> Result<String, QueryError> {
        let mut clauses = Vec::with_capacity(2);

        if let Some(name) = artist.name.as_deref().filter(|n| !n.is_empty()) {
            let name = match self.escaper {
                Some(escape) => escape(name),
                None => name.to_string(),
            };
            clauses.push(format!("name:\"{}\"", name));
        }

        if is_empty_value(artist.country.as_deref()) {
            if let Some(code) = self.countries.default_code() {
                clauses.push(format!("country:\"{}\"", code));
            }
        } else {
            let country = artist.country.as_deref().unwrap_or_default();
            let code = self
                .countries
                .code_for(country)
                .ok_or_else(|| QueryError::UnmappedCountry(country.to_string()))?;
            clauses.push(format!("country:\"{}\"", code));
        }

        Ok(clauses.join(" AND "))
    }
}

/// Build a query with the built-in country table and no escaping
pub fn build_query(artist: &LocalArtistRecord) -> Result<String, QueryError> {
    QueryBuilder::default().build(artist)
}

/// Backslash-escape Lucene special characters
///
/// Escapes `+ - ! ( ) { } [ ] ^ " ~ * ? : \ /`.
pub fn escape_lucene(value: &str) -> String {
    const SPECIAL: &[char] = &[
        '+', '-', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
    ];

    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
