//! Artist record types
//!
//! Two shapes are involved in every enrichment:
//! - [`LocalArtistRecord`]: the caller-owned record, all fields optional strings
//! - [`ExternalArtistRecord`]: a read-only MusicBrainz artist as returned by search
//!
//! The external shape accepts both the `tag-list`/`alias-list` spellings and the
//! JSON web service's `tags`/`aliases`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Internal artist record
///
/// Unknown fields in the caller's JSON are kept in `extra` and written back
/// unchanged, so enrichment never drops data it does not understand.
/// Managed fields are strings or null; unset managed fields are omitted on output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LocalArtistRecord {
    /// MusicBrainz artist id (MBID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Binary code: "M" or "F"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_end: Option<String>,
    /// Display country name (e.g. "Italia"), mapped to a code for searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    /// Free text; enrichment fills it with the comma-joined tag names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Fields this crate does not manage
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocalArtistRecord {
    /// Names of the managed fields, in merge order
    pub const FIELD_NAMES: [&'static str; 10] = [
        "id_author",
        "name",
        "gender",
        "birth_date",
        "active_start",
        "active_end",
        "country",
        "birth_place",
        "description",
        "nationality",
    ];

    /// Record with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Managed fields as mutable slots, ordered like [`Self::FIELD_NAMES`]
    pub(crate) fn fields_mut(&mut self) -> [(&'static str, &mut Option<String>); 10] {
        let [id, name, gender, birth, start, end, country, place, desc, nat] = Self::FIELD_NAMES;
        [
            (id, &mut self.id_author),
            (name, &mut self.name),
            (gender, &mut self.gender),
            (birth, &mut self.birth_date),
            (start, &mut self.active_start),
            (end, &mut self.active_end),
            (country, &mut self.country),
            (place, &mut self.birth_place),
            (desc, &mut self.description),
            (nat, &mut self.nationality),
        ]
    }

    /// Managed fields by value, ordered like [`Self::FIELD_NAMES`]
    pub(crate) fn into_fields(self) -> [Option<String>; 10] {
        [
            self.id_author,
            self.name,
            self.gender,
            self.birth_date,
            self.active_start,
            self.active_end,
            self.country,
            self.birth_place,
            self.description,
            self.nationality,
        ]
    }
}

/// True when a local value counts as unset (absent or empty string)
pub fn is_empty_value(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// MusicBrainz artist
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExternalArtistRecord {
    /// Artist MBID
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form gender ("Male", "Female", "Other", ...)
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "life-span")]
    pub life_span: Option<LifeSpan>,
    #[serde(default)]
    pub area: Option<Area>,
    #[serde(default, rename = "begin-area")]
    pub begin_area: Option<Area>,
    #[serde(default, rename = "tag-list", alias = "tags")]
    pub tag_list: Option<Vec<Tag>>,
    #[serde(default, rename = "alias-list", alias = "aliases")]
    pub alias_list: Option<Vec<Alias>>,
}

/// Artist activity period
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LifeSpan {
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub ended: Option<Ended>,
}

/// `life-span.ended` as delivered: a boolean (JSON API) or a string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Ended {
    Flag(bool),
    Text(String),
}

impl Ended {
    /// Value to store as the end of activity, `None` while still active
    ///
    /// Boolean false and the literal "false" both mean "still active".
    pub fn end_marker(&self) -> Option<String> {
        match self {
            Ended::Flag(false) => None,
            Ended::Flag(true) => Some("true".to_string()),
            Ended::Text(text) if text == "false" => None,
            Ended::Text(text) => Some(text.clone()),
        }
    }
}

/// MusicBrainz area (country, city, ...)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Area {
    #[serde(default)]
    pub name: Option<String>,
}

/// Folksonomy tag
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Tag {
    #[serde(default)]
    pub name: Option<String>,
}

/// Alternative artist name
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Alias {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_local_record_keeps_unknown_fields() {
        let value = json!({
            "name": "Giuseppe Verdi",
            "country": "Italia",
            "works_count": 28,
            "notes": "imported 2019"
        });

        let record: LocalArtistRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.name.as_deref(), Some("Giuseppe Verdi"));
        assert_eq!(record.extra.get("works_count"), Some(&json!(28)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["notes"], json!("imported 2019"));
        assert_eq!(back["country"], json!("Italia"));
    }

    #[test]
    fn test_local_record_null_fields() {
        let record: LocalArtistRecord =
            serde_json::from_value(json!({"name": null, "gender": "M"})).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.gender.as_deref(), Some("M"));
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(None));
        assert!(is_empty_value(Some("")));
        assert!(!is_empty_value(Some("x")));
    }

    #[test]
    fn test_external_record_hyphenated_keys() {
        let record: ExternalArtistRecord = serde_json::from_value(json!({
            "id": "1f9df192-a621-4f54-8850-2c5373b7eac9",
            "name": "Ludwig van Beethoven",
            "gender": "male",
            "life-span": {"begin": "1770-12-17", "ended": "true"},
            "area": {"name": "Germany"},
            "begin-area": {"name": "Bonn"},
            "tag-list": [{"name": "classical", "count": "12"}],
            "alias-list": [{"locale": "it", "name": "Ludovico van Beethoven"}]
        }))
        .unwrap();

        let span = record.life_span.as_ref().unwrap();
        assert_eq!(span.begin.as_deref(), Some("1770-12-17"));
        assert_eq!(span.ended, Some(Ended::Text("true".to_string())));
        assert_eq!(record.begin_area.unwrap().name.as_deref(), Some("Bonn"));
        assert_eq!(record.tag_list.unwrap()[0].name.as_deref(), Some("classical"));
        assert_eq!(record.alias_list.unwrap()[0].locale.as_deref(), Some("it"));
    }

    #[test]
    fn test_external_record_web_service_keys() {
        let record: ExternalArtistRecord = serde_json::from_value(json!({
            "id": "1f9df192-a621-4f54-8850-2c5373b7eac9",
            "type": "Person",
            "score": 100,
            "life-span": {"begin": "1813-10-10", "end": "1901-01-27", "ended": true},
            "tags": [{"count": 3, "name": "opera"}],
            "aliases": [{"name": "Verdi", "locale": null}]
        }))
        .unwrap();

        assert_eq!(
            record.life_span.unwrap().ended,
            Some(Ended::Flag(true))
        );
        assert_eq!(record.tag_list.unwrap()[0].name.as_deref(), Some("opera"));
        assert_eq!(record.alias_list.unwrap()[0].locale, None);
        assert_eq!(record.area, None);
    }

    #[test]
    fn test_tag_without_name_keeps_record() {
        let record: ExternalArtistRecord = serde_json::from_value(json!({
            "name": "Giuseppe Verdi",
            "gender": "male",
            "tag-list": [{"count": "3"}]
        }))
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("Giuseppe Verdi"));
        assert_eq!(record.tag_list.unwrap()[0].name, None);
    }

    #[test]
    fn test_unset_fields_omitted_on_output() {
        let value = serde_json::to_value(LocalArtistRecord::named("Verdi")).unwrap();
        assert_eq!(value, json!({"name": "Verdi"}));
    }

    #[test]
    fn test_collection_in_managed_field_rejected() {
        let result = serde_json::from_value::<LocalArtistRecord>(json!({
            "name": "Verdi",
            "description": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_end_marker() {
        assert_eq!(Ended::Flag(false).end_marker(), None);
        assert_eq!(Ended::Text("false".into()).end_marker(), None);
        assert_eq!(Ended::Flag(true).end_marker().as_deref(), Some("true"));
        assert_eq!(Ended::Text("2020".into()).end_marker().as_deref(), Some("2020"));
    }
}
