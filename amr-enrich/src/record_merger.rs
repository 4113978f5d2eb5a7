//! Artist record merging
//!
//! Reconciles one MusicBrainz artist into one local artist record.
//!
//! **Algorithm:**
//! 1. Map the external record onto the local shape ([`derive_candidates`])
//! 2. For every managed field, resolve current vs candidate ([`resolve_field`])
//!
//! **Merge policy (per field, independent):**
//! - Absent candidate → local value kept, even with overwrite
//! - Overwrite on → candidate replaces local value
//! - Overwrite off → candidate only fills an empty local value

use crate::models::{is_empty_value, ExternalArtistRecord, LocalArtistRecord, Tag};
use tracing::debug;

/// Alias locale prefix that marks an Italian artist
const ITALIAN_LOCALE_PREFIX: &str = "it";

/// Nationality written when an Italian alias is found
const ITALIAN_NATIONALITY: &str = "Italia";

/// Fields changed by a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub updated: Vec<&'static str>,
}

impl MergeReport {
    pub fn is_unchanged(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Merge `external` into `local` and return the updated record
pub fn merge(
    mut local: LocalArtistRecord,
    external: &ExternalArtistRecord,
    overwrite: bool,
) -> LocalArtistRecord {
    merge_into(&mut local, external, overwrite);
    local
}

/// Merge `external` into `local` in place
///
/// Fields outside the managed set (`extra`) are never touched.
pub fn merge_into(
    local: &mut LocalArtistRecord,
    external: &ExternalArtistRecord,
    overwrite: bool,
) -> MergeReport {
    let candidates = derive_candidates(external).into_fields();
    let mut report = MergeReport::default();

    for ((field, slot), candidate) in local.fields_mut().into_iter().zip(candidates) {
        let current = slot.take();
        let resolved = resolve_field(current.clone(), candidate, overwrite);

        if resolved != current {
            debug!(field, old = ?current, new = ?resolved, "Artist field updated");
            report.updated.push(field);
        }

        *slot = resolved;
    }

    report
}

/// Resolve one field: keep `current` or take `candidate`
pub fn resolve_field(
    current: Option<String>,
    candidate: Option<String>,
    overwrite: bool,
) -> Option<String> {
    match candidate {
        Some(value) if overwrite || is_empty_value(current.as_deref()) => Some(value),
        _ => current,
    }
}

/// Map a MusicBrainz artist onto the local record shape
///
/// Every returned field is a candidate value; `None` means the external
/// record has nothing usable for that field.
pub fn derive_candidates(external: &ExternalArtistRecord) -> LocalArtistRecord {
    let life_span = external.life_span.as_ref();
    let begin = life_span.and_then(|span| span.begin.clone());

    LocalArtistRecord {
        id_author: external.id.clone(),
        name: external.name.clone(),
        gender: external
            .gender
            .as_deref()
            .and_then(normalize_gender)
            .map(str::to_string),
        birth_date: begin.clone(),
        active_start: begin,
        active_end: life_span
            .and_then(|span| span.ended.as_ref())
            .and_then(|ended| ended.end_marker()),
        country: external.area.as_ref().and_then(|area| area.name.clone()),
        birth_place: external
            .begin_area
            .as_ref()
            .and_then(|area| area.name.clone()),
        description: external.tag_list.as_deref().and_then(join_tag_names),
        nationality: external
            .alias_list
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|alias| {
                alias
                    .locale
                    .as_deref()
                    .is_some_and(|locale| locale.starts_with(ITALIAN_LOCALE_PREFIX))
            })
            .then(|| ITALIAN_NATIONALITY.to_string()),
        extra: Default::default(),
    }
}

/// Comma-join the named tags; `None` when no tag has a name
fn join_tag_names(tags: &[Tag]) -> Option<String> {
    let names: Vec<&str> = tags.iter().filter_map(|tag| tag.name.as_deref()).collect();
    (!names.is_empty()).then(|| names.join(", "))
}

/// Map MusicBrainz gender to the binary code ("M"/"F")
///
/// Anything other than male/female (case-insensitive) has no code.
pub fn normalize_gender(gender: &str) -> Option<&'static str> {
    if gender.eq_ignore_ascii_case("male") {
        Some("M")
    } else if gender.eq_ignore_ascii_case("female") {
        Some("F")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alias, Area, Ended, LifeSpan};
    use serde_json::json;

    fn external(value: serde_json::Value) -> ExternalArtistRecord {
        serde_json::from_value(value).unwrap()
    }

    fn verdi() -> ExternalArtistRecord {
        ExternalArtistRecord {
            id: Some("1f9df192-a621-4f54-8850-2c5373b7eac9".to_string()),
            name: Some("Giuseppe Verdi".to_string()),
            gender: Some("Male".to_string()),
            life_span: Some(LifeSpan {
                begin: Some("1813-10-10".to_string()),
                ended: Some(Ended::Text("1901-01-27".to_string())),
            }),
            area: Some(Area {
                name: Some("Italy".to_string()),
            }),
            begin_area: Some(Area {
                name: Some("Le Roncole".to_string()),
            }),
            tag_list: Some(vec![
                Tag {
                    name: Some("opera".to_string()),
                },
                Tag {
                    name: Some("romantic".to_string()),
                },
            ]),
            alias_list: Some(vec![Alias {
                name: Some("Verdi".to_string()),
                locale: Some("it-IT".to_string()),
            }]),
        }
    }

    #[test]
    fn test_resolve_field() {
        let some = |s: &str| Some(s.to_string());

        assert_eq!(resolve_field(None, some("a"), false), some("a"));
        assert_eq!(resolve_field(some(""), some("a"), false), some("a"));
        assert_eq!(resolve_field(some("x"), some("a"), false), some("x"));
        assert_eq!(resolve_field(some("x"), some("a"), true), some("a"));
        assert_eq!(resolve_field(some("x"), None, true), some("x"));
        assert_eq!(resolve_field(None, None, true), None);
    }

    #[test]
    fn test_full_merge_into_empty_record() {
        let merged = merge(LocalArtistRecord::default(), &verdi(), false);

        assert_eq!(merged.id_author.as_deref(), Some("1f9df192-a621-4f54-8850-2c5373b7eac9"));
        assert_eq!(merged.name.as_deref(), Some("Giuseppe Verdi"));
        assert_eq!(merged.gender.as_deref(), Some("M"));
        assert_eq!(merged.birth_date.as_deref(), Some("1813-10-10"));
        assert_eq!(merged.active_start.as_deref(), Some("1813-10-10"));
        assert_eq!(merged.active_end.as_deref(), Some("1901-01-27"));
        assert_eq!(merged.country.as_deref(), Some("Italy"));
        assert_eq!(merged.birth_place.as_deref(), Some("Le Roncole"));
        assert_eq!(merged.description.as_deref(), Some("opera, romantic"));
        assert_eq!(merged.nationality.as_deref(), Some("Italia"));
    }

    #[test]
    fn test_merge_is_idempotent_without_overwrite() {
        let local = LocalArtistRecord {
            name: Some("G. Verdi".to_string()),
            country: Some("".to_string()),
            ..Default::default()
        };

        let once = merge(local, &verdi(), false);
        let mut twice = once.clone();
        let report = merge_into(&mut twice, &verdi(), false);

        assert_eq!(once, twice);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_non_empty_fields_kept_without_overwrite() {
        let local = LocalArtistRecord {
            id_author: Some("local-id".to_string()),
            name: Some("Verdi".to_string()),
            gender: Some("F".to_string()),
            birth_date: Some("1800".to_string()),
            active_start: Some("1830".to_string()),
            active_end: Some("1900".to_string()),
            country: Some("Italia".to_string()),
            birth_place: Some("Busseto".to_string()),
            description: Some("composer".to_string()),
            nationality: Some("Italiana".to_string()),
            extra: Default::default(),
        };

        let mut merged = local.clone();
        let report = merge_into(&mut merged, &verdi(), false);

        assert_eq!(merged, local);
        assert!(report.is_unchanged());
    }

    #[test]
    fn test_overwrite_replaces_non_empty_fields() {
        let local = LocalArtistRecord {
            name: Some("Verdi".to_string()),
            description: Some("composer".to_string()),
            ..Default::default()
        };

        let mut merged = local;
        let report = merge_into(&mut merged, &verdi(), true);

        assert_eq!(merged.name.as_deref(), Some("Giuseppe Verdi"));
        assert_eq!(merged.description.as_deref(), Some("opera, romantic"));
        assert_eq!(report.updated.len(), LocalArtistRecord::FIELD_NAMES.len());
    }

    #[test]
    fn test_overwrite_never_clears_with_absent_candidate() {
        let local = LocalArtistRecord {
            gender: Some("M".to_string()),
            country: Some("Italia".to_string()),
            ..Default::default()
        };

        let merged = merge(local, &external(json!({"gender": "Other"})), true);

        assert_eq!(merged.gender.as_deref(), Some("M"));
        assert_eq!(merged.country.as_deref(), Some("Italia"));
    }

    #[test]
    fn test_gender_normalization() {
        let male = merge(Default::default(), &external(json!({"gender": "Male"})), false);
        assert_eq!(male.gender.as_deref(), Some("M"));

        let female = merge(Default::default(), &external(json!({"gender": "Female"})), false);
        assert_eq!(female.gender.as_deref(), Some("F"));

        let other = merge(Default::default(), &external(json!({"gender": "Other"})), false);
        assert_eq!(other.gender, None);

        assert_eq!(normalize_gender("FEMALE"), Some("F"));
        assert_eq!(normalize_gender(""), None);
    }

    #[test]
    fn test_still_active_artist_has_no_end() {
        let merged = merge(
            Default::default(),
            &external(json!({"life-span": {"begin": "1990", "ended": "false"}})),
            false,
        );

        assert_eq!(merged.active_start.as_deref(), Some("1990"));
        assert_eq!(merged.birth_date.as_deref(), Some("1990"));
        assert_eq!(merged.active_end, None);

        let merged = merge(
            Default::default(),
            &external(json!({"life-span": {"begin": "1990", "ended": false}})),
            true,
        );
        assert_eq!(merged.active_end, None);
    }

    #[test]
    fn test_ended_artist_gets_end() {
        let merged = merge(
            Default::default(),
            &external(json!({"life-span": {"begin": "1990", "ended": "2020"}})),
            false,
        );

        assert_eq!(merged.active_end.as_deref(), Some("2020"));
    }

    #[test]
    fn test_missing_nested_keys_are_skipped() {
        let merged = merge(
            Default::default(),
            &external(json!({"area": {}, "begin-area": {"name": null}, "life-span": {}})),
            true,
        );

        assert_eq!(merged, LocalArtistRecord::default());
    }

    #[test]
    fn test_tags_become_description() {
        let merged = merge(
            Default::default(),
            &external(json!({"tag-list": [{"name": "opera"}, {"name": "romantic"}]})),
            false,
        );
        assert_eq!(merged.description.as_deref(), Some("opera, romantic"));

        let merged = merge(Default::default(), &external(json!({"tag-list": []})), false);
        assert_eq!(merged.description, None);
    }

    #[test]
    fn test_unnamed_tags_are_skipped() {
        let merged = merge(
            Default::default(),
            &external(json!({"tag-list": [{"count": "3"}, {"name": "opera"}]})),
            false,
        );
        assert_eq!(merged.description.as_deref(), Some("opera"));

        let merged = merge(
            Default::default(),
            &external(json!({"tag-list": [{"count": "3"}]})),
            true,
        );
        assert_eq!(merged.description, None);
    }

    #[test]
    fn test_italian_alias_sets_nationality() {
        let merged = merge(
            Default::default(),
            &external(json!({"alias-list": [{"locale": "it-IT"}]})),
            false,
        );
        assert_eq!(merged.nationality.as_deref(), Some("Italia"));

        let merged = merge(
            Default::default(),
            &external(json!({"alias-list": [{"locale": "en"}, {"name": "no locale"}]})),
            false,
        );
        assert_eq!(merged.nationality, None);
    }

    #[test]
    fn test_extra_fields_untouched() {
        let mut local = LocalArtistRecord::named("Verdi");
        local.extra.insert("works_count".to_string(), json!(28));

        let merged = merge(local, &verdi(), true);

        assert_eq!(merged.extra.get("works_count"), Some(&json!(28)));
    }
}
