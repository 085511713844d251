//! Search and language-facet filtering over the projected catalog.
//!
//! Both predicates are independent and conjunctive. Filtering never re-sorts:
//! the catalog's canonical order is preserved.

use serde::Deserialize;

use crate::models::{LanguageFacet, Song};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Aliases that identify one language in free-form `language` tags.
pub struct LanguageAlias {
    /// Facet name shown in the filter bar, e.g. `English`.
    pub name: String,
    /// Substrings that match anywhere in the lower-cased tag.
    #[serde(default)]
    pub contains: Vec<String>,
    /// Short codes that must equal the lower-cased tag.
    #[serde(default)]
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Configured language facets, in filter-bar order.
pub struct LanguageAliases {
    #[serde(rename = "language", default)]
    pub languages: Vec<LanguageAlias>,
}

impl Default for LanguageAliases {
    fn default() -> Self {
        let alias = |name: &str, contains: &[&str], codes: &[&str]| LanguageAlias {
            name: name.to_string(),
            contains: contains.iter().map(|s| s.to_string()).collect(),
            codes: codes.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            languages: vec![
                alias("English", &["english"], &["en", "eng"]),
                alias("Hindi", &["hindi"], &["hi", "hin"]),
                alias("Marathi", &["marathi"], &["ma", "mar"]),
            ],
        }
    }
}

impl LanguageAliases {
    /// Find the aliases for a facet name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&LanguageAlias> {
        self.languages
            .iter()
            .find(|alias| alias.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Facet names in filter-bar order, starting with `All`.
    pub fn facets(&self) -> Vec<LanguageFacet> {
        std::iter::once(LanguageFacet::All)
            .chain(
                self.languages
                    .iter()
                    .map(|alias| LanguageFacet::Named(alias.name.clone())),
            )
            .collect()
    }
}

impl LanguageAlias {
    fn matches(&self, language: &str) -> bool {
        let lang = language.trim().to_lowercase();
        if lang.is_empty() {
            return false;
        }
        self.contains
            .iter()
            .any(|needle| lang.contains(&needle.to_lowercase()))
            || self.codes.iter().any(|code| lang == code.to_lowercase())
    }
}

impl LanguageFacet {
    /// Step to the next facet in filter-bar order, wrapping back to `All`.
    /// Facets that are no longer configured restart the cycle.
    pub fn cycle(&self, aliases: &LanguageAliases) -> LanguageFacet {
        let facets = aliases.facets();
        let position = facets.iter().position(|facet| match (facet, self) {
            (LanguageFacet::Named(a), LanguageFacet::Named(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        });
        match position {
            Some(index) => facets[(index + 1) % facets.len()].clone(),
            None => LanguageFacet::All,
        }
    }
}

/// Does `song` pass the language facet? Unknown facet names match nothing.
pub fn matches_language(song: &Song, facet: &LanguageFacet, aliases: &LanguageAliases) -> bool {
    match facet {
        LanguageFacet::All => true,
        LanguageFacet::Named(name) => aliases
            .lookup(name)
            .map(|alias| alias.matches(&song.language))
            .unwrap_or(false),
    }
}

/// Does `song` contain the query in its id, title, or display title?
pub fn matches_query(song: &Song, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&song.id, &song.title, &song.display_title]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Visible subset of `catalog`, in catalog order.
pub fn filter<'a>(
    catalog: &'a [Song],
    query: &str,
    facet: &LanguageFacet,
    aliases: &LanguageAliases,
) -> Vec<&'a Song> {
    catalog
        .iter()
        .filter(|song| matches_language(song, facet, aliases))
        .filter(|song| matches_query(song, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, title: &str, display: &str, language: &str) -> Song {
        Song {
            key: id.to_string(),
            id: id.to_string(),
            title: title.to_string(),
            display_title: display.to_string(),
            native_title: display.to_string(),
            language: language.to_string(),
            lyrics: String::new(),
        }
    }

    fn catalog() -> Vec<Song> {
        vec![
            song("1", "Amazing Grace", "Amazing Grace", "English"),
            song("2", "Yeshu Masih", "येशु मसीह", "hin"),
            song("3", "Deva Tuzi", "देवा तुझी", "Marathi (Romanized)"),
            song("4", "Holy Holy Holy", "Holy, Holy, Holy", ""),
            song("12", "Blessed Assurance", "Blessed Assurance", "en"),
        ]
    }

    fn ids(songs: &[&Song]) -> Vec<String> {
        songs.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn all_facet_and_empty_query_pass_everything() {
        let catalog = catalog();
        let visible = filter(&catalog, "  ", &LanguageFacet::All, &LanguageAliases::default());
        assert_eq!(ids(&visible), vec!["1", "2", "3", "4", "12"]);
    }

    #[test]
    fn facets_match_aliases_and_codes() {
        let catalog = catalog();
        let aliases = LanguageAliases::default();
        let english = filter(&catalog, "", &LanguageFacet::Named("English".into()), &aliases);
        assert_eq!(ids(&english), vec!["1", "12"]);
        let hindi = filter(&catalog, "", &LanguageFacet::Named("hindi".into()), &aliases);
        assert_eq!(ids(&hindi), vec!["2"]);
        let marathi = filter(&catalog, "", &LanguageFacet::Named("Marathi".into()), &aliases);
        assert_eq!(ids(&marathi), vec!["3"]);
    }

    #[test]
    fn blank_language_never_matches_a_concrete_facet() {
        let catalog = catalog();
        let aliases = LanguageAliases::default();
        for facet in aliases.facets().into_iter().skip(1) {
            assert!(filter(&catalog, "", &facet, &aliases)
                .iter()
                .all(|song| !song.language.is_empty()));
        }
    }

    #[test]
    fn unknown_facet_matches_nothing() {
        let catalog = catalog();
        let visible = filter(
            &catalog,
            "",
            &LanguageFacet::Named("Tamil".into()),
            &LanguageAliases::default(),
        );
        assert!(visible.is_empty());
    }

    #[test]
    fn query_matches_id_title_and_display_title() {
        let catalog = catalog();
        let aliases = LanguageAliases::default();
        assert_eq!(ids(&filter(&catalog, " GRACE ", &LanguageFacet::All, &aliases)), vec!["1"]);
        assert_eq!(ids(&filter(&catalog, "1", &LanguageFacet::All, &aliases)), vec!["1", "12"]);
        assert_eq!(ids(&filter(&catalog, "देवा", &LanguageFacet::All, &aliases)), vec!["3"]);
        assert_eq!(ids(&filter(&catalog, "holy,", &LanguageFacet::All, &aliases)), vec!["4"]);
    }

    #[test]
    fn predicates_commute() {
        let catalog = catalog();
        let aliases = LanguageAliases::default();
        for facet in aliases.facets() {
            for query in ["", "a", "1", "holy", "zzz"] {
                let language_first = filter(&catalog, query, &facet, &aliases);
                let query_first: Vec<&Song> = catalog
                    .iter()
                    .filter(|song| matches_query(song, query))
                    .filter(|song| matches_language(song, &facet, &aliases))
                    .collect();
                assert_eq!(language_first, query_first);
            }
        }
    }

    #[test]
    fn empty_query_result_is_an_ordered_subset() {
        let catalog = catalog();
        let aliases = LanguageAliases::default();
        for facet in aliases.facets() {
            let visible = filter(&catalog, "", &facet, &aliases);
            let mut cursor = catalog.iter();
            for song in visible {
                assert!(cursor.any(|candidate| candidate == song));
            }
        }
    }

    #[test]
    fn facet_cycle_wraps_to_all() {
        let aliases = LanguageAliases::default();
        let mut facet = LanguageFacet::All;
        let mut seen = Vec::new();
        for _ in 0..4 {
            facet = facet.cycle(&aliases);
            seen.push(facet.to_string());
        }
        assert_eq!(seen, vec!["English", "Hindi", "Marathi", "All"]);
        assert_eq!(
            LanguageFacet::Named("Klingon".into()).cycle(&aliases),
            LanguageFacet::All
        );
    }
}
