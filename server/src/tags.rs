//! Comma-delimited tag handling shared by the web fragments and the JSON API.
//!
//! Items carry their tags as a single comma-separated string; filtering a
//! list's displayed items happens here, against the list's full (baseline)
//! item set.

use serde::Deserialize;

/// How a set of search tags is matched against an item's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFilter {
    /// An item matches when any search tag is among its tags (set union).
    #[default]
    Any,
    /// An item matches when every search tag is among its tags (set intersection).
    All,
}

/// Splits a comma-separated tag string into individual tags.
/// Segments are trimmed and empty segments are dropped.
pub fn parse(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins tags back into the persisted comma-separated form.
/// An empty tag set is stored as NULL rather than an empty string.
pub fn join(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}

/// Decides whether an item with the given tag string matches the search tags.
///
/// An empty search set matches everything (the unfiltered baseline); an item
/// without tags never matches a non-empty search.
pub fn matches(item_tags: Option<&str>, search: &[String], filter: TagFilter) -> bool {
    if search.is_empty() {
        return true;
    }
    let Some(item_tags) = item_tags else {
        return false;
    };
    let item_tags = parse(item_tags);
    match filter {
        TagFilter::Any => search.iter().any(|s| item_tags.iter().any(|t| t == s)),
        TagFilter::All => search.iter().all(|s| item_tags.iter().any(|t| t == s)),
    }
}

/// Collects the distinct tags used across a set of items, lowercased and sorted.
pub fn distinct_tags<'a, I>(tag_strings: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut tags: Vec<String> = tag_strings
        .into_iter()
        .flatten()
        .flat_map(parse)
        .map(|tag| tag.to_lowercase())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn can_parse_comma_separated_tags() {
        assert_eq!(parse("home,errands"), vec!["home", "errands"]);
    }

    #[test]
    fn parsing_trims_and_drops_empty_segments() {
        assert_eq!(parse(" home , errands ,,"), vec!["home", "errands"]);
        assert!(parse("  ").is_empty());
    }

    #[test]
    fn empty_tag_set_joins_to_none() {
        assert_eq!(join(&[]), None);
        assert_eq!(
            join(&search(&["home", "errands"])),
            Some("home,errands".to_string())
        );
    }

    #[test]
    fn empty_search_matches_everything() {
        assert!(matches(Some("home"), &[], TagFilter::Any));
        assert!(matches(None, &[], TagFilter::All));
    }

    #[test]
    fn untagged_item_never_matches_a_search() {
        assert!(!matches(None, &search(&["home"]), TagFilter::Any));
        assert!(!matches(None, &search(&["home"]), TagFilter::All));
    }

    #[test]
    fn any_filter_matches_on_a_single_shared_tag() {
        let item = Some("home,errands");
        assert!(matches(item, &search(&["errands", "work"]), TagFilter::Any));
        assert!(!matches(item, &search(&["work"]), TagFilter::Any));
    }

    #[test]
    fn all_filter_requires_every_search_tag() {
        let item = Some("home,errands");
        assert!(matches(item, &search(&["home", "errands"]), TagFilter::All));
        assert!(!matches(item, &search(&["home", "work"]), TagFilter::All));
    }

    #[test]
    fn matching_ignores_whitespace_around_stored_tags() {
        assert!(matches(Some(" home , errands"), &search(&["errands"]), TagFilter::Any));
    }

    #[test]
    fn distinct_tags_are_lowercased_sorted_and_deduplicated() {
        let stored = [Some("Home,errands"), None, Some("home , Work")];
        assert_eq!(distinct_tags(stored), vec!["errands", "home", "work"]);
    }
}
