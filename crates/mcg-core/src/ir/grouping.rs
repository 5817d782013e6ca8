use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

static PATH_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}/]*\}").unwrap());

/// Suffix of groups holding operations on the collection itself.
pub const COLLECTION_SUFFIX: &str = " Collection";
/// Suffix of groups holding operations below an entity.
pub const ACTIONS_SUFFIX: &str = " Actions";

/// Resource name used when a path has no first segment and no tag.
pub const DEFAULT_RESOURCE: &str = "Default";

/// Resource and group an operation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub resource: String,
    pub group: String,
}

/// Place an operation by its tags and path shape.
///
/// - `/widgets` → resource `Widgets`, group `Widgets Collection`
/// - `/widgets/{id}` → group `Widgets`
/// - `/widgets/{id}/activate` → group `Widgets Actions`
pub fn place_operation(path: &str, tags: &[String]) -> Placement {
    let segment = first_segment(path);

    let resource = match tags.first() {
        Some(tag) => tag.clone(),
        None if segment.is_empty() => DEFAULT_RESOURCE.to_string(),
        None => capitalize(segment),
    };

    Placement {
        resource,
        group: group_name(path, segment),
    }
}

/// The first path segment after leading slashes, e.g. `/pets/{id}` → `pets`.
pub fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or("")
}

/// The path with slashes removed and each `{param}` collapsed to `_`.
pub fn compress_path(path: &str) -> String {
    PATH_PARAM.replace_all(&path.replace('/', ""), "_").into_owned()
}

fn group_name(path: &str, segment: &str) -> String {
    if segment.is_empty() {
        return DEFAULT_RESOURCE.to_string();
    }

    let compressed = compress_path(path);
    let mut name = segment.to_string();

    if compressed != format!("{segment}_") {
        if compressed == segment {
            name.push_str(COLLECTION_SUFFIX);
        } else if compressed.len() > segment.len() {
            name.push_str(ACTIONS_SUFFIX);
        }
    }

    capitalize(&name)
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn group_rank(name: &str) -> u8 {
    if name.ends_with(COLLECTION_SUFFIX) {
        1
    } else if name.ends_with(ACTIONS_SUFFIX) {
        3
    } else {
        2
    }
}

/// Reorder groups: collections, then entities, then actions. The sort is
/// stable, so groups of equal rank keep their encounter order.
pub fn sort_groups<V>(groups: &mut IndexMap<String, V>) {
    groups.sort_by(|a, _, b, _| group_rank(a).cmp(&group_rank(b)));
}

/// Stable case-insensitive ordering by key.
pub fn sort_case_insensitive<V>(map: &mut IndexMap<String, V>) {
    map.sort_by(|a, _, b, _| a.to_lowercase().cmp(&b.to_lowercase()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(path: &str) -> Placement {
        place_operation(path, &[])
    }

    #[test]
    fn test_collection_group() {
        let p = place("/widgets");
        assert_eq!(p.resource, "Widgets");
        assert_eq!(p.group, "Widgets Collection");
    }

    #[test]
    fn test_entity_group() {
        let p = place("/widgets/{id}");
        assert_eq!(p.resource, "Widgets");
        assert_eq!(p.group, "Widgets");
    }

    #[test]
    fn test_actions_group() {
        assert_eq!(place("/widgets/{id}/activate").group, "Widgets Actions");
        assert_eq!(place("/widgets/search").group, "Widgets Actions");
    }

    #[test]
    fn test_tag_names_resource() {
        let p = place_operation("/widgets/{id}", &["Inventory".to_string()]);
        assert_eq!(p.resource, "Inventory");
        assert_eq!(p.group, "Widgets");
    }

    #[test]
    fn test_root_path() {
        let p = place("/");
        assert_eq!(p.resource, DEFAULT_RESOURCE);
        assert_eq!(p.group, DEFAULT_RESOURCE);
    }

    #[test]
    fn test_compress_path() {
        assert_eq!(compress_path("/widgets/{id}/activate"), "widgets_activate");
        assert_eq!(compress_path("/a/{b}/{c}"), "a__");
    }

    #[test]
    fn test_sort_groups() {
        let mut groups: IndexMap<String, ()> = IndexMap::new();
        for name in ["Pets Actions", "Pets", "Owners Actions", "Pets Collection"] {
            groups.insert(name.to_string(), ());
        }
        sort_groups(&mut groups);
        let keys: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Pets Collection", "Pets", "Pets Actions", "Owners Actions"]);
    }

    #[test]
    fn test_sort_case_insensitive() {
        let mut map: IndexMap<String, ()> = IndexMap::new();
        for name in ["beta", "Alpha", "gamma", "Beta2"] {
            map.insert(name.to_string(), ());
        }
        sort_case_insensitive(&mut map);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Alpha", "beta", "Beta2", "gamma"]);
    }
}
