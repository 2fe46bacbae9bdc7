//! Collision handling for generated identifiers and repeated headers.
//!
//! Identifier collisions and display-name collisions are independent: two
//! different headers may sanitize to the same identifier, and two identical
//! headers always do. The first is fixed by suffixing, the second is recorded
//! as a per-header ordinal so that by-name lookups stay unambiguous.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

/// Returns `base` or the first `base_2`, `base_3`, ... absent from `taken`.
pub fn resolve_property_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let separator = if base.ends_with('_') { "" } else { "_" };
    (2usize..)
        .map(|n| format!("{base}{separator}{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Makes every identifier unique, keeping the earliest occurrence unsuffixed.
pub fn resolve_property_names<S: AsRef<str>>(bases: &[S]) -> Vec<String> {
    let (names, _) = bases.iter().fold(
        (Vec::with_capacity(bases.len()), HashSet::new()),
        |(mut names, mut taken), base| {
            let name = resolve_property_name(base.as_ref(), &taken);
            taken.insert(name.clone());
            names.push(name);
            (names, taken)
        },
    );
    names
}

/// Ordinal of each header among the headers sharing its exact text.
///
/// Headers that occur only once get `None`.
pub fn name_indices<S: AsRef<str>>(display_names: &[S]) -> Vec<Option<usize>> {
    let totals: HashMap<&str, usize> = display_names.iter().map(|name| name.as_ref()).counts();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    display_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if totals.get(name).copied().unwrap_or(0) < 2 {
                return None;
            }
            let ordinal = seen.entry(name).or_insert(0);
            let current = *ordinal;
            *ordinal += 1;
            Some(current)
        })
        .collect()
}
