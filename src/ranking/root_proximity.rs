use std::collections::HashSet;

use super::EmittedClasses;
use crate::models::StaticPath;

/// Layer-by-layer walk over the relevant paths: every class found at depth 0
/// of any path comes before any class found at depth 1, and so on. Ties are
/// broken by path discovery order.
pub fn rank_by_root_proximity(allowed: &HashSet<&str>, relevant: &[&StaticPath]) -> Vec<String> {
    let max_len = relevant.iter().map(|p| p.len()).max().unwrap_or(0);
    let mut emitted = EmittedClasses::default();

    for depth in 0..max_len {
        for path in relevant {
            if let Some(entry) = path.get(depth) {
                if allowed.contains(entry.class_name.as_str()) {
                    emitted.push(&entry.class_name);
                }
            }
        }
    }

    emitted.into_vec()
}
