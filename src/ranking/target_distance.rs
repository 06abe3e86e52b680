use std::collections::HashSet;

use super::EmittedClasses;
use crate::models::StaticPath;

/// Walk the relevant paths from the shortest to the longest (fewest distinct
/// classes on ties) and emit allowed classes root to sink.
pub fn rank_by_target_distance(allowed: &HashSet<&str>, relevant: &[&StaticPath]) -> Vec<String> {
    let mut sorted: Vec<&StaticPath> = relevant.to_vec();
    // Stable: equal keys keep discovery order.
    sorted.sort_by_key(|p| (p.len(), p.called_classes().len()));

    let mut emitted = EmittedClasses::default();
    for path in sorted {
        for entry in path {
            if allowed.contains(entry.class_name.as_str()) {
                emitted.push(&entry.class_name);
            }
        }
    }

    emitted.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_class_count_breaks_length_ties() {
        let allowed: HashSet<&str> = ["A", "B", "C"].into_iter().collect();
        let p1 = StaticPath::from_classes(["A", "B", "Sink"]);
        let p2 = StaticPath::from_classes(["C", "C", "Sink"]);
        let ranked = rank_by_target_distance(&allowed, &[&p1, &p2]);
        assert_eq!(ranked, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_equal_keys_keep_discovery_order() {
        let allowed: HashSet<&str> = ["A", "B"].into_iter().collect();
        let p1 = StaticPath::from_classes(["B", "Sink"]);
        let p2 = StaticPath::from_classes(["A", "Sink"]);
        assert_eq!(rank_by_target_distance(&allowed, &[&p1, &p2]), vec!["B", "A"]);
    }

    #[test]
    fn test_position_within_path_does_not_matter() {
        let allowed: HashSet<&str> = ["Near", "Far"].into_iter().collect();
        let long = StaticPath::from_classes(["Far", "X", "Y", "Sink"]);
        let short = StaticPath::from_classes(["X", "Near", "Sink"]);
        assert_eq!(rank_by_target_distance(&allowed, &[&long, &short]), vec!["Near", "Far"]);
    }
}
