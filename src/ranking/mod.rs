//! Entry point ranking: turns the static call chains reaching a sink into an
//! ordered, duplicate-free list of client classes to start searches from.

pub mod root_proximity;
pub mod target_distance;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ReachError;
use crate::models::StaticPath;

pub use root_proximity::rank_by_root_proximity;
pub use target_distance::rank_by_target_distance;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RankingPolicy {
    /// Classes closest to the root of any call chain first.
    RootProximity,
    /// Classes on the shortest call chains to the sink first.
    #[default]
    TargetDistance,
}

impl RankingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootProximity => "root-proximity",
            Self::TargetDistance => "target-distance",
        }
    }

    /// Rank `allowed` classes against `static_paths`.
    ///
    /// Returns an empty list when no path touches an allowed class, which the
    /// campaign reads as "unreachable from this client".
    pub fn rank(&self, allowed: &[String], static_paths: &[StaticPath]) -> Vec<String> {
        let allowed_set: HashSet<&str> = allowed.iter().map(String::as_str).collect();
        let relevant = relevant_paths(&allowed_set, static_paths);
        if relevant.is_empty() {
            return Vec::new();
        }
        match self {
            Self::RootProximity => rank_by_root_proximity(&allowed_set, &relevant),
            Self::TargetDistance => rank_by_target_distance(&allowed_set, &relevant),
        }
    }
}

impl std::fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RankingPolicy {
    type Err = ReachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root-proximity" => Ok(Self::RootProximity),
            "target-distance" => Ok(Self::TargetDistance),
            other => Err(ReachError::Config(format!("Invalid ranking policy: {}", other))),
        }
    }
}

/// Paths that traverse at least one allowed class, in discovery order.
pub fn relevant_paths<'a>(allowed: &HashSet<&str>, static_paths: &'a [StaticPath]) -> Vec<&'a StaticPath> {
    static_paths
        .iter()
        .filter(|p| p.iter().any(|e| allowed.contains(e.class_name.as_str())))
        .collect()
}

/// Insertion-ordered set of emitted classes.
#[derive(Default)]
pub(crate) struct EmittedClasses {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl EmittedClasses {
    pub(crate) fn push(&mut self, class_name: &str) {
        if self.seen.insert(class_name.to_string()) {
            self.order.push(class_name.to_string());
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.order
    }
}
