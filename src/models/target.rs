use serde::{Deserialize, Serialize};

/// A vulnerable sink in a dependency: the class and method a generated test
/// must invoke to prove the vulnerability is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VulnerabilityTarget {
    /// Opaque identifier, usually a CVE id.
    pub id: String,
    pub sink_class: String,
    pub sink_method: String,
}

impl VulnerabilityTarget {
    pub fn new(id: impl Into<String>, sink_class: impl Into<String>, sink_method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sink_class: sink_class.into(),
            sink_method: sink_method.into(),
        }
    }

    /// Identifier usable inside generated Java class names (hyphens are not).
    pub fn junit_suffix(&self) -> String {
        format!("_{}_SiegeTest", self.id.replace('-', "_"))
    }
}

impl std::fmt::Display for VulnerabilityTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.sink_class, self.sink_method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_class_and_method() {
        let t = VulnerabilityTarget::new("CVE-2020-1234", "org.lib.Parser", "parse");
        assert_eq!(t.to_string(), "org.lib.Parser.parse");
    }

    #[test]
    fn test_junit_suffix_replaces_hyphens() {
        let t = VulnerabilityTarget::new("CVE-2020-1234", "org.lib.Parser", "parse");
        assert_eq!(t.junit_suffix(), "_CVE_2020_1234_SiegeTest");
    }
}
