use serde::{Deserialize, Serialize};

/// One call in a statically computed call chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEntry {
    pub class_name: String,
    #[serde(default)]
    pub method_name: Option<String>,
}

impl CallEntry {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: None,
        }
    }
}

/// A statically possible call chain, ordered from the root caller to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticPath {
    entries: Vec<CallEntry>,
}

impl StaticPath {
    pub fn new(entries: Vec<CallEntry>) -> Self {
        Self { entries }
    }

    /// Build a path from bare class names.
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(classes.into_iter().map(CallEntry::new).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CallEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallEntry> {
        self.entries.iter()
    }

    /// Distinct class names traversed by this path, in first-seen order.
    pub fn called_classes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .map(|e| e.class_name.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl<'a> IntoIterator for &'a StaticPath {
    type Item = &'a CallEntry;
    type IntoIter = std::slice::Iter<'a, CallEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_called_classes_are_distinct_and_ordered() {
        let path = StaticPath::from_classes(["A", "B", "A", "C"]);
        assert_eq!(path.len(), 4);
        assert_eq!(path.called_classes(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_deserialize_from_entry_list() {
        let json = r#"[{"class_name":"Main","method_name":"run"},{"class_name":"Sink"}]"#;
        let path: StaticPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.get(0).unwrap().method_name.as_deref(), Some("run"));
        assert!(path.get(1).unwrap().method_name.is_none());
    }
}
