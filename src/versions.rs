use std::collections::HashSet;

/// One installed JDK, keyed by its installation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub path: String,
    /// Where the entry came from, e.g. `(x64) 17.0.2` or `(env) 17`.
    pub label: String,
}

impl VersionEntry {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

/// Installed versions, unique by path. The first source to report a path
/// keeps its label; entries stay in insertion order so menu numbering is
/// stable for the whole run.
#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
    entries: Vec<VersionEntry>,
    seen: HashSet<String>,
}

impl VersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner results first, then manual registrations.
    pub fn merge(scanned: Vec<VersionEntry>, manual: Vec<VersionEntry>) -> Self {
        let mut registry = Self::new();
        for entry in scanned.into_iter().chain(manual) {
            if !registry.insert(entry.clone()) {
                tracing::debug!(path = %entry.path, label = %entry.label, "duplicate installation ignored");
            }
        }
        registry
    }

    /// Returns `false` (and keeps the existing label) if the path is already present.
    pub fn insert(&mut self, entry: VersionEntry) -> bool {
        if !self.seen.insert(path_key(&entry.path)) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(&path_key(path))
    }

    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&VersionEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Windows paths compare case-insensitively, ignoring separator style and a trailing `\`.
pub fn path_key(path: &str) -> String {
    let mut normalized = path.replace('/', "\\").trim().to_lowercase();
    while normalized.ends_with('\\') {
        normalized.pop();
    }
    normalized
}
