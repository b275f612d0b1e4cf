use chrono::{DateTime, Datelike};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookEntry {
    pub name: String,
    /// Seconds since the Unix epoch.
    pub last_modified: i64,
}

impl NotebookEntry {
    pub fn new(name: impl Into<String>, last_modified: i64) -> Self {
        Self {
            name: name.into(),
            last_modified,
        }
    }

    /// Calendar year (UTC) the notebook was last modified in.
    pub fn year(&self) -> i32 {
        DateTime::from_timestamp(self.last_modified, 0)
            .map(|dt| dt.year())
            .unwrap_or(1970)
    }
}

fn newest_first(a: &NotebookEntry, b: &NotebookEntry) -> Ordering {
    b.last_modified
        .cmp(&a.last_modified)
        .then_with(|| a.name.cmp(&b.name))
}

/// Snapshot of the notebooks directory, built once per request.
#[derive(Debug, Clone, Default)]
pub struct NotebookIndex {
    entries: HashMap<String, NotebookEntry>,
}

impl NotebookIndex {
    pub fn insert(&mut self, entry: NotebookEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&NotebookEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `limit` most recently modified notebooks, newest first.
    pub fn recent(&self, limit: usize) -> Vec<NotebookEntry> {
        let mut entries: Vec<NotebookEntry> = self.entries.values().cloned().collect();
        entries.sort_by(newest_first);
        entries.truncate(limit);
        entries
    }

    /// Notebooks grouped by year, each group newest first.
    pub fn by_year(&self) -> BTreeMap<i32, Vec<NotebookEntry>> {
        let mut years: BTreeMap<i32, Vec<NotebookEntry>> = BTreeMap::new();
        for entry in self.entries.values() {
            years.entry(entry.year()).or_default().push(entry.clone());
        }
        for entries in years.values_mut() {
            entries.sort_by(newest_first);
        }
        years
    }
}

impl FromIterator<NotebookEntry> for NotebookIndex {
    fn from_iter<I: IntoIterator<Item = NotebookEntry>>(iter: I) -> Self {
        let mut index = Self::default();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}
