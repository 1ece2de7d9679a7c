//! Ingestion history
//!
//! In-memory, most-recent-first log of past uploads. Entries are never modified
//! after they are appended; the store lives as long as the processor does.

use crate::error::ComputeError;
use crate::types::{HistoricalEntry, Record};
use uuid::Uuid;

/// Store of past ingestions
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    /// Newest first
    entries: Vec<HistoricalEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry in front of all existing ones
    pub fn append(&mut self, entry: HistoricalEntry) {
        self.entries.insert(0, entry);
    }

    /// All entries, newest first
    pub fn list(&self) -> &[HistoricalEntry] {
        &self.entries
    }

    pub fn get(&self, id: Uuid) -> Option<&HistoricalEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenate the records of the given entries, in the order of `ids`
    pub fn merge(&self, ids: &[Uuid]) -> Result<Vec<Record>, ComputeError> {
        let entries = ids
            .iter()
            .map(|id| {
                self.get(*id)
                    .ok_or_else(|| ComputeError::UnknownEntry(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::merge_entries(&entries))
    }

    /// Concatenate records, tagging each with the file it came from
    pub fn merge_entries(entries: &[&HistoricalEntry]) -> Vec<Record> {
        entries
            .iter()
            .flat_map(|entry| {
                entry
                    .records
                    .iter()
                    .map(move |record| record.clone().with_source(entry.filename.as_str()))
            })
            .collect()
    }
}
