//! # Collection
//!
//! In-memory backing store for a paged collection.
//!
//! Records are kept ordered by identifier, so page boundaries are stable for
//! as long as the collection does not change. This is what the reference
//! server serves and what the in-process fetcher reads.

use crate::envelope::PageEnvelope;
use crate::error::FolioError;
use crate::primitives::MAX_COLLECTION_RECORDS;
use crate::request::{PageRequest, total_pages_for};
use crate::types::{Record, RecordId};
use std::collections::BTreeMap;

/// An ordered set of records with unique identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    records: BTreeMap<RecordId, Record>,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting duplicate identifiers.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, FolioError> {
        let mut collection = Self::new();
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    /// Load a collection from a JSON array of records.
    ///
    /// # Errors
    ///
    /// `Data` if the JSON is invalid or too large, `DuplicateRecord` if two
    /// records share an id.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FolioError> {
        let records: Vec<Record> = serde_json::from_slice(bytes)
            .map_err(|e| FolioError::Data(format!("Invalid record file: {}", e)))?;
        if records.len() > MAX_COLLECTION_RECORDS {
            return Err(FolioError::Data(format!(
                "Record count {} exceeds maximum allowed {}",
                records.len(),
                MAX_COLLECTION_RECORDS
            )));
        }
        Self::from_records(records)
    }

    /// Synthetic user directory with `count` records, ids `1..=count`.
    #[must_use]
    pub fn demo(count: u64) -> Self {
        let records = (1..=count)
            .map(|i| {
                let role = if i % 5 == 0 { "admin" } else { "member" };
                Record::new(i, format!("user{i:04}"), format!("user{i:04}@example.com"))
                    .with_attribute("role", serde_json::json!(role))
                    .with_attribute("active", serde_json::json!(i % 3 != 0))
            })
            .map(|record| (record.id, record))
            .collect();
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Add a new record.
    ///
    /// # Errors
    ///
    /// `DuplicateRecord` if the id is already present.
    pub fn insert(&mut self, record: Record) -> Result<(), FolioError> {
        if self.records.contains_key(&record.id) {
            return Err(FolioError::DuplicateRecord(record.id));
        }
        self.records.insert(record.id, record);
        Ok(())
    }

    /// Add or replace a record, returning the previous one.
    pub fn upsert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.id, record)
    }

    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        self.records.remove(&id)
    }

    /// Slice out one page.
    ///
    /// An index past the last page yields empty content with the real
    /// totals, not an error.
    #[must_use]
    pub fn page(&self, request: &PageRequest) -> PageEnvelope {
        let total = self.records.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = self
            .records
            .values()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        PageEnvelope {
            content,
            total_pages: total_pages_for(total, request.size),
            page_size: Some(request.size),
            total_elements: Some(total),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn req(index: u64, size: u32) -> PageRequest {
        PageRequest::new(index, size).expect("valid request")
    }

    #[test]
    fn empty_collection_first_page() {
        let page = Collection::new().page(&req(0, 20));

        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_elements, Some(0));
    }

    #[test]
    fn pages_slice_in_id_order() {
        let collection = Collection::demo(45);

        let first = collection.page(&req(0, 20));
        let last = collection.page(&req(2, 20));

        assert_eq!(first.len(), 20);
        assert_eq!(first.content[0].id, RecordId(1));
        assert_eq!(last.len(), 5);
        assert_eq!(last.content[0].id, RecordId(41));
        assert_eq!(first.total_pages, 3);
    }

    #[test]
    fn index_past_end_is_empty() {
        let page = Collection::demo(5).page(&req(10, 20));
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut collection = Collection::new();
        collection
            .insert(Record::new(1, "ada", "ada@example.com"))
            .expect("first insert");

        let result = collection.insert(Record::new(1, "eve", "eve@example.com"));
        assert!(matches!(result, Err(FolioError::DuplicateRecord(RecordId(1)))));
    }

    #[test]
    fn upsert_replaces() {
        let mut collection = Collection::demo(2);
        let previous = collection.upsert(Record::new(1, "ada", "ada@example.com"));

        assert_eq!(previous.map(|r| r.username), Some("user0001".to_string()));
        assert_eq!(collection.get(RecordId(1)).map(|r| r.username.as_str()), Some("ada"));
        assert!(collection.remove(RecordId(2)).is_some());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn from_json_loads_records() {
        let json = br#"[
            {"id": 2, "username": "bob", "email": "bob@example.com"},
            {"id": 1, "username": "ada", "email": "ada@example.com", "team": "core"}
        ]"#;
        let collection = Collection::from_json(json).expect("load");

        let ids: Vec<RecordId> = collection.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId(1), RecordId(2)]);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            Collection::from_json(b"{not json"),
            Err(FolioError::Data(_))
        ));
    }

    #[test]
    fn demo_attributes() {
        let collection = Collection::demo(5);
        let fifth = collection.get(RecordId(5)).expect("present");
        assert_eq!(fifth.attribute_text("role").as_deref(), Some("admin"));
    }
}
