use ahash::AHashSet;

use crate::flattener::FlatRecord;

/// Ordered union of compound keys, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<String>,
    seen: AHashSet<String>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan records in order, and each record in its own key order.
    pub fn unify<'a>(records: impl IntoIterator<Item = &'a FlatRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.observe(record);
        }
        set
    }

    pub fn observe(&mut self, record: &FlatRecord) {
        for key in record.keys() {
            if !self.seen.contains(key) {
                self.seen.insert(key.to_string());
                self.columns.push(key.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.columns
    }

    pub fn into_header(self) -> Vec<String> {
        self.columns
    }
}
