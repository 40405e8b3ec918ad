use crate::domain::model::OwnedItemRecord;
use std::collections::HashMap;

/// Records grouped by exact (case-sensitive) owner id. Within an owner the
/// records keep the order they arrived in.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    owners: HashMap<String, Vec<OwnedItemRecord>>,
}

impl RosterIndex {
    pub fn build(records: Vec<OwnedItemRecord>) -> Self {
        let mut owners: HashMap<String, Vec<OwnedItemRecord>> = HashMap::new();
        for record in records {
            owners
                .entry(record.owner_id.clone())
                .or_default()
                .push(record);
        }
        Self { owners }
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn records_for(&self, owner_id: &str) -> &[OwnedItemRecord] {
        self.owners.get(owner_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Owners and their records, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OwnedItemRecord])> {
        self.owners
            .iter()
            .map(|(owner, records)| (owner.as_str(), records.as_slice()))
    }
}

impl FromIterator<OwnedItemRecord> for RosterIndex {
    fn from_iter<T: IntoIterator<Item = OwnedItemRecord>>(iter: T) -> Self {
        Self::build(iter.into_iter().collect())
    }
}
