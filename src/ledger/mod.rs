//! Transaction and account models, date arithmetic, and batch decoding.

pub mod account;
pub mod ingest;
pub mod time_interval;
pub mod transaction;

use std::collections::BTreeMap;

use uuid::Uuid;

pub use account::Account;
pub use ingest::{decode_batch, decode_batch_str, DecodedBatch};
pub use time_interval::{add_months, add_years, Frequency};
pub use transaction::{
    InstallmentLink, RecurrenceLink, TransactionKind, TransactionRecord, TransactionStatus,
    TransferLink,
};

/// Identifies the shared group a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Recurrence(Uuid),
    Installment(Uuid),
    Transfer(Uuid),
}

impl GroupKey {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            GroupKey::Recurrence(id) => record
                .recurrence
                .as_ref()
                .is_some_and(|link| link.recurrence_id == *id),
            GroupKey::Installment(id) => record
                .installment
                .as_ref()
                .is_some_and(|link| link.group_id == *id),
            GroupKey::Transfer(id) => record
                .transfer
                .as_ref()
                .is_some_and(|link| link.transfer_id == *id),
        }
    }
}

/// Ids of every record sharing `key`, in date order. Used for cascading deletes.
pub fn group_members(records: &[TransactionRecord], key: GroupKey) -> Vec<Uuid> {
    let mut members: Vec<&TransactionRecord> =
        records.iter().filter(|record| key.matches(record)).collect();
    members.sort_by_key(|record| record.date);
    members.into_iter().map(|record| record.id).collect()
}

/// Groups recurring records by recurrence id, each group sorted by date.
pub fn recurrence_groups(
    records: &[TransactionRecord],
) -> BTreeMap<Uuid, Vec<&TransactionRecord>> {
    let mut groups: BTreeMap<Uuid, Vec<&TransactionRecord>> = BTreeMap::new();
    for record in records {
        if let Some(link) = &record.recurrence {
            groups.entry(link.recurrence_id).or_default().push(record);
        }
    }
    for members in groups.values_mut() {
        members.sort_by_key(|record| record.date);
    }
    groups
}
