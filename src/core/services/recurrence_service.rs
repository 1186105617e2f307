//! Expansion of recurring templates into dated occurrences.

use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::core::services::ServiceResult;
use crate::errors::EngineError;
use crate::ledger::{Frequency, RecurrenceLink, TransactionRecord, TransactionStatus};

/// Occurrences persisted when a recurring transaction is created.
pub const DEFAULT_OCCURRENCES: u32 = 12;

/// Suffix appended to the description of synthetic occurrences.
pub const PROJECTION_LABEL: &str = "(projected)";

pub struct RecurrenceService;

impl RecurrenceService {
    /// Expands `base` into `occurrences` records sharing a fresh recurrence id.
    ///
    /// Occurrence zero is the template itself and keeps its status; later
    /// occurrences start out pending.
    pub fn generate(
        base: &TransactionRecord,
        frequency: Frequency,
        occurrences: u32,
    ) -> ServiceResult<Vec<TransactionRecord>> {
        if base.is_recurring() {
            return Err(EngineError::invalid(
                "transaction already belongs to a recurrence",
            ));
        }
        if occurrences == 0 {
            return Err(EngineError::invalid(
                "a recurrence needs at least one occurrence",
            ));
        }
        let link = RecurrenceLink {
            recurrence_id: Uuid::new_v4(),
            frequency,
        };
        let records = expand(base, &link, occurrences);
        debug!(
            recurrence_id = %link.recurrence_id,
            %frequency,
            occurrences,
            "generated recurring occurrences"
        );
        Ok(records)
    }

    /// Same as [`RecurrenceService::generate`] with a frequency name such as `"monthly"`.
    pub fn generate_from_str(
        base: &TransactionRecord,
        frequency: &str,
        occurrences: u32,
    ) -> ServiceResult<Vec<TransactionRecord>> {
        let frequency = Frequency::from_str(frequency)?;
        Self::generate(base, frequency, occurrences)
    }

    /// Builds synthetic occurrences following `seed`, the latest known member of its group.
    ///
    /// Up to `batch` further periods are generated and only those dated in
    /// `(seed.date, horizon_end]` are kept. The results are tagged `projected`
    /// and carry deterministic ids derived from the recurrence id.
    pub fn extend_after(
        seed: &TransactionRecord,
        horizon_end: NaiveDate,
        batch: u32,
        label: &str,
    ) -> ServiceResult<Vec<TransactionRecord>> {
        let link = seed.recurrence.clone().ok_or_else(|| {
            EngineError::invalid("cannot extend a transaction without a recurrence")
        })?;
        if seed.date >= horizon_end || batch == 0 {
            return Ok(Vec::new());
        }

        let synthetic: Vec<TransactionRecord> = expand(seed, &link, batch + 1)
            .into_iter()
            .filter(|record| record.date > seed.date && record.date <= horizon_end)
            .enumerate()
            .map(|(index, mut record)| {
                let key = format!("virtual-{}-{}", link.recurrence_id, index);
                record.id = Uuid::new_v5(&link.recurrence_id, key.as_bytes());
                record.virtual_key = Some(key);
                record.set_status(TransactionStatus::Projected);
                record.description = format!("{} {}", seed.description, label);
                record
            })
            .collect();

        debug!(
            recurrence_id = %link.recurrence_id,
            last_date = %seed.date,
            %horizon_end,
            synthetic = synthetic.len(),
            "extended recurrence"
        );
        Ok(synthetic)
    }
}

/// Occurrences that would fall past the last representable date are dropped.
fn expand(
    base: &TransactionRecord,
    link: &RecurrenceLink,
    occurrences: u32,
) -> Vec<TransactionRecord> {
    (0..occurrences)
        .map_while(|index| {
            let mut record = base.clone();
            record.recurrence = Some(link.clone());
            record.virtual_key = None;
            if index > 0 {
                record.id = Uuid::new_v4();
                record.date = link.frequency.add_periods(base.date, index)?;
                record.set_status(TransactionStatus::Pending);
            }
            Some(record)
        })
        .collect()
}
