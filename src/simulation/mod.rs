//! Day-by-day cash-flow simulation.
//!
//! A forward run starts from the settled balance and walks `horizon` days
//! ahead, folding in open transactions and synthetic occurrences of recurring
//! series that run out before the horizon. A backward run starts from the
//! current balance and undoes each day's settled movement to rebuild recent
//! end-of-day balances.
//!
//! Both runs are pure: inputs are only read, synthetic records live inside the
//! returned report, and `today` is always supplied by the caller.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::core::services::{
    BalanceService, RecurrenceService, DEFAULT_OCCURRENCES, PROJECTION_LABEL,
};
use crate::errors::{DataWarning, EngineError};
use crate::ledger::{recurrence_groups, Account, TransactionKind, TransactionRecord};

/// Default number of days a forward projection covers.
pub const DEFAULT_HORIZON_DAYS: u32 = 90;
/// Default number of days a backward reconstruction covers.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// One day of a simulated timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    /// End-of-day balance.
    pub balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub transactions: Vec<TransactionRecord>,
    /// Whether any synthetic occurrence contributed to this day.
    pub has_virtual: bool,
}

impl DailyBalance {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Contiguous days in chronological order.
    pub entries: Vec<DailyBalance>,
    #[serde(skip)]
    pub warnings: Vec<DataWarning>,
    /// Number of synthetic occurrences created for this run.
    pub synthetic_count: usize,
}

impl SimulationReport {
    pub fn entry_for(&self, date: NaiveDate) -> Option<&DailyBalance> {
        self.entries
            .binary_search_by_key(&date, |entry| entry.date)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Day with the smallest balance; the earliest one wins ties.
    pub fn lowest_point(&self) -> Option<&DailyBalance> {
        self.entries.iter().reduce(|lowest, entry| {
            if entry.balance < lowest.balance {
                entry
            } else {
                lowest
            }
        })
    }

    pub fn first_negative_day(&self) -> Option<&DailyBalance> {
        self.entries
            .iter()
            .find(|entry| entry.balance < Decimal::ZERO)
    }

    pub fn virtual_days(&self) -> impl Iterator<Item = &DailyBalance> {
        self.entries.iter().filter(|entry| entry.has_virtual)
    }

    pub fn closing_balance(&self) -> Option<Decimal> {
        self.entries.last().map(|entry| entry.balance)
    }
}

#[derive(Debug, Clone)]
pub struct CashFlowSimulator {
    recurrence_batch: u32,
    projection_label: String,
}

impl Default for CashFlowSimulator {
    fn default() -> Self {
        Self {
            recurrence_batch: DEFAULT_OCCURRENCES,
            projection_label: PROJECTION_LABEL.into(),
        }
    }
}

impl CashFlowSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            recurrence_batch: config.recurrence_batch,
            projection_label: config.projection_label.clone(),
        }
    }

    /// Projects balances for `today` through `today + horizon_days`.
    ///
    /// `starting_balance` must already include every settled transaction, so
    /// only open records and synthetic occurrences move the balance. Day zero
    /// also absorbs everything still open from earlier dates.
    pub fn project(
        &self,
        starting_balance: Decimal,
        records: &[TransactionRecord],
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<SimulationReport, EngineError> {
        let horizon_end = today
            .checked_add_days(Days::new(horizon_days as u64))
            .ok_or_else(|| {
                EngineError::invalid(format!(
                    "horizon of {} days exceeds the calendar range",
                    horizon_days
                ))
            })?;

        let synthetic = self.extend_recurrences(records, horizon_end)?;
        let synthetic_count = synthetic.len();

        let mut by_date: BTreeMap<NaiveDate, Vec<&TransactionRecord>> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|record| !record.is_settled())
            .chain(synthetic.iter())
        {
            if record.date <= horizon_end {
                by_date.entry(record.date).or_default().push(record);
            }
        }

        let warnings = collect_warnings(by_date.values().flatten().copied());

        let mut entries = Vec::with_capacity(horizon_days as usize + 1);
        let mut running = starting_balance;
        let mut date = today;
        for day in 0..=horizon_days {
            if day > 0 {
                date = date.succ_opt().unwrap_or(horizon_end);
            }
            let matched: Vec<&TransactionRecord> = if day == 0 {
                by_date
                    .range(..=today)
                    .flat_map(|(_, bucket)| bucket.iter().copied())
                    .collect()
            } else {
                by_date.get(&date).cloned().unwrap_or_default()
            };
            let entry = tally(date, &matched, &mut running, true);
            entries.push(entry);
        }

        debug!(
            %today,
            %horizon_end,
            entries = entries.len(),
            synthetic = synthetic_count,
            warnings = warnings.len(),
            "projected cash flow"
        );
        Ok(SimulationReport {
            entries,
            warnings,
            synthetic_count,
        })
    }

    /// Rebuilds end-of-day balances for the `lookback_days` days ending today.
    ///
    /// Assumes `current_balance` is accurate as of the end of `today` and that
    /// no future-dated record is already settled. Entries are oldest first.
    /// Fails with `InvalidInput` when the lookback reaches before the calendar start.
    pub fn history(
        &self,
        current_balance: Decimal,
        records: &[TransactionRecord],
        today: NaiveDate,
        lookback_days: u32,
    ) -> Result<SimulationReport, EngineError> {
        let oldest = today
            .checked_sub_days(Days::new(u64::from(lookback_days.saturating_sub(1))))
            .ok_or_else(|| {
                EngineError::invalid(format!(
                    "lookback of {} days exceeds the calendar range",
                    lookback_days
                ))
            })?;

        let mut by_date: BTreeMap<NaiveDate, Vec<&TransactionRecord>> = BTreeMap::new();
        for record in records.iter().filter(|record| record.is_settled()) {
            by_date.entry(record.date).or_default().push(record);
        }
        let warnings = collect_warnings(by_date.values().flatten().copied());

        let mut entries = Vec::with_capacity(lookback_days as usize);
        let mut running = current_balance;
        let mut date = today;
        for day in 0..lookback_days {
            if day > 0 {
                date = date.pred_opt().unwrap_or(oldest);
            }
            let matched = by_date.get(&date).cloned().unwrap_or_default();
            let entry = tally(date, &matched, &mut running, false);
            // Step back to the previous day's closing balance.
            running -= entry.net();
            entries.push(entry);
        }
        entries.reverse();

        debug!(
            %today,
            entries = entries.len(),
            warnings = warnings.len(),
            "reconstructed balance history"
        );
        Ok(SimulationReport {
            entries,
            warnings,
            synthetic_count: 0,
        })
    }

    /// Forward projection for a single account, starting from its settled balance.
    pub fn project_account(
        &self,
        account: &Account,
        records: &[TransactionRecord],
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<SimulationReport, EngineError> {
        let own = account_records(account, records);
        let starting = BalanceService::current_balance(account, &own);
        self.project(starting, &own, today, horizon_days)
    }

    /// Backward reconstruction for a single account, starting from its settled balance.
    pub fn history_account(
        &self,
        account: &Account,
        records: &[TransactionRecord],
        today: NaiveDate,
        lookback_days: u32,
    ) -> Result<SimulationReport, EngineError> {
        let own = account_records(account, records);
        let current = BalanceService::current_balance(account, &own);
        self.history(current, &own, today, lookback_days)
    }

    /// Synthetic occurrences for every recurrence whose latest known date precedes the horizon.
    fn extend_recurrences(
        &self,
        records: &[TransactionRecord],
        horizon_end: NaiveDate,
    ) -> Result<Vec<TransactionRecord>, EngineError> {
        let mut synthetic = Vec::new();
        for (recurrence_id, members) in recurrence_groups(records) {
            // Synthetic records handed back in are not persisted occurrences.
            let Some(seed) = members.iter().rev().find(|record| !record.is_projected()) else {
                continue;
            };
            if seed.date >= horizon_end {
                continue;
            }
            let extension = RecurrenceService::extend_after(
                seed,
                horizon_end,
                self.recurrence_batch,
                &self.projection_label,
            )?;
            debug!(%recurrence_id, added = extension.len(), "recurrence extended for simulation");
            synthetic.extend(extension);
        }
        Ok(synthetic)
    }
}

fn account_records(account: &Account, records: &[TransactionRecord]) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|record| record.account_id == account.id)
        .cloned()
        .collect()
}

/// Sums one day's movement, applies it to `running` when `apply` is set, and builds the entry.
fn tally(
    date: NaiveDate,
    matched: &[&TransactionRecord],
    running: &mut Decimal,
    apply: bool,
) -> DailyBalance {
    let mut entry = DailyBalance {
        date,
        balance: *running,
        income: Decimal::ZERO,
        expense: Decimal::ZERO,
        transactions: matched.iter().map(|record| (*record).clone()).collect(),
        has_virtual: matched.iter().any(|record| record.is_projected()),
    };
    for record in matched {
        match record.kind {
            TransactionKind::Income => entry.income += record.amount,
            TransactionKind::Expense => entry.expense += record.amount,
        }
    }
    if apply {
        *running += entry.net();
        entry.balance = *running;
    }
    entry
}

fn collect_warnings<'a, I>(records: I) -> Vec<DataWarning>
where
    I: Iterator<Item = &'a TransactionRecord>,
{
    let warnings: Vec<DataWarning> = records
        .filter(|record| record.amount <= Decimal::ZERO)
        .map(|record| DataWarning::NonPositiveAmount { id: record.id })
        .collect();
    for warning in &warnings {
        warn!(%warning, "simulation input data-integrity warning");
    }
    warnings
}
