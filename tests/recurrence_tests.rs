mod common;

use cashflow_core::{
    core::services::{RecurrenceService, DEFAULT_OCCURRENCES},
    ledger::{Frequency, TransactionRecord, TransactionStatus},
};
use common::date;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn subscription() -> TransactionRecord {
    TransactionRecord::expense(Uuid::new_v4(), dec!(15.99), date(2025, 1, 31), "Music")
        .with_status(TransactionStatus::Paid)
}

#[test]
fn monthly_from_month_end_is_clamped_not_drifted() {
    let series = RecurrenceService::generate(&subscription(), Frequency::Monthly, 3).unwrap();
    let dates: Vec<_> = series.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
}

#[test]
fn default_batch_covers_a_year() {
    let series =
        RecurrenceService::generate(&subscription(), Frequency::Monthly, DEFAULT_OCCURRENCES)
            .unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series.last().unwrap().date, date(2025, 12, 31));
    assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));
}

#[test]
fn yearly_and_weekly_steps() {
    let yearly = RecurrenceService::generate(&subscription(), Frequency::Yearly, 3).unwrap();
    assert_eq!(yearly[2].date, date(2027, 1, 31));

    let weekly = RecurrenceService::generate_from_str(&subscription(), "WEEKLY", 3).unwrap();
    assert_eq!(weekly[1].date, date(2025, 2, 7));
    assert_eq!(weekly[2].date, date(2025, 2, 14));
    assert!(weekly
        .iter()
        .all(|r| r.recurrence.as_ref().unwrap().frequency == Frequency::Weekly));
}

#[test]
fn future_occurrences_are_never_settled() {
    let series = RecurrenceService::generate(&subscription(), Frequency::Monthly, 4).unwrap();
    assert!(series[0].is_settled());
    assert!(series[1..].iter().all(|r| !r.is_settled()));
    assert_eq!(series[3].amount, dec!(15.99));
    assert_eq!(series[3].description, "Music");
}
