mod common;

use cashflow_core::{
    core::{
        services::{BalanceService, RecurrenceService},
        time::{Clock, FixedClock},
    },
    ledger::{Frequency, TransactionRecord},
    CashFlowSimulator,
};
use chrono::{Duration, NaiveDate};
use common::{checking, date, paid_expense, paid_income, pending_expense};
use rust_decimal_macros::dec;

#[test]
fn forward_projection_has_horizon_plus_one_contiguous_days() {
    let today = date(2025, 3, 1);
    let report = CashFlowSimulator::new()
        .project(dec!(0), &[], today, 90)
        .unwrap();
    assert_eq!(report.entries.len(), 91);
    assert_eq!(report.entries[0].date, today);
    assert_eq!(report.entries[90].date, today + Duration::days(90));
    assert!(report
        .entries
        .windows(2)
        .all(|pair| pair[1].date == pair[0].date + Duration::days(1)));
}

#[test]
fn backward_history_has_lookback_days_oldest_first() {
    let today = date(2025, 3, 1);
    let report = CashFlowSimulator::new()
        .history(dec!(0), &[], today, 30)
        .unwrap();
    assert_eq!(report.entries.len(), 30);
    assert_eq!(report.entries[0].date, date(2025, 1, 31));
    assert_eq!(report.entries[29].date, today);
    assert!(report.entries.windows(2).all(|pair| pair[0].date < pair[1].date));
}

#[test]
fn forward_balances_are_continuous() {
    let account = checking(dec!(1000));
    let today = date(2025, 6, 1);
    let salary = TransactionRecord::income(account.id, dec!(2500), date(2025, 6, 5), "Salary");
    let mut records = RecurrenceService::generate(&salary, Frequency::Monthly, 2).unwrap();
    records.push(pending_expense(account.id, dec!(120.40), date(2025, 6, 12)));
    records.push(pending_expense(account.id, dec!(75), date(2025, 7, 1)));
    records.push(paid_expense(account.id, dec!(10), date(2025, 6, 2)));

    let report = CashFlowSimulator::new()
        .project_account(&account, &records, today, 90)
        .unwrap();
    for pair in report.entries.windows(2) {
        assert_eq!(
            pair[1].balance,
            pair[0].balance + pair[1].income - pair[1].expense,
            "continuity broken on {}",
            pair[1].date
        );
    }
    assert_eq!(report.entries[0].balance, dec!(990));
}

#[test]
fn settled_records_are_not_counted_twice() {
    let account = checking(dec!(200));
    let today = date(2025, 6, 1);
    let records = vec![
        paid_income(account.id, dec!(300), date(2025, 6, 3)),
        pending_expense(account.id, dec!(40), date(2025, 6, 3)),
    ];
    let starting = BalanceService::current_balance(&account, &records);
    assert_eq!(starting, dec!(500));

    let report = CashFlowSimulator::new()
        .project(starting, &records, today, 5)
        .unwrap();
    let day = report.entry_for(date(2025, 6, 3)).unwrap();
    assert_eq!(day.income, dec!(0));
    assert_eq!(day.expense, dec!(40));
    assert_eq!(report.closing_balance(), Some(dec!(460)));
}

#[test]
fn monthly_recurrence_is_extended_with_virtual_occurrences() {
    let account = checking(dec!(0));
    let today = FixedClock::on(date(2025, 1, 10)).today();
    let rent = TransactionRecord::expense(account.id, dec!(900), date(2025, 1, 15), "Rent");
    let persisted = RecurrenceService::generate(&rent, Frequency::Monthly, 2).unwrap();

    let report = CashFlowSimulator::new()
        .project(dec!(5000), &persisted, today, 120)
        .unwrap();

    let virtual_dates: Vec<_> = report.virtual_days().map(|entry| entry.date).collect();
    assert_eq!(virtual_dates, vec![date(2025, 3, 15), date(2025, 4, 15)]);
    assert_eq!(report.synthetic_count, 2);

    let persisted_dates: Vec<_> = persisted.iter().map(|r| r.date).collect();
    assert!(virtual_dates.iter().all(|d| !persisted_dates.contains(d)));

    for entry in report.virtual_days() {
        assert_eq!(entry.expense, dec!(900));
        assert!(entry.transactions.iter().all(|r| r.is_projected()));
        assert!(entry.transactions[0]
            .virtual_key
            .as_deref()
            .unwrap()
            .starts_with("virtual-"));
    }
    assert_eq!(report.closing_balance(), Some(dec!(1400)));
    assert!(persisted.iter().all(|r| !r.is_projected()));
}

#[test]
fn stale_recurrence_is_extended_and_catch_up_folds_into_today() {
    let account = checking(dec!(0));
    let today = date(2025, 1, 10);
    let gym = paid_expense(account.id, dec!(30), date(2024, 11, 20));
    let persisted = RecurrenceService::generate(&gym, Frequency::Monthly, 1).unwrap();

    let report = CashFlowSimulator::new()
        .project(dec!(100), &persisted, today, 20)
        .unwrap();

    // Dec-20 is before today, so it lands on day zero; Jan-20 lands on its own day.
    assert_eq!(report.entries[0].expense, dec!(30));
    assert!(report.entries[0].has_virtual);
    let jan = report.entry_for(date(2025, 1, 20)).unwrap();
    assert_eq!(jan.expense, dec!(30));
    assert_eq!(report.closing_balance(), Some(dec!(40)));
}

#[test]
fn independent_recurrence_groups_do_not_interfere() {
    let account = checking(dec!(0));
    let today = date(2025, 1, 1);
    let weekly = TransactionRecord::income(account.id, dec!(100), date(2025, 1, 3), "Tips");
    let yearly = TransactionRecord::expense(account.id, dec!(60), date(2024, 2, 1), "Domain");
    let mut records = RecurrenceService::generate(&weekly, Frequency::Weekly, 1).unwrap();
    records.extend(RecurrenceService::generate(&yearly, Frequency::Yearly, 1).unwrap());

    let report = CashFlowSimulator::new()
        .project(dec!(0), &records, today, 35)
        .unwrap();
    let incomes: Vec<_> = report
        .entries
        .iter()
        .filter(|entry| entry.income > dec!(0))
        .map(|entry| entry.date)
        .collect();
    assert_eq!(
        incomes,
        vec![
            date(2025, 1, 3),
            date(2025, 1, 10),
            date(2025, 1, 17),
            date(2025, 1, 24),
            date(2025, 1, 31)
        ]
    );
    let domain = report.entry_for(date(2025, 2, 1)).unwrap();
    assert_eq!(domain.expense, dec!(60));
    assert!(domain.has_virtual);
}

#[test]
fn history_undoes_settled_movement_day_by_day() {
    let account = checking(dec!(0));
    let today = date(2025, 3, 10);
    let records = vec![
        paid_income(account.id, dec!(200), today),
        paid_expense(account.id, dec!(50), date(2025, 3, 9)),
        pending_expense(account.id, dec!(999), date(2025, 3, 8)),
    ];

    let report = CashFlowSimulator::new()
        .history(dec!(500), &records, today, 3)
        .unwrap();
    let balances: Vec<_> = report.entries.iter().map(|e| (e.date, e.balance)).collect();
    assert_eq!(
        balances,
        vec![
            (date(2025, 3, 8), dec!(350)),
            (date(2025, 3, 9), dec!(300)),
            (date(2025, 3, 10), dec!(500)),
        ]
    );
    assert_eq!(report.entries[0].expense, dec!(0));
    assert!(report.entries.iter().all(|e| !e.has_virtual));
}

#[test]
fn history_for_account_starts_from_settled_balance() {
    let account = checking(dec!(1000));
    let other = checking(dec!(0));
    let today = date(2025, 3, 10);
    let records = vec![
        paid_expense(account.id, dec!(100), today),
        paid_income(other.id, dec!(5000), today),
    ];
    let report = CashFlowSimulator::new()
        .history_account(&account, &records, today, 2)
        .unwrap();
    assert_eq!(report.entries[1].balance, dec!(900));
    assert_eq!(report.entries[0].balance, dec!(1000));
}

#[test]
fn weekly_recurrence_near_the_calendar_end_stops_extending() {
    let account = checking(dec!(0));
    let today = NaiveDate::MAX - Duration::days(10);
    let tips = TransactionRecord::income(account.id, dec!(25), today - Duration::days(1), "Tips");
    let persisted = RecurrenceService::generate(&tips, Frequency::Weekly, 1).unwrap();

    let report = CashFlowSimulator::new()
        .project(dec!(0), &persisted, today, 5)
        .unwrap();
    assert_eq!(report.entries.len(), 6);
    assert_eq!(report.synthetic_count, 0);
    assert_eq!(report.closing_balance(), Some(dec!(25)));

    let report = CashFlowSimulator::new()
        .project(dec!(0), &persisted, today, 10)
        .unwrap();
    assert_eq!(report.synthetic_count, 1);
    assert_eq!(report.virtual_days().next().unwrap().date, today + Duration::days(6));
}
