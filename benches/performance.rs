use cashflow_core::{
    core::services::RecurrenceService,
    ledger::{Account, Frequency, TransactionRecord},
    CashFlowSimulator,
};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

fn build_sample_batch(account: &Account, txn_count: usize) -> Vec<TransactionRecord> {
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let mut records = Vec::with_capacity(txn_count + 64);

    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let amount = Decimal::from(50 + (idx % 100) as i64);
        let mut txn = if idx % 5 == 0 {
            TransactionRecord::income(account.id, amount, date, "Income")
        } else {
            TransactionRecord::expense(account.id, amount, date, "Expense")
        };
        if idx % 3 == 0 {
            txn.toggle_paid();
        }
        records.push(txn);
    }

    for idx in 0..16 {
        let base = TransactionRecord::expense(
            account.id,
            Decimal::from(10 + idx),
            start_date + Duration::days(idx),
            "Subscription",
        );
        let frequency = if idx % 2 == 0 {
            Frequency::Weekly
        } else {
            Frequency::Monthly
        };
        records.extend(RecurrenceService::generate(&base, frequency, 4).expect("recurrence"));
    }
    records
}

fn bench_projection(c: &mut Criterion) {
    let account = Account::new("Checking", Decimal::from(10_000));
    let records = build_sample_batch(&account, black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let simulator = CashFlowSimulator::new();

    c.bench_function("project_365_days_10k", |b| {
        b.iter(|| {
            let report = simulator
                .project_account(&account, &records, today, 365)
                .expect("projection");
            black_box(report);
        })
    });

    c.bench_function("history_90_days_10k", |b| {
        b.iter(|| {
            let report = simulator
                .history_account(&account, &records, today, 90)
                .expect("history");
            black_box(report);
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
