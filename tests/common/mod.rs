#![allow(dead_code)]

use cashflow_core::ledger::{Account, TransactionRecord, TransactionStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn checking(initial: Decimal) -> Account {
    Account::new("Checking", initial)
}

pub fn paid_income(account: Uuid, amount: Decimal, on: NaiveDate) -> TransactionRecord {
    TransactionRecord::income(account, amount, on, "Salary").with_status(TransactionStatus::Paid)
}

pub fn paid_expense(account: Uuid, amount: Decimal, on: NaiveDate) -> TransactionRecord {
    TransactionRecord::expense(account, amount, on, "Card").with_status(TransactionStatus::Paid)
}

pub fn pending_expense(account: Uuid, amount: Decimal, on: NaiveDate) -> TransactionRecord {
    TransactionRecord::expense(account, amount, on, "Bill")
}
